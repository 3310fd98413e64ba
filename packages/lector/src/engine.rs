//! Narration engine: the single entry point for batch and streaming
//! generation.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures::stream;
use lector_domain::{
    CompressedAudio, EventStream, NarrationError, NarrationEvent, NarrationRequest,
    NarrationResponse,
};
use lector_provider::{
    EnvCredentialResolver, ProviderClient, ProviderSynthesizer, SpeechSynthesizer,
};
use tracing::{info, warn};

use crate::config::NarrationConfig;
use crate::scheduler::GenerationScheduler;
use crate::sink::ArtifactSink;
use crate::{assembler, chunker, converter, normalizer, streaming};

/// Result of one batch narration.
#[derive(Debug, Clone)]
pub struct NarrationOutput {
    /// The complete transcoded payload.
    pub audio: CompressedAudio,
    /// How many chunks the document was split into.
    pub chunks: usize,
    /// Duplicate sentences dropped by normalization and boundary dedup.
    pub duplicates_removed: usize,
}

/// Long-form narration engine.
///
/// Holds the configuration and the injected chunk synthesizer; each
/// request's chunk sequence and partial results stay private to that
/// request.
pub struct NarrationEngine {
    scheduler: Arc<GenerationScheduler>,
    config: NarrationConfig,
    sink: Option<Arc<dyn ArtifactSink>>,
}

impl NarrationEngine {
    pub fn builder() -> NarrationEngineBuilder {
        NarrationEngineBuilder::default()
    }

    /// Batch path: normalize, chunk, synthesize, assemble, transcode.
    ///
    /// Returns either a complete, correctly-ordered audio result or the
    /// first fatal/exhausted/transcode failure, never a partial batch.
    pub async fn narrate(
        &self,
        request: NarrationRequest,
    ) -> Result<NarrationOutput, NarrationError> {
        request.validate()?;
        let normalized = normalizer::normalize(&request.full_text());
        if normalized.text.is_empty() {
            return Err(NarrationError::Validation(
                "text is empty after normalization".into(),
            ));
        }

        let plan = chunker::chunk_text(&normalized.text, self.config.max_chunk_chars);
        info!(
            chunks = plan.chunks.len(),
            chars = normalized.text.chars().count(),
            "starting narration"
        );

        let chunk_audio = self
            .scheduler
            .run(&plan.chunks, &request.voice, request.exaggeration)
            .await?;
        let assembled = assembler::assemble(&chunk_audio)?;
        let compressed = converter::to_mp3(&assembled)?;

        self.dispatch_to_sink(&compressed);

        Ok(NarrationOutput {
            audio: compressed,
            chunks: plan.chunks.len(),
            duplicates_removed: normalized.removed_duplicates + plan.boundary_duplicates_removed,
        })
    }

    /// Batch path in its wire shape; every failure maps to
    /// `{ success: false, error }`.
    pub async fn narrate_response(&self, request: NarrationRequest) -> NarrationResponse {
        match self.narrate(request).await {
            Ok(output) => NarrationResponse::ok(
                BASE64.encode(&output.audio.bytes),
                &output.audio,
                output.chunks,
            ),
            Err(err) => NarrationResponse::failure(err.to_string()),
        }
    }

    /// Streaming path: emits `start`, ordered `chunk` events, and a
    /// terminal `complete` or `error`.
    pub fn narrate_stream(&self, request: NarrationRequest) -> EventStream {
        if let Err(err) = request.validate() {
            return error_stream(err);
        }
        let normalized = normalizer::normalize(&request.full_text());
        if normalized.text.is_empty() {
            return error_stream(NarrationError::Validation(
                "text is empty after normalization".into(),
            ));
        }

        let plan = chunker::chunk_text(&normalized.text, self.config.max_chunk_chars);
        let estimated_duration = streaming::estimate_duration_seconds(&normalized.text);
        streaming::deliver(
            self.scheduler.clone(),
            plan.chunks,
            request.voice,
            request.exaggeration,
            estimated_duration,
        )
    }

    /// Hand the finished payload to the artifact sink without tying the
    /// response to its fate.
    fn dispatch_to_sink(&self, audio: &CompressedAudio) {
        let Some(sink) = self.sink.clone() else {
            return;
        };
        let audio = audio.clone();
        tokio::spawn(async move {
            if let Err(err) = sink.store(&audio).await {
                warn!(error = %err, "artifact sink failed");
            }
        });
    }
}

fn error_stream(err: NarrationError) -> EventStream {
    Box::pin(stream::iter([NarrationEvent::Error {
        message: err.to_string(),
    }]))
}

/// Builder for [`NarrationEngine`].
#[derive(Default)]
pub struct NarrationEngineBuilder {
    config: Option<NarrationConfig>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    sink: Option<Arc<dyn ArtifactSink>>,
}

impl NarrationEngineBuilder {
    /// Use an explicit configuration instead of the environment's.
    pub fn config(mut self, config: NarrationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Inject a chunk synthesizer (tests use a scripted one).
    pub fn synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Wire up a downstream artifact sink.
    pub fn artifact_sink(mut self, sink: Arc<dyn ArtifactSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the engine; without an injected synthesizer, a
    /// provider-backed one is created with environment credentials.
    pub fn build(self) -> Result<NarrationEngine, NarrationError> {
        let config = self
            .config
            .unwrap_or_else(NarrationConfig::from_env)
            .clamped();

        let synthesizer = match self.synthesizer {
            Some(synthesizer) => synthesizer,
            None => {
                let client = ProviderClient::new(
                    Arc::new(EnvCredentialResolver::new()),
                    config.chunk_timeout,
                )?;
                Arc::new(ProviderSynthesizer::new(client, config.chunk_timeout))
            }
        };

        Ok(NarrationEngine {
            scheduler: Arc::new(GenerationScheduler::new(synthesizer, config.clone())),
            config,
            sink: self.sink,
        })
    }
}
