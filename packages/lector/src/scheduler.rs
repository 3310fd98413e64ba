//! Concurrency-controlled chunk generation with a two-tier retry policy.
//!
//! Runs the chunk synthesizer over the whole chunk sequence, either one
//! chunk at a time or bounded-parallel, and always hands downstream
//! stages the results sorted by original chunk index.

use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use futures::TryStreamExt;
use futures::stream;
use lector_domain::{Exaggeration, NarrationError, TextChunk, VoiceReference};
use lector_provider::SpeechSynthesizer;
use tracing::{error, warn};

use crate::config::{ConcurrencyMode, NarrationConfig};

/// One chunk's synthesized audio, tagged with its original position.
#[derive(Debug, Clone)]
pub struct ChunkAudio {
    pub index: usize,
    pub bytes: Bytes,
}

/// Drives per-chunk synthesis under the configured concurrency and
/// retry policies.
pub struct GenerationScheduler {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    config: NarrationConfig,
}

impl GenerationScheduler {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, config: NarrationConfig) -> Self {
        Self {
            synthesizer,
            config: config.clamped(),
        }
    }

    pub fn config(&self) -> &NarrationConfig {
        &self.config
    }

    /// Synthesize every chunk, returning audio sorted by chunk index.
    ///
    /// A fatal failure, or a retryable one that exhausts its attempt
    /// budget, fails the whole run; chunks not yet started are never
    /// invoked.
    pub async fn run(
        &self,
        chunks: &[TextChunk],
        voice: &VoiceReference,
        exaggeration: Exaggeration,
    ) -> Result<Vec<ChunkAudio>, NarrationError> {
        let mut results = match self.config.concurrency {
            ConcurrencyMode::Sequential { delay } => {
                let mut out = Vec::with_capacity(chunks.len());
                for (position, chunk) in chunks.iter().enumerate() {
                    if position > 0 && !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    let bytes = self.synthesize_with_retry(chunk, voice, exaggeration).await?;
                    out.push(ChunkAudio {
                        index: chunk.index,
                        bytes,
                    });
                }
                out
            }
            ConcurrencyMode::Parallel { limit } => {
                stream::iter(chunks.iter().map(|chunk| {
                    let index = chunk.index;
                    async move {
                        let bytes = self.synthesize_with_retry(chunk, voice, exaggeration).await?;
                        Ok::<_, NarrationError>(ChunkAudio { index, bytes })
                    }
                }))
                .buffer_unordered(limit)
                .try_collect::<Vec<_>>()
                .await?
            }
        };

        results.sort_by_key(|chunk| chunk.index);
        Ok(results)
    }

    /// One chunk through the retry policy.
    ///
    /// Fatal errors abort immediately. Retryable errors wait (a fixed
    /// longer delay when the provider signalled rate limiting, otherwise
    /// a delay growing with the attempt number) and retry, up to the
    /// configured attempt budget. The last observed error surfaces.
    pub(crate) async fn synthesize_with_retry(
        &self,
        chunk: &TextChunk,
        voice: &VoiceReference,
        exaggeration: Exaggeration,
    ) -> Result<Bytes, NarrationError> {
        let max_attempts = self.config.max_attempts;
        let mut attempt = 1u32;

        loop {
            match self.synthesizer.synthesize(chunk, voice, exaggeration).await {
                Ok(bytes) => return Ok(bytes),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let wait = if err.is_rate_limited() {
                        self.config.rate_limit_backoff
                    } else {
                        self.config.retry_backoff_base * attempt
                    };
                    warn!(
                        index = chunk.index,
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        error = %err,
                        "chunk attempt failed, retrying"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_retryable() {
                        error!(index = chunk.index, attempts = attempt, error = %err, "retries exhausted");
                    } else {
                        error!(index = chunk.index, error = %err, "fatal provider failure");
                    }
                    return Err(err);
                }
            }
        }
    }
}
