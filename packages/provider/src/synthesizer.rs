//! Chunk synthesizer: one provider invocation per text chunk.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use lector_domain::{Exaggeration, NarrationError, TextChunk, VoiceReference};
use tracing::debug;

use crate::client::ProviderClient;

/// Synthesizes one chunk of text into raw audio bytes.
///
/// The generation scheduler only talks to this trait, so tests can
/// substitute a scripted implementation.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        chunk: &TextChunk,
        voice: &VoiceReference,
        exaggeration: Exaggeration,
    ) -> Result<Bytes, NarrationError>;
}

/// Provider-backed synthesizer.
///
/// Wraps the HTTP client, normalizes whichever payload shape the
/// provider answers with, and bounds the whole call (request plus
/// payload conversion) with a single timeout.
pub struct ProviderSynthesizer {
    client: ProviderClient,
    call_timeout: Duration,
}

impl ProviderSynthesizer {
    pub fn new(client: ProviderClient, call_timeout: Duration) -> Self {
        Self {
            client,
            call_timeout,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for ProviderSynthesizer {
    async fn synthesize(
        &self,
        chunk: &TextChunk,
        voice: &VoiceReference,
        exaggeration: Exaggeration,
    ) -> Result<Bytes, NarrationError> {
        let call = async {
            let payload = self
                .client
                .synthesize(&chunk.text, voice, exaggeration)
                .await?;
            payload.into_bytes(self.client.http()).await
        };

        let bytes = match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(NarrationError::retryable(format!(
                    "chunk {} timed out after {:?}",
                    chunk.index, self.call_timeout
                )));
            }
        };

        debug!(index = chunk.index, bytes = bytes.len(), "chunk synthesized");
        Ok(bytes)
    }
}
