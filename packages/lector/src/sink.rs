//! Downstream artifact persistence, decoupled from synthesis.
//!
//! Persisting the final audio (object storage, CDN, ...) happens after
//! a successful synthesis and must never unwind the result: the engine
//! hands the payload to the sink fire-and-forget.

use async_trait::async_trait;
use lector_domain::{CompressedAudio, NarrationError};

/// Receives the final compressed payload after a successful batch run.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    async fn store(&self, audio: &CompressedAudio) -> Result<(), NarrationError>;
}

/// Discards artifacts; the default when no storage is wired up.
pub struct NullSink;

#[async_trait]
impl ArtifactSink for NullSink {
    async fn store(&self, _audio: &CompressedAudio) -> Result<(), NarrationError> {
        Ok(())
    }
}
