//! Ordered concatenation of every chunk's raw audio.

use crate::sample_spec::{SampleSpec, WAV_HEADER_BYTES};

/// One continuous WAV payload covering the whole document, created once
/// per request after every chunk resolves.
#[derive(Debug, Clone)]
pub struct AssembledAudio {
    /// Complete WAV bytes, header included.
    pub bytes: Vec<u8>,
    /// Sample format shared by every source chunk.
    pub spec: SampleSpec,
    /// Number of chunks that were concatenated.
    pub chunk_count: usize,
    /// Estimated playable duration in seconds.
    pub duration_seconds: f64,
}

impl AssembledAudio {
    /// Wrap assembled WAV bytes, deriving duration from the raw payload
    /// size: `(total_bytes - header_bytes) / bytes_per_second`.
    pub fn new(bytes: Vec<u8>, spec: SampleSpec, chunk_count: usize) -> Self {
        let payload = bytes.len().saturating_sub(WAV_HEADER_BYTES);
        let duration_seconds = spec.duration_seconds(payload);
        Self {
            bytes,
            spec,
            chunk_count,
            duration_seconds,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
