//! Bandwidth-efficient delivery payload.

use crate::audio_format::AudioFormat;

/// The transcoded delivery artifact for one narration request.
#[derive(Debug, Clone)]
pub struct CompressedAudio {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
    /// Duration carried over from the assembled source audio.
    pub duration_seconds: f64,
}

impl CompressedAudio {
    pub fn new(bytes: Vec<u8>, format: AudioFormat, duration_seconds: f64) -> Self {
        Self {
            bytes,
            format,
            duration_seconds,
        }
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
