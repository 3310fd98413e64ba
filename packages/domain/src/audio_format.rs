//! Audio container formats produced by the pipeline.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioFormat {
    /// Uncompressed RIFF/WAVE, 16-bit PCM.
    Wav,
    /// MPEG-1/2 Layer III, the delivery format.
    Mp3,
}

impl AudioFormat {
    /// Lowercase format tag used in wire responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }

    /// MIME type for HTTP delivery.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
        }
    }
}
