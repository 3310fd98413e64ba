//! Wire response for the batch generation path.

use serde::{Deserialize, Serialize};

use crate::audio_format::AudioFormat;
use crate::compressed_audio::CompressedAudio;

/// Batch response: either a complete audio payload or an explicit error,
/// never a partial result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Number of chunks the document was split into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NarrationResponse {
    /// Successful response carrying the full transcoded payload.
    pub fn ok(audio_base64: String, audio: &CompressedAudio, chunks: usize) -> Self {
        Self {
            success: true,
            audio_base64: Some(audio_base64),
            duration_seconds: Some(audio.duration_seconds),
            format: Some(format_tag(audio.format)),
            chunks: Some(chunks),
            error: None,
        }
    }

    /// Failure response with a human-readable reason.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            audio_base64: None,
            duration_seconds: None,
            format: None,
            chunks: None,
            error: Some(error.into()),
        }
    }
}

fn format_tag(format: AudioFormat) -> String {
    format.as_str().to_string()
}
