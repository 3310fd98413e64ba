//! Speaker timbre reference: a provider voice id or a sample clip URL.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceReference {
    /// A voice identifier known to the provider.
    Preset(String),
    /// URL of a reference audio clip the provider clones the timbre from.
    SampleUrl(String),
}

impl VoiceReference {
    /// Create a reference to a provider-known voice.
    pub fn preset(id: impl Into<String>) -> Self {
        Self::Preset(id.into())
    }

    /// Create a reference to a sample audio clip.
    pub fn sample_url(url: impl Into<String>) -> Self {
        Self::SampleUrl(url.into())
    }

    /// Get the underlying identifier or URL string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Preset(id) => id,
            Self::SampleUrl(url) => url,
        }
    }
}

impl Default for VoiceReference {
    fn default() -> Self {
        Self::Preset("narrator".into())
    }
}
