//! Immutable narration request.

use serde::Deserialize;

use crate::exaggeration::Exaggeration;
use crate::narration_error::NarrationError;
use crate::voice_reference::VoiceReference;

/// Hard cap on input text length, in characters.
///
/// Inputs are long-form documents (tens of thousands of characters);
/// anything beyond this is rejected before any provider call.
pub const MAX_TEXT_CHARS: usize = 100_000;

/// A single request to narrate one document.
#[derive(Debug, Clone)]
pub struct NarrationRequest {
    /// The document text to narrate.
    pub text: String,
    /// Speaker timbre to synthesize with.
    pub voice: VoiceReference,
    /// Emotion intensity passed through to the provider.
    pub exaggeration: Exaggeration,
    /// Whether a spoken preamble is prepended to the document.
    pub include_intro: bool,
    /// Explicit preamble text, spoken before the document.
    pub spoken_intro: Option<String>,
    /// Document title; spoken as the preamble when no explicit intro is set.
    pub title: Option<String>,
}

impl NarrationRequest {
    /// Create a request with default voice and emotion settings.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: VoiceReference::default(),
            exaggeration: Exaggeration::default(),
            include_intro: false,
            spoken_intro: None,
            title: None,
        }
    }

    /// Set the speaker timbre.
    pub fn with_voice(mut self, voice: VoiceReference) -> Self {
        self.voice = voice;
        self
    }

    /// Set the emotion intensity.
    pub fn with_exaggeration(mut self, exaggeration: impl Into<Exaggeration>) -> Self {
        self.exaggeration = exaggeration.into();
        self
    }

    /// Prepend a spoken preamble before the document.
    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.include_intro = true;
        self.spoken_intro = Some(intro.into());
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enable or disable the spoken preamble.
    pub fn include_intro(mut self, include: bool) -> Self {
        self.include_intro = include;
        self
    }

    /// Reject requests that are empty or exceed the hard length cap.
    pub fn validate(&self) -> Result<(), NarrationError> {
        if self.text.trim().is_empty() {
            return Err(NarrationError::Validation("text must not be empty".into()));
        }
        if self.text.chars().count() > MAX_TEXT_CHARS {
            return Err(NarrationError::Validation(format!(
                "text exceeds {MAX_TEXT_CHARS} characters"
            )));
        }
        Ok(())
    }

    /// The preamble sentence to speak before the document, if any.
    ///
    /// An explicit `spoken_intro` wins; otherwise the title is spoken as
    /// a single sentence. Without either, no preamble is produced.
    pub fn preamble(&self) -> Option<String> {
        if !self.include_intro {
            return None;
        }
        self.spoken_intro
            .clone()
            .or_else(|| self.title.as_ref().map(|t| format!("{t}.")))
    }

    /// Full text handed to the pipeline: preamble plus document.
    pub fn full_text(&self) -> String {
        match self.preamble() {
            Some(intro) => format!("{intro} {}", self.text),
            None => self.text.clone(),
        }
    }
}

/// Wire shape of a batch request as received from callers.
///
/// `voice` and `audioReferenceUrl` are separate optional fields; a
/// reference URL wins when both are present.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationRequestWire {
    pub text: String,
    pub voice: Option<String>,
    pub exaggeration: Option<f32>,
    pub audio_reference_url: Option<String>,
    pub title: Option<String>,
    pub spoken_intro: Option<String>,
    pub include_intro: Option<bool>,
}

impl NarrationRequestWire {
    /// Resolve the wire fields into a validated-shape domain request.
    pub fn into_request(self) -> NarrationRequest {
        let voice = match (self.audio_reference_url, self.voice) {
            (Some(url), _) => VoiceReference::SampleUrl(url),
            (None, Some(id)) => VoiceReference::Preset(id),
            (None, None) => VoiceReference::default(),
        };
        NarrationRequest {
            text: self.text,
            voice,
            exaggeration: self.exaggeration.map(Exaggeration::new).unwrap_or_default(),
            include_intro: self.include_intro.unwrap_or(false),
            spoken_intro: self.spoken_intro,
            title: self.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_fails_validation() {
        let req = NarrationRequest::new("   ");
        assert!(req.validate().is_err());
    }

    #[test]
    fn preamble_prefers_explicit_intro_over_title() {
        let req = NarrationRequest::new("body")
            .with_title("My Story")
            .with_intro("Welcome back.");
        assert_eq!(req.preamble().as_deref(), Some("Welcome back."));
    }

    #[test]
    fn preamble_falls_back_to_title() {
        let req = NarrationRequest::new("body")
            .with_title("My Story")
            .include_intro(true);
        assert_eq!(req.preamble().as_deref(), Some("My Story."));
        assert_eq!(req.full_text(), "My Story. body");
    }

    #[test]
    fn wire_reference_url_wins_over_voice_id() {
        let wire = NarrationRequestWire {
            text: "hello".into(),
            voice: Some("ava".into()),
            exaggeration: Some(2.0),
            audio_reference_url: Some("https://cdn.example/ref.wav".into()),
            title: None,
            spoken_intro: None,
            include_intro: None,
        };
        let req = wire.into_request();
        assert_eq!(
            req.voice,
            VoiceReference::SampleUrl("https://cdn.example/ref.wav".into())
        );
        assert_eq!(req.exaggeration.value(), 1.0);
    }
}
