//! # Lector Domain
//!
//! Shared domain objects and types for the lector narration pipeline.
//!
//! This crate contains the core types that are shared between the
//! provider adapter and the generation pipeline, enabling clean
//! separation of concerns and breaking cyclic dependencies.

pub mod assembled_audio;
pub mod audio_format;
pub mod compressed_audio;
pub mod exaggeration;
pub mod narration_error;
pub mod narration_event;
pub mod narration_request;
pub mod narration_response;
pub mod sample_spec;
pub mod text_chunk;
pub mod voice_reference;

// Re-export core types
pub use assembled_audio::AssembledAudio;
pub use audio_format::AudioFormat;
pub use compressed_audio::CompressedAudio;
pub use exaggeration::Exaggeration;
pub use narration_error::NarrationError;
pub use narration_event::{EventStream, NarrationEvent};
pub use narration_request::{NarrationRequest, NarrationRequestWire, MAX_TEXT_CHARS};
pub use narration_response::NarrationResponse;
pub use sample_spec::{SampleSpec, WAV_HEADER_BYTES};
pub use text_chunk::TextChunk;
pub use voice_reference::VoiceReference;

/// Prelude module containing commonly used types.
pub mod prelude {
    pub use crate::{
        AssembledAudio, AudioFormat, CompressedAudio, EventStream, Exaggeration, NarrationError,
        NarrationEvent, NarrationRequest, NarrationResponse, SampleSpec, TextChunk, VoiceReference,
    };
}
