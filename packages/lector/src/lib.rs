//! # Lector
//!
//! Chunked long-form narration over an external speech-synthesis
//! provider. Turns an arbitrarily long document into one seamless,
//! correctly-ordered audio artifact without exceeding the provider's
//! per-call size limits, tolerating transient provider failures, and
//! optionally streaming audio to the listener before the whole
//! document finishes synthesizing.
//!
//! # Usage
//!
//! ```no_run
//! use lector::{NarrationEngine, NarrationRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lector::NarrationError> {
//!     let engine = NarrationEngine::builder().build()?;
//!
//!     let output = engine
//!         .narrate(NarrationRequest::new("Once upon a time...").with_title("A Story"))
//!         .await?;
//!
//!     println!("{} bytes of mp3", output.audio.len());
//!     Ok(())
//! }
//! ```

pub mod assembler;
pub mod chunker;
pub mod config;
pub mod converter;
pub mod engine;
pub mod normalizer;
pub mod scheduler;
pub mod sink;

// Internal: emission ordering is an engine concern, reached through
// `NarrationEngine::narrate_stream`.
mod sentences;
mod streaming;

// Re-export the entry points and the domain types callers interact with.
pub use config::{ConcurrencyMode, NarrationConfig};
pub use engine::{NarrationEngine, NarrationEngineBuilder, NarrationOutput};
pub use lector_domain::{
    AssembledAudio, AudioFormat, CompressedAudio, EventStream, Exaggeration, NarrationError,
    NarrationEvent, NarrationRequest, NarrationResponse, SampleSpec, TextChunk, VoiceReference,
};
pub use lector_provider::SpeechSynthesizer;
pub use sink::{ArtifactSink, NullSink};
