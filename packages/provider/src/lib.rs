//! Speech-provider adapter for the lector narration pipeline.
//!
//! Wraps the external text-to-speech HTTP API: credential resolution
//! with explicit invalidation, per-chunk synthesis calls, response-shape
//! normalization, and classification of provider failures into the
//! fatal/retryable taxonomy the generation scheduler acts on.

mod client;
mod payload;

pub mod credentials;
pub mod synthesizer;

pub use client::ProviderClient;
pub use credentials::{
    CredentialResolver, EnvCredentialResolver, ProviderCredentials, StaticCredentialResolver,
};
pub use payload::ProviderPayload;
pub use synthesizer::{ProviderSynthesizer, SpeechSynthesizer};
