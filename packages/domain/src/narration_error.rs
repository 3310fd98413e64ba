//! Unified error for the narration pipeline.
use thiserror::Error;

/// Top-level error covering validation, provider, and audio failures.
#[derive(Debug, Clone, Error)]
pub enum NarrationError {
    /// Input rejected before any provider call was made.
    #[error("validation: {0}")]
    Validation(String),
    /// Hard provider rejection (bad credentials or malformed request).
    /// Never retried; aborts the whole job.
    #[error("provider rejected request: {0}")]
    FatalProvider(String),
    /// Transient provider failure, eligible for bounded retry.
    #[error("provider failure (retryable): {message}")]
    RetryableProvider {
        /// Human-readable failure reason.
        message: String,
        /// Whether the provider explicitly signalled rate limiting.
        rate_limited: bool,
    },
    /// Format conversion failed; the job aborts with no fallback output.
    #[error("transcode: {0}")]
    Transcode(String),
    /// Raw audio could not be parsed or assembled.
    #[error("audio processing: {0}")]
    AudioProcessing(String),
    /// Configuration-related failure reason.
    #[error("configuration: {0}")]
    Configuration(String),
}

impl NarrationError {
    /// Whether the generation scheduler may retry the failed attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RetryableProvider { .. })
    }

    /// Whether the provider signalled rate limiting for this failure.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Self::RetryableProvider {
                rate_limited: true,
                ..
            }
        )
    }

    /// Shorthand for a retryable failure without a rate-limit signal.
    pub fn retryable(message: impl Into<String>) -> Self {
        Self::RetryableProvider {
            message: message.into(),
            rate_limited: false,
        }
    }

    /// Shorthand for a rate-limited retryable failure.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RetryableProvider {
            message: message.into(),
            rate_limited: true,
        }
    }
}
