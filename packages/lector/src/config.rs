//! Pipeline configuration.
//!
//! Every knob has a built-in safe default and is clamped into a safe
//! band, so misconfiguration cannot produce pathologically large or
//! tiny chunks, unbounded retries, or runaway parallelism.

use std::time::Duration;

use crate::chunker;

/// Hard ceiling on simultaneous provider calls.
pub const MAX_CONCURRENCY: usize = 8;
/// Hard ceiling on per-chunk attempts.
pub const MAX_ATTEMPTS: u32 = 10;

const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_PARALLEL_LIMIT: usize = 2;
const DEFAULT_CHUNK_DELAY_MS: u64 = 1_000;
const DEFAULT_CHUNK_TIMEOUT_SECS: u64 = 240;
const DEFAULT_RATE_LIMIT_BACKOFF_SECS: u64 = 10;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 1_000;

/// How chunk synthesis calls are scheduled against the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcurrencyMode {
    /// One chunk at a time with a fixed delay between calls. The safer
    /// default: the provider sees a steady, polite request rate.
    Sequential { delay: Duration },
    /// At most `limit` chunks synthesizing simultaneously. Trades
    /// provider-politeness for wall-clock speed.
    Parallel { limit: usize },
}

impl Default for ConcurrencyMode {
    fn default() -> Self {
        Self::Sequential {
            delay: Duration::from_millis(DEFAULT_CHUNK_DELAY_MS),
        }
    }
}

/// Configuration for one narration pipeline instance.
#[derive(Debug, Clone)]
pub struct NarrationConfig {
    /// Chunk size cap in characters, clamped to the chunker's safe band.
    pub max_chunk_chars: usize,
    pub concurrency: ConcurrencyMode,
    /// Per-chunk attempt budget, including the first try.
    pub max_attempts: u32,
    /// Bound on one provider call, cold start included.
    pub chunk_timeout: Duration,
    /// Fixed wait after the provider signals rate limiting.
    pub rate_limit_backoff: Duration,
    /// Base wait for other retryable failures; grows with attempt number.
    pub retry_backoff_base: Duration,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: chunker::MAX_CHUNK_CHARS,
            concurrency: ConcurrencyMode::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            chunk_timeout: Duration::from_secs(DEFAULT_CHUNK_TIMEOUT_SECS),
            rate_limit_backoff: Duration::from_secs(DEFAULT_RATE_LIMIT_BACKOFF_SECS),
            retry_backoff_base: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

impl NarrationConfig {
    /// Read configuration from the environment, clamping every value.
    ///
    /// Recognized variables: `LECTOR_MAX_CHUNK_CHARS`,
    /// `LECTOR_SEQUENTIAL`, `LECTOR_CONCURRENCY`,
    /// `LECTOR_CHUNK_DELAY_MS`, `LECTOR_CHUNK_TIMEOUT_SECS`,
    /// `LECTOR_MAX_ATTEMPTS`. Unset or unparsable values fall back to
    /// the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let sequential = env_parse("LECTOR_SEQUENTIAL").unwrap_or(true);
        let concurrency = if sequential {
            ConcurrencyMode::Sequential {
                delay: Duration::from_millis(
                    env_parse("LECTOR_CHUNK_DELAY_MS").unwrap_or(DEFAULT_CHUNK_DELAY_MS),
                ),
            }
        } else {
            ConcurrencyMode::Parallel {
                limit: env_parse("LECTOR_CONCURRENCY")
                    .unwrap_or(DEFAULT_PARALLEL_LIMIT)
                    .clamp(1, MAX_CONCURRENCY),
            }
        };

        Self {
            max_chunk_chars: chunker::clamp_chunk_chars(
                env_parse("LECTOR_MAX_CHUNK_CHARS").unwrap_or(defaults.max_chunk_chars),
            ),
            concurrency,
            max_attempts: env_parse("LECTOR_MAX_ATTEMPTS")
                .unwrap_or(DEFAULT_MAX_ATTEMPTS)
                .clamp(1, MAX_ATTEMPTS),
            chunk_timeout: Duration::from_secs(
                env_parse("LECTOR_CHUNK_TIMEOUT_SECS")
                    .unwrap_or(DEFAULT_CHUNK_TIMEOUT_SECS)
                    .clamp(10, 600),
            ),
            ..defaults
        }
    }

    /// Clamp the fields a caller may have set by hand.
    pub fn clamped(mut self) -> Self {
        self.max_chunk_chars = chunker::clamp_chunk_chars(self.max_chunk_chars);
        self.max_attempts = self.max_attempts.clamp(1, MAX_ATTEMPTS);
        if let ConcurrencyMode::Parallel { limit } = self.concurrency {
            self.concurrency = ConcurrencyMode::Parallel {
                limit: limit.clamp(1, MAX_CONCURRENCY),
            };
        }
        self
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sequential_and_bounded() {
        let config = NarrationConfig::default();
        assert!(matches!(
            config.concurrency,
            ConcurrencyMode::Sequential { .. }
        ));
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.max_chunk_chars, chunker::MAX_CHUNK_CHARS);
    }

    #[test]
    fn clamped_rejects_pathological_values() {
        let config = NarrationConfig {
            max_chunk_chars: 5,
            concurrency: ConcurrencyMode::Parallel { limit: 1_000 },
            max_attempts: 99,
            ..NarrationConfig::default()
        }
        .clamped();
        assert_eq!(config.max_chunk_chars, chunker::MIN_CHUNK_CHARS);
        assert_eq!(
            config.concurrency,
            ConcurrencyMode::Parallel {
                limit: MAX_CONCURRENCY
            }
        );
        assert_eq!(config.max_attempts, MAX_ATTEMPTS);
    }
}
