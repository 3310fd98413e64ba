//! Fixed raw-audio sample format shared by all chunks of one request.
use serde::{Deserialize, Serialize};

/// Size of the canonical RIFF/WAVE header, excluded from duration math.
pub const WAV_HEADER_BYTES: usize = 44;

/// Sample format of the provider's raw audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSpec {
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub channels: u16,
}

impl SampleSpec {
    pub fn new(sample_rate: u32, bits_per_sample: u16, channels: u16) -> Self {
        Self {
            sample_rate,
            bits_per_sample,
            channels,
        }
    }

    /// Raw payload bytes consumed per second of playback.
    pub fn bytes_per_second(&self) -> u32 {
        self.sample_rate * u32::from(self.bits_per_sample / 8) * u32::from(self.channels)
    }

    /// Playable duration of a raw payload of `payload_bytes` bytes.
    pub fn duration_seconds(&self, payload_bytes: usize) -> f64 {
        payload_bytes as f64 / f64::from(self.bytes_per_second())
    }
}

impl Default for SampleSpec {
    /// 16-bit mono at 24 kHz, the provider's native output.
    fn default() -> Self {
        Self::new(24_000, 16, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec_bytes_per_second() {
        assert_eq!(SampleSpec::default().bytes_per_second(), 48_000);
    }

    #[test]
    fn duration_from_payload_size() {
        let spec = SampleSpec::default();
        assert!((spec.duration_seconds(96_000) - 2.0).abs() < f64::EPSILON);
    }
}
