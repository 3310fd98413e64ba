//! Raw-to-compressed transcoding for delivery.
//!
//! Downstream consumers expect MP3; a conversion failure fails the
//! whole request rather than falling back to uncompressed output.

use std::io::Cursor;

use hound::WavReader;
use lector_domain::{AssembledAudio, AudioFormat, CompressedAudio, NarrationError};
use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, MonoPcm, Quality};
use tracing::info;

/// Transcode assembled WAV audio into an MP3 delivery payload.
pub fn to_mp3(audio: &AssembledAudio) -> Result<CompressedAudio, NarrationError> {
    let reader = WavReader::new(Cursor::new(&audio.bytes[..]))
        .map_err(|e| NarrationError::Transcode(format!("assembled wav: {e}")))?;
    let spec = reader.spec();
    if spec.channels != 1 {
        return Err(NarrationError::Transcode(format!(
            "expected mono input, got {} channels",
            spec.channels
        )));
    }
    let samples: Vec<i16> = reader
        .into_samples::<i16>()
        .collect::<Result<_, _>>()
        .map_err(|e| NarrationError::Transcode(format!("assembled samples: {e}")))?;

    let mp3 = encode_mono(&samples, spec.sample_rate)?;
    info!(
        wav_bytes = audio.bytes.len(),
        mp3_bytes = mp3.len(),
        "transcoded narration"
    );
    Ok(CompressedAudio::new(
        mp3,
        AudioFormat::Mp3,
        audio.duration_seconds,
    ))
}

/// Encode mono 16-bit PCM at 192 kbps, best quality.
fn encode_mono(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, NarrationError> {
    let mut builder =
        Builder::new().ok_or_else(|| NarrationError::Transcode("encoder init failed".into()))?;
    builder
        .set_num_channels(1)
        .map_err(|e| NarrationError::Transcode(format!("channels: {e:?}")))?;
    builder
        .set_sample_rate(sample_rate)
        .map_err(|e| NarrationError::Transcode(format!("sample rate: {e:?}")))?;
    builder
        .set_brate(Bitrate::Kbps192)
        .map_err(|e| NarrationError::Transcode(format!("bitrate: {e:?}")))?;
    builder
        .set_quality(Quality::Best)
        .map_err(|e| NarrationError::Transcode(format!("quality: {e:?}")))?;
    let mut encoder = builder
        .build()
        .map_err(|e| NarrationError::Transcode(format!("encoder build: {e:?}")))?;

    let pcm = MonoPcm(samples);
    let mut out = Vec::new();
    out.reserve(mp3lame_encoder::max_required_buffer_size(samples.len()));

    let written = encoder
        .encode(pcm, out.spare_capacity_mut())
        .map_err(|e| NarrationError::Transcode(format!("encode: {e:?}")))?;
    // SAFETY: `encode` initialized exactly `written` bytes of spare capacity.
    unsafe {
        out.set_len(out.len() + written);
    }

    let flushed = encoder
        .flush::<FlushNoGap>(out.spare_capacity_mut())
        .map_err(|e| NarrationError::Transcode(format!("flush: {e:?}")))?;
    // SAFETY: `flush` initialized exactly `flushed` bytes of spare capacity.
    unsafe {
        out.set_len(out.len() + flushed);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{assemble, test_support::wav_bytes};
    use crate::scheduler::ChunkAudio;

    #[test]
    fn produces_mp3_tagged_payload() {
        let assembled = assemble(&[ChunkAudio {
            index: 0,
            bytes: wav_bytes(&[0; 24_000]),
        }])
        .unwrap();
        let compressed = to_mp3(&assembled).unwrap();
        assert_eq!(compressed.format, AudioFormat::Mp3);
        assert!(!compressed.is_empty());
        // Duration is carried over from the assembled source.
        assert!((compressed.duration_seconds - assembled.duration_seconds).abs() < f64::EPSILON);
        // 192 kbps of one second is far smaller than the raw PCM.
        assert!(compressed.len() < assembled.len());
    }
}
