//! Order-preserving reassembly of per-chunk audio into one stream.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use lector_domain::{AssembledAudio, NarrationError, SampleSpec};

use crate::scheduler::ChunkAudio;

/// Concatenate chunk audio (already sorted by index) into one WAV.
///
/// Every chunk must agree on the sample format; the output timeline is
/// gap-free and matches the original chunk order exactly.
pub fn assemble(chunk_audio: &[ChunkAudio]) -> Result<AssembledAudio, NarrationError> {
    if chunk_audio.is_empty() {
        return Err(NarrationError::AudioProcessing(
            "no chunk audio to assemble".into(),
        ));
    }

    let mut spec: Option<WavSpec> = None;
    let mut samples: Vec<i16> = Vec::new();

    for chunk in chunk_audio {
        let reader = WavReader::new(Cursor::new(&chunk.bytes[..])).map_err(|e| {
            NarrationError::AudioProcessing(format!("chunk {}: {e}", chunk.index))
        })?;
        let this_spec = reader.spec();
        if this_spec.sample_format != SampleFormat::Int || this_spec.bits_per_sample != 16 {
            return Err(NarrationError::AudioProcessing(format!(
                "chunk {}: expected 16-bit integer PCM",
                chunk.index
            )));
        }
        match spec {
            None => spec = Some(this_spec),
            Some(expected) if expected == this_spec => {}
            Some(expected) => {
                return Err(NarrationError::AudioProcessing(format!(
                    "chunk {}: sample format {:?} does not match {:?}",
                    chunk.index, this_spec, expected
                )));
            }
        }
        for sample in reader.into_samples::<i16>() {
            samples.push(sample.map_err(|e| {
                NarrationError::AudioProcessing(format!("chunk {}: {e}", chunk.index))
            })?);
        }
    }

    let wav_spec = spec.ok_or_else(|| {
        NarrationError::AudioProcessing("no chunk audio to assemble".into())
    })?;
    let bytes = write_wav(&samples, wav_spec)?;
    let sample_spec = SampleSpec::new(
        wav_spec.sample_rate,
        wav_spec.bits_per_sample,
        wav_spec.channels,
    );
    Ok(AssembledAudio::new(bytes, sample_spec, chunk_audio.len()))
}

fn write_wav(samples: &[i16], spec: WavSpec) -> Result<Vec<u8>, NarrationError> {
    let mut bytes = Vec::new();
    {
        let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec)
            .map_err(|e| NarrationError::AudioProcessing(format!("wav header: {e}")))?;
        for sample in samples {
            writer
                .write_sample(*sample)
                .map_err(|e| NarrationError::AudioProcessing(format!("wav body: {e}")))?;
        }
        writer
            .finalize()
            .map_err(|e| NarrationError::AudioProcessing(format!("wav finalize: {e}")))?;
    }
    Ok(bytes)
}
