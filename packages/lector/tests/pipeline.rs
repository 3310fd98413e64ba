//! End-to-end pipeline tests against a scripted synthesizer.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use futures::StreamExt;
use hound::{SampleFormat, WavSpec, WavWriter};
use lector::{
    ConcurrencyMode, Exaggeration, NarrationConfig, NarrationEngine, NarrationError,
    NarrationEvent, NarrationRequest, SpeechSynthesizer, TextChunk, VoiceReference,
};

fn wav_bytes(samples: &[i16]) -> Bytes {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 24_000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut bytes = Vec::new();
    {
        let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
        for sample in samples {
            writer.write_sample(*sample).unwrap();
        }
        writer.finalize().unwrap();
    }
    Bytes::from(bytes)
}

/// Synthesizer producing a short WAV per chunk; optionally fails a
/// given chunk index a fixed number of times, or fatally.
struct FakeProvider {
    calls: AtomicUsize,
    transient_failures: Option<(usize, AtomicUsize)>,
    fatal_index: Option<usize>,
}

impl FakeProvider {
    fn ok() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            transient_failures: None,
            fatal_index: None,
        }
    }

    fn flaky(index: usize, failures: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            transient_failures: Some((index, AtomicUsize::new(failures))),
            fatal_index: None,
        }
    }

    fn fatal_at(index: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            transient_failures: None,
            fatal_index: Some(index),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeProvider {
    async fn synthesize(
        &self,
        chunk: &TextChunk,
        _voice: &VoiceReference,
        _exaggeration: Exaggeration,
    ) -> Result<Bytes, NarrationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fatal_index == Some(chunk.index) {
            return Err(NarrationError::FatalProvider("invalid api key".into()));
        }
        if let Some((index, remaining)) = &self.transient_failures {
            if *index == chunk.index
                && remaining
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                    .is_ok()
            {
                return Err(NarrationError::retryable("503 from provider"));
            }
        }
        // 200 ms of audio per chunk.
        Ok(wav_bytes(&[(chunk.index as i16 + 1) * 100; 4_800]))
    }
}

fn test_config() -> NarrationConfig {
    NarrationConfig {
        concurrency: ConcurrencyMode::Sequential {
            delay: Duration::ZERO,
        },
        retry_backoff_base: Duration::from_millis(1),
        rate_limit_backoff: Duration::from_millis(1),
        ..NarrationConfig::default()
    }
}

fn engine_with(provider: Arc<FakeProvider>) -> NarrationEngine {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    NarrationEngine::builder()
        .config(test_config())
        .synthesizer(provider)
        .build()
        .unwrap()
}

fn long_document(sentences: usize) -> String {
    (0..sentences)
        .map(|i| format!("Sentence number {i} carries a little bit of story text."))
        .collect::<Vec<_>>()
        .join(" ")
}

#[tokio::test]
async fn batch_narration_produces_complete_mp3() {
    let provider = Arc::new(FakeProvider::ok());
    let engine = engine_with(provider.clone());

    let output = engine
        .narrate(NarrationRequest::new(long_document(20)))
        .await
        .unwrap();

    assert!(output.chunks > 1);
    assert_eq!(provider.calls(), output.chunks);
    assert!(!output.audio.is_empty());
    assert!(output.audio.duration_seconds > 0.0);
    // 200 ms of raw audio per chunk.
    let expected = 0.2 * output.chunks as f64;
    assert!((output.audio.duration_seconds - expected).abs() < 1e-6);
}

#[tokio::test]
async fn wire_response_carries_base64_audio_and_chunk_count() {
    let engine = engine_with(Arc::new(FakeProvider::ok()));

    let response = engine
        .narrate_response(NarrationRequest::new(long_document(12)).with_title("A Tale"))
        .await;

    assert!(response.success);
    assert_eq!(response.format.as_deref(), Some("mp3"));
    assert!(response.chunks.unwrap() > 0);
    let decoded = BASE64.decode(response.audio_base64.unwrap()).unwrap();
    assert!(!decoded.is_empty());
    assert!(response.error.is_none());
}

#[tokio::test]
async fn transient_provider_failures_are_absorbed() {
    // One chunk fails twice before succeeding; the batch still succeeds
    // and the provider saw exactly the extra attempts.
    let provider = Arc::new(FakeProvider::flaky(1, 2));
    let engine = engine_with(provider.clone());

    let output = engine
        .narrate(NarrationRequest::new(long_document(20)))
        .await
        .unwrap();

    assert_eq!(provider.calls(), output.chunks + 2);
}

#[tokio::test]
async fn fatal_provider_failure_fails_the_whole_batch() {
    let provider = Arc::new(FakeProvider::fatal_at(0));
    let engine = engine_with(provider.clone());

    let response = engine
        .narrate_response(NarrationRequest::new(long_document(20)))
        .await;

    assert!(!response.success);
    assert!(response.error.unwrap().contains("invalid api key"));
    assert!(response.audio_base64.is_none());
    // First chunk only; nothing later was ever invoked.
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn empty_and_symbol_only_text_is_rejected_before_synthesis() {
    let provider = Arc::new(FakeProvider::ok());
    let engine = engine_with(provider.clone());

    let err = engine.narrate(NarrationRequest::new("   ")).await.unwrap_err();
    assert!(matches!(err, NarrationError::Validation(_)));

    let err = engine
        .narrate(NarrationRequest::new("*** ### ***"))
        .await
        .unwrap_err();
    assert!(matches!(err, NarrationError::Validation(_)));

    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn duplicated_sentences_are_spoken_once() {
    let provider = Arc::new(FakeProvider::ok());
    let engine = engine_with(provider.clone());

    let repeated = "This exact sentence appears twice in the document.";
    let text = format!("{} {repeated} Some middle filler text. {repeated}", long_document(6));
    let output = engine.narrate(NarrationRequest::new(text)).await.unwrap();

    assert!(output.duplicates_removed >= 1);
}

#[tokio::test]
async fn streaming_emits_ordered_events_with_terminal_complete() {
    let provider = Arc::new(FakeProvider::ok());
    let engine = engine_with(provider);

    let events: Vec<NarrationEvent> = engine
        .narrate_stream(NarrationRequest::new(long_document(20)))
        .collect()
        .await;

    let Some(NarrationEvent::Start { total_chunks, .. }) = events.first() else {
        panic!("first event must be start");
    };
    let chunk_indices: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            NarrationEvent::Chunk { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(chunk_indices, (0..*total_chunks).collect::<Vec<_>>());
    assert_eq!(
        events.last(),
        Some(&NarrationEvent::Complete {
            total_chunks: *total_chunks
        })
    );
}

#[tokio::test]
async fn streaming_events_serialize_to_the_wire_shape() {
    let engine = engine_with(Arc::new(FakeProvider::ok()));

    let events: Vec<NarrationEvent> = engine
        .narrate_stream(NarrationRequest::new(long_document(8)))
        .collect()
        .await;

    let start = serde_json::to_value(&events[0]).unwrap();
    assert_eq!(start["type"], "start");
    assert!(start["totalChunks"].is_number());
    assert!(start["estimatedDuration"].is_number());

    let chunk = events
        .iter()
        .find(|e| matches!(e, NarrationEvent::Chunk { .. }))
        .unwrap();
    let chunk = serde_json::to_value(chunk).unwrap();
    assert_eq!(chunk["type"], "chunk");
    assert!(chunk["audio"].is_string());
    assert!(chunk["progress"].is_number());

    let complete = serde_json::to_value(events.last().unwrap()).unwrap();
    assert_eq!(complete["type"], "complete");
}

#[tokio::test]
async fn streaming_validation_failure_is_a_single_error_event() {
    let engine = engine_with(Arc::new(FakeProvider::ok()));

    let events: Vec<NarrationEvent> = engine
        .narrate_stream(NarrationRequest::new(""))
        .collect()
        .await;

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], NarrationEvent::Error { .. }));
}
