//! Streaming delivery channel.
//!
//! Emits each chunk's audio to the listener as soon as it is both
//! synthesized and next in line. Out-of-order completions are held in a
//! reorder buffer until every lower-indexed chunk has been emitted, so
//! emission order is invariant regardless of completion order.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_stream::stream;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream as futures_stream;
use lector_domain::{
    EventStream, Exaggeration, NarrationError, NarrationEvent, TextChunk, VoiceReference,
};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use crate::config::ConcurrencyMode;
use crate::scheduler::GenerationScheduler;

/// Assumed speaking rate for the pre-synthesis duration estimate.
const CHARS_PER_SECOND: f64 = 15.0;

/// Rough duration estimate for text that has not been synthesized yet.
pub(crate) fn estimate_duration_seconds(text: &str) -> f64 {
    text.chars().count() as f64 / CHARS_PER_SECOND
}

/// Stream narration events for the given chunk sequence.
///
/// Event order: one `start`, then `chunk` events with strictly
/// increasing indices and progress, then a terminal `complete`. A chunk
/// that exhausts its retries ends the stream with a terminal `error`
/// event instead; a silent gap in the narration is never produced.
pub(crate) fn deliver(
    scheduler: Arc<GenerationScheduler>,
    chunks: Vec<TextChunk>,
    voice: VoiceReference,
    exaggeration: Exaggeration,
    estimated_duration: f64,
) -> EventStream {
    Box::pin(stream! {
        let total = chunks.len();
        yield NarrationEvent::Start {
            total_chunks: total,
            estimated_duration,
        };
        if total == 0 {
            yield NarrationEvent::Complete { total_chunks: 0 };
            return;
        }

        let (tx, rx) = mpsc::channel::<(usize, Result<Bytes, NarrationError>)>(total.min(32));
        let dispatcher = tokio::spawn(dispatch(scheduler, chunks, voice, exaggeration, tx));

        let mut completions = ReceiverStream::new(rx);
        let mut held: BTreeMap<usize, Bytes> = BTreeMap::new();
        let mut next_index = 0usize;
        let mut failure: Option<NarrationError> = None;

        while let Some((index, result)) = completions.next().await {
            match result {
                Ok(bytes) => {
                    if index != next_index {
                        debug!(index, next_index, "holding out-of-order chunk");
                    }
                    held.insert(index, bytes);
                }
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
            while let Some(bytes) = held.remove(&next_index) {
                next_index += 1;
                let progress = (next_index as f32 / total as f32) * 100.0;
                yield NarrationEvent::Chunk {
                    index: next_index - 1,
                    audio: BASE64.encode(&bytes),
                    progress,
                };
            }
        }

        // Stop any synthesis still in flight once the stream is over.
        dispatcher.abort();

        match failure {
            Some(err) => yield NarrationEvent::Error {
                message: err.to_string(),
            },
            None => yield NarrationEvent::Complete {
                total_chunks: total,
            },
        }
    })
}

/// Feed chunk completions into the reorder buffer, honoring the
/// scheduler's concurrency policy. Stops dispatching after the first
/// failed chunk (retries included) or once the receiver goes away.
async fn dispatch(
    scheduler: Arc<GenerationScheduler>,
    chunks: Vec<TextChunk>,
    voice: VoiceReference,
    exaggeration: Exaggeration,
    tx: mpsc::Sender<(usize, Result<Bytes, NarrationError>)>,
) {
    match scheduler.config().concurrency {
        ConcurrencyMode::Sequential { delay } => {
            for (position, chunk) in chunks.iter().enumerate() {
                if position > 0 && !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let result = scheduler
                    .synthesize_with_retry(chunk, &voice, exaggeration)
                    .await;
                let failed = result.is_err();
                if tx.send((chunk.index, result)).await.is_err() || failed {
                    break;
                }
            }
        }
        ConcurrencyMode::Parallel { limit } => {
            let scheduler = &scheduler;
            let voice = &voice;
            let mut completions = futures_stream::iter(chunks.into_iter().map(|chunk| async move {
                let index = chunk.index;
                (
                    index,
                    scheduler
                        .synthesize_with_retry(&chunk, voice, exaggeration)
                        .await,
                )
            }))
            .buffer_unordered(limit);

            while let Some((index, result)) = completions.next().await {
                let failed = result.is_err();
                if tx.send((index, result)).await.is_err() || failed {
                    break;
                }
            }
        }
    }
}
