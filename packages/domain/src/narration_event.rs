//! Server-push events for the streaming delivery channel.

use std::pin::Pin;

use futures_core::Stream;
use serde::{Deserialize, Serialize};

/// One event on the streaming delivery channel.
///
/// Serialized with a lowercase `type` tag and camelCase fields:
/// `{"type":"chunk","index":0,"audio":"...","progress":25.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NarrationEvent {
    /// Emitted once, immediately after chunking.
    #[serde(rename_all = "camelCase")]
    Start {
        total_chunks: usize,
        /// Rough duration estimate from text length; no audio exists yet.
        estimated_duration: f64,
    },
    /// One successfully synthesized chunk, in strictly increasing index order.
    #[serde(rename_all = "camelCase")]
    Chunk {
        index: usize,
        /// Base64-encoded chunk audio.
        audio: String,
        /// Monotonically increasing completion percentage.
        progress: f32,
    },
    /// Terminal event after every chunk has been emitted.
    #[serde(rename_all = "camelCase")]
    Complete { total_chunks: usize },
    /// Terminal event when the stream fails; no further chunks follow.
    #[serde(rename_all = "camelCase")]
    Error { message: String },
}

impl NarrationEvent {
    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }
}

/// Boxed stream of delivery events.
pub type EventStream = Pin<Box<dyn Stream<Item = NarrationEvent> + Send>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_event_wire_shape() {
        let event = NarrationEvent::Chunk {
            index: 2,
            audio: "AAAA".into(),
            progress: 75.0,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "chunk");
        assert_eq!(json["index"], 2);
        assert_eq!(json["progress"], 75.0);
    }

    #[test]
    fn start_event_uses_camel_case_fields() {
        let event = NarrationEvent::Start {
            total_chunks: 4,
            estimated_duration: 66.6,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "start");
        assert_eq!(json["totalChunks"], 4);
        assert!(json.get("estimatedDuration").is_some());
    }
}
