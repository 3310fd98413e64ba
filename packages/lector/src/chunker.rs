//! Bounded-length chunking on sentence boundaries.
//!
//! Accumulates whole sentences until the next one would exceed the
//! limit, then cuts. A sentence longer than the limit itself is
//! hard-split, preferring the last whitespace inside the window. A
//! final pass removes sentences accidentally duplicated across a chunk
//! boundary, an artifact of naive splitting upstream.

use lector_domain::TextChunk;
use tracing::debug;

use crate::sentences::{ends_sentence, split_sentences};

/// Smallest chunk cap that still produces well-formed provider calls.
pub const MIN_CHUNK_CHARS: usize = 120;
/// Largest chunk the provider accepts comfortably.
pub const MAX_CHUNK_CHARS: usize = 300;

/// Chunker output plus boundary-dedup bookkeeping.
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    pub chunks: Vec<TextChunk>,
    /// Sentences removed because they straddled a chunk boundary twice.
    pub boundary_duplicates_removed: usize,
}

/// Clamp a caller-supplied chunk cap into the safe band.
pub fn clamp_chunk_chars(requested: usize) -> usize {
    requested.clamp(MIN_CHUNK_CHARS, MAX_CHUNK_CHARS)
}

/// Split normalized text into ordered, bounded chunks.
pub fn chunk_text(text: &str, max_chunk_chars: usize) -> ChunkPlan {
    let limit = clamp_chunk_chars(max_chunk_chars);
    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        let sentence_len = sentence.chars().count();

        if sentence_len > limit {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
            pieces.extend(hard_split(&sentence, limit));
            continue;
        }

        if current.is_empty() {
            current = sentence;
        } else if current.chars().count() + 1 + sentence_len > limit {
            pieces.push(std::mem::take(&mut current));
            current = sentence;
        } else {
            current.push(' ');
            current.push_str(&sentence);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    let (pieces, boundary_duplicates_removed) = dedup_boundaries(pieces);
    if boundary_duplicates_removed > 0 {
        debug!(
            removed = boundary_duplicates_removed,
            "dropped boundary-duplicated sentences"
        );
    }

    let chunks = pieces
        .into_iter()
        .enumerate()
        .map(|(index, text)| TextChunk::new(index, text))
        .collect();
    ChunkPlan {
        chunks,
        boundary_duplicates_removed,
    }
}

/// Split an overlong sentence, cutting at the last whitespace inside
/// each window and at a character boundary when there is none.
fn hard_split(sentence: &str, limit: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut rest = sentence;

    while rest.chars().count() > limit {
        let window_end = rest
            .char_indices()
            .nth(limit)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(rest.len());
        let window = &rest[..window_end];

        match window.rfind(char::is_whitespace) {
            Some(cut) if cut > 0 => {
                pieces.push(rest[..cut].to_string());
                rest = rest[cut..].trim_start();
            }
            _ => {
                pieces.push(window.to_string());
                rest = &rest[window_end..];
            }
        }
    }
    if !rest.is_empty() {
        pieces.push(rest.to_string());
    }
    pieces
}

/// Remove a sentence duplicated across the end of chunk `i` and the
/// start of chunk `i+1`.
///
/// Only whole, punctuation-terminated sentences count; equal hard-split
/// fragments of repetitive text are left alone.
fn dedup_boundaries(pieces: Vec<String>) -> (Vec<String>, usize) {
    let mut removed = 0usize;
    let mut out: Vec<String> = Vec::with_capacity(pieces.len());

    for piece in pieces {
        let Some(previous) = out.last() else {
            out.push(piece);
            continue;
        };
        let prev_last = split_sentences(previous).pop();
        let mut sentences = split_sentences(&piece);
        let duplicated = sentences
            .first()
            .is_some_and(|first| ends_sentence(first) && prev_last.as_deref() == Some(first));
        if duplicated {
            sentences.remove(0);
            removed += 1;
            if sentences.is_empty() {
                continue;
            }
            out.push(sentences.join(" "));
        } else {
            out.push(piece);
        }
    }
    (out, removed)
}
