//! Text normalization for speech.
//!
//! Strips markup and symbols the speech model cannot pronounce, then
//! removes sentences repeated anywhere in the document, a guard
//! against upstream content-generation bugs that duplicate output.

use std::collections::HashSet;

use tracing::info;

use crate::sentences::split_sentences;

/// Normalizer output: speech-safe text plus dedup bookkeeping.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    pub text: String,
    /// How many duplicate sentences were dropped (observability only).
    pub removed_duplicates: usize,
}

/// Normalize raw document text into speech-safe form.
pub fn normalize(raw: &str) -> NormalizedText {
    let stripped = strip_markup(raw);
    let collapsed: String = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let (text, removed_duplicates) = dedup_sentences(&collapsed);
    if removed_duplicates > 0 {
        info!(removed = removed_duplicates, "dropped duplicate sentences");
    }
    NormalizedText {
        text,
        removed_duplicates,
    }
}

/// Replace markup and unpronounceable symbols with spaces.
///
/// Markdown link syntax keeps its label and loses the URL; inline HTML
/// tags are dropped whole. Everything else is filtered per character.
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '[' => {
                // [label](url) -> label
                for inner in chars.by_ref() {
                    if inner == ']' {
                        break;
                    }
                    push_spoken(&mut out, inner);
                }
                if chars.peek() == Some(&'(') {
                    for inner in chars.by_ref() {
                        if inner == ')' {
                            break;
                        }
                    }
                }
            }
            '<' => {
                for inner in chars.by_ref() {
                    if inner == '>' {
                        break;
                    }
                }
                out.push(' ');
            }
            _ => push_spoken(&mut out, ch),
        }
    }
    out
}

fn push_spoken(out: &mut String, ch: char) {
    if is_spoken_char(ch) {
        out.push(ch);
    } else {
        out.push(' ');
    }
}

/// Characters the speech model renders sensibly.
fn is_spoken_char(ch: char) -> bool {
    ch.is_alphanumeric()
        || ch.is_whitespace()
        || matches!(
            ch,
            '.' | ',' | '!' | '?' | ';' | ':' | '\'' | '"' | '(' | ')' | '-' | '%' | '$' | '/'
        )
}

/// Keep only the first occurrence of each sentence.
fn dedup_sentences(text: &str) -> (String, usize) {
    let sentences = split_sentences(text);
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(sentences.len());
    let mut removed = 0usize;

    for sentence in sentences {
        if seen.insert(sentence.clone()) {
            kept.push(sentence);
        } else {
            removed += 1;
        }
    }
    (kept.join(" "), removed)
}
