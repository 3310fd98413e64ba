//! Sentence boundary detection shared by the normalizer and chunker.

const SENTENCE_ENDINGS: &[char] = &['.', '!', '?'];

/// Whether `text` ends with sentence-terminating punctuation.
pub(crate) fn ends_sentence(text: &str) -> bool {
    text.chars()
        .last()
        .is_some_and(|ch| SENTENCE_ENDINGS.contains(&ch))
}

/// Split text into sentences, keeping terminal punctuation.
///
/// A boundary is an ending character followed by whitespace or the end
/// of input, so abbreviations like `e.g.` and runs like `...` stay in
/// one piece. Inter-sentence whitespace is dropped; on normalized input
/// (single spaces) re-joining with `" "` reproduces the text exactly.
pub(crate) fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        let at_boundary = SENTENCE_ENDINGS.contains(&ch)
            && chars.peek().is_none_or(|next| next.is_whitespace());
        if at_boundary {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation() {
        let sentences = split_sentences("One. Two! Three?");
        assert_eq!(sentences, vec!["One.", "Two!", "Three?"]);
    }

    #[test]
    fn keeps_abbreviations_together() {
        let sentences = split_sentences("See e.g. the appendix. Done.");
        assert_eq!(sentences, vec!["See e.g. the appendix.", "Done."]);
    }

    #[test]
    fn keeps_ellipses_together() {
        let sentences = split_sentences("Well... maybe. Sure.");
        assert_eq!(sentences, vec!["Well... maybe.", "Sure."]);
    }

    #[test]
    fn trailing_fragment_is_kept() {
        let sentences = split_sentences("Complete. trailing words");
        assert_eq!(sentences, vec!["Complete.", "trailing words"]);
    }

    #[test]
    fn rejoining_reproduces_normalized_text() {
        let text = "One. Two! Three? And a tail";
        assert_eq!(split_sentences(text).join(" "), text);
    }
}
