//! Greedy boundary-aware text chunking for TTS processing.
//!
//! Splitting happens at three levels, falling back only when the level above
//! cannot fit the limit: paragraphs, then sentences, then whitespace-delimited
//! words. Output order is strictly input order.

/// Default maximum chunk size in characters.
pub const DEFAULT_MAX_CHARS: usize = 500;

/// Split text into TTS-friendly chunks of at most `max_chars` characters.
///
/// Paragraphs (separated by a blank line) that fit the limit are emitted
/// verbatim. Longer paragraphs are accumulated sentence by sentence; a single
/// sentence over the limit is split on word boundaries. A lone word longer
/// than `max_chars` is emitted as-is rather than split mid-word.
///
/// Every emitted chunk is trimmed and non-empty. Empty input yields an empty
/// vector.
pub fn chunk(text: &str, max_chars: usize) -> Vec<String> {
    debug_assert!(max_chars > 0);

    let mut chunks = Vec::new();

    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        if char_len(paragraph) <= max_chars {
            chunks.push(paragraph.to_string());
            continue;
        }

        chunk_paragraph(paragraph, max_chars, &mut chunks);
    }

    chunks
}

/// Split an over-long paragraph into chunks at sentence boundaries,
/// falling back to word boundaries for over-long sentences.
fn chunk_paragraph(paragraph: &str, max_chars: usize, chunks: &mut Vec<String>) {
    let mut current = String::new();

    for sentence in split_sentences(paragraph) {
        if char_len(&current) + char_len(&sentence) + 1 > max_chars {
            if !current.is_empty() {
                chunks.push(current.trim().to_string());
                current.clear();
            }

            if char_len(&sentence) > max_chars {
                // Resume sentence accumulation from the word-split remainder
                current = split_words(&sentence, max_chars, chunks);
            } else {
                current = sentence;
            }
        } else if current.is_empty() {
            current = sentence;
        } else {
            current.push(' ');
            current.push_str(&sentence);
        }
    }

    let trailing = current.trim();
    if !trailing.is_empty() {
        chunks.push(trailing.to_string());
    }
}

/// Accumulate words of an over-long sentence into chunks, returning the
/// unflushed remainder.
fn split_words(sentence: &str, max_chars: usize, chunks: &mut Vec<String>) -> String {
    let mut current = String::new();

    for word in sentence.split_whitespace() {
        if char_len(&current) + char_len(word) + 1 > max_chars {
            if !current.is_empty() {
                chunks.push(current.trim().to_string());
            }
            current = word.to_string();
        } else if current.is_empty() {
            current = word.to_string();
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }

    current
}

/// Split a paragraph into sentences on terminal punctuation (`.`, `!`, `?`)
/// followed by whitespace.
///
/// This is a deliberate heuristic: abbreviations like "Mr. Smith" split too.
fn split_sentences(paragraph: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = paragraph.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            // Consume the whitespace separator
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            sentences.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}

/// Character count, not byte length.
fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(chunk("", 500).is_empty());
        assert!(chunk("   \n\n   ", 500).is_empty());
    }

    #[test]
    fn test_short_paragraph_emitted_verbatim() {
        let chunks = chunk("Hello world. How are you?", 500);
        assert_eq!(chunks, vec!["Hello world. How are you?"]);
    }

    #[test]
    fn test_paragraphs_become_separate_chunks() {
        let chunks = chunk("First paragraph.\n\nSecond paragraph.", 500);
        assert_eq!(chunks, vec!["First paragraph.", "Second paragraph."]);
    }

    #[test]
    fn test_sentence_boundary_split() {
        let text = "One two three four. Five six seven eight. Nine ten.";
        let chunks = chunk(text, 25);
        assert_eq!(
            chunks,
            vec!["One two three four.", "Five six seven eight.", "Nine ten."]
        );
    }

    #[test]
    fn test_sentences_accumulate_up_to_limit() {
        let text = "Aa bb. Cc dd. Ee ff.";
        let chunks = chunk(text, 14);
        assert_eq!(chunks, vec!["Aa bb. Cc dd.", "Ee ff."]);
    }

    #[test]
    fn test_long_sentence_falls_back_to_words() {
        let text = "one two three four five six seven eight nine ten";
        let chunks = chunk(text, 20);
        assert!(chunks.len() > 1);
        for c in &chunks {
            assert!(c.chars().count() <= 20, "chunk too long: {c:?}");
        }
        let rejoined = chunks.join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_single_word_over_limit_not_split() {
        let text = "Supercalifragilisticexpialidocious is long.";
        let chunks = chunk(text, 10);
        assert!(chunks.contains(&"Supercalifragilisticexpialidocious".to_string()));
    }

    #[test]
    fn test_no_empty_chunks() {
        let text = "A. B. C.\n\n\n\nD.";
        for c in chunk(text, 3) {
            assert!(!c.trim().is_empty());
        }
    }

    #[test]
    fn test_order_preserved() {
        let text = "Alpha one. Beta two. Gamma three. Delta four.";
        let chunks = chunk(text, 22);
        let rejoined = chunks.join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_hello_world_scenario() {
        // 650-character paragraph, max 500: exactly two chunks, the first
        // ending at a sentence boundary.
        let text = "Hello world. ".repeat(50);
        let chunks = chunk(text.trim(), 500);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].chars().count() <= 500);
        assert!(chunks[0].ends_with('.'));
        let rejoined = chunks.join(" ");
        assert_eq!(rejoined, text.trim());
    }

    #[test]
    fn test_split_sentences_terminal_punctuation() {
        let sentences = split_sentences("Wait! Really? Yes. Done");
        assert_eq!(sentences, vec!["Wait!", "Really?", "Yes.", "Done"]);
    }

    #[test]
    fn test_split_sentences_keeps_ellipsis_together() {
        let sentences = split_sentences("Well... maybe. Sure.");
        assert_eq!(sentences, vec!["Well...", "maybe.", "Sure."]);
    }
}
