//! Property tests for text normalization and chunking.

use epub_narrator::text::{chunker, normalizer};
use proptest::prelude::*;

proptest! {
    /// Every chunk stays within the limit, except when a single word is
    /// itself longer than the limit (documented boundary case).
    #[test]
    fn chunks_respect_max_chars(
        text in "[ a-zA-Z,.!?'\n]{0,600}",
        max_chars in 20usize..200,
    ) {
        let normalized = normalizer::normalize(&text);
        for chunk in chunker::chunk(&normalized, max_chars) {
            let longest_word = chunk
                .split_whitespace()
                .map(|w| w.chars().count())
                .max()
                .unwrap_or(0);
            prop_assert!(
                chunk.chars().count() <= max_chars || longest_word > max_chars,
                "chunk over limit without an over-long word: {chunk:?}"
            );
        }
    }

    /// Chunks are never empty and always trimmed.
    #[test]
    fn chunks_are_trimmed_and_non_empty(
        text in "[ a-zA-Z,.!?\n]{0,600}",
        max_chars in 5usize..100,
    ) {
        let normalized = normalizer::normalize(&text);
        for chunk in chunker::chunk(&normalized, max_chars) {
            prop_assert!(!chunk.is_empty());
            prop_assert_eq!(chunk.trim(), chunk.as_str());
        }
    }

    /// Joining chunks with single spaces loses or duplicates no words.
    #[test]
    fn chunking_preserves_word_sequence(
        text in "[ a-zA-Z,.!?\n]{0,600}",
        max_chars in 20usize..200,
    ) {
        let normalized = normalizer::normalize(&text);
        let chunks = chunker::chunk(&normalized, max_chars);

        let original_words: Vec<&str> = normalized.split_whitespace().collect();
        let joined = chunks.join(" ");
        let chunk_words: Vec<&str> = joined.split_whitespace().collect();

        prop_assert_eq!(original_words, chunk_words);
    }

    /// normalize(normalize(t)) == normalize(t) for arbitrary input.
    #[test]
    fn normalize_is_idempotent(text in ".{0,400}") {
        let once = normalizer::normalize(&text);
        prop_assert_eq!(normalizer::normalize(&once), once);
    }

    /// Normalized output never contains the characters the pass removes.
    #[test]
    fn normalize_output_is_clean(text in ".{0,400}") {
        let out = normalizer::normalize(&text);
        prop_assert!(!out.contains('\r'));
        prop_assert!(!out.contains('\t'));
        prop_assert!(!out.contains('\u{2026}'), "ellipsis character survived");
        prop_assert!(!out.contains('\u{201c}'), "smart quote survived");
        prop_assert!(!out.contains("  "));
        prop_assert!(!out.contains("http://"));
        prop_assert!(!out.contains("https://"));
    }
}
