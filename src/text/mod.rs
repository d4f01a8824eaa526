//! Text processing for TTS: normalization, chunking, duration estimation.

pub mod chunker;
pub mod duration;
pub mod normalizer;

pub use chunker::DEFAULT_MAX_CHARS;
pub use normalizer::normalize;

/// A bounded-length fragment of chapter text, ready for speech synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// 1-based index of the chapter this chunk belongs to.
    pub chapter_index: usize,
    /// 0-based position of this chunk within its chapter.
    pub sequence: usize,
    /// The chunk text.
    pub content: String,
}

impl TextChunk {
    /// Create a new text chunk.
    pub fn new(chapter_index: usize, sequence: usize, content: String) -> Self {
        Self {
            chapter_index,
            sequence,
            content,
        }
    }
}

/// Normalize a chapter's raw text and split it into ordered chunks.
///
/// Returns an empty vector when the chapter has no speakable text.
pub fn process_chapter(chapter_index: usize, raw_text: &str, max_chars: usize) -> Vec<TextChunk> {
    let normalized = normalizer::normalize(raw_text);

    chunker::chunk(&normalized, max_chars)
        .into_iter()
        .enumerate()
        .map(|(sequence, content)| TextChunk::new(chapter_index, sequence, content))
        .collect()
}
