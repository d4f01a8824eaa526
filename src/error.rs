//! Error types for the conversion pipeline.
//!
//! Each stage has its own error enum so the pipeline can decide, per failure,
//! whether to abort the run, skip the chapter, or skip a single chunk.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while opening and extracting text from an EPUB.
///
/// Extraction failures are fatal: if the book cannot be read, nothing is written.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to open EPUB: {0}")]
    Open(String),

    #[error("no readable content found in EPUB file")]
    NoReadableContent,
}

/// Errors raised while splitting chapter text into chunks.
///
/// These should not occur for well-formed input; if one does, the chapter is
/// skipped and the run continues.
#[derive(Debug, Error)]
pub enum ChunkingError {
    #[error("chapter text is empty after normalization")]
    EmptyText,
}

/// Errors raised by a TTS backend for a single chunk.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("TTS engine failed: {0}")]
    Engine(String),

    #[error("TTS engine produced no audio")]
    NoAudio,

    #[error("synthesis interrupted by user")]
    Interrupted,

    #[error("I/O error during synthesis: {0}")]
    Io(#[from] std::io::Error),
}

impl SynthesisError {
    /// Whether this failure should abort the whole run instead of skipping
    /// the chunk. Only a user interrupt qualifies.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SynthesisError::Interrupted)
    }
}

/// Errors raised while concatenating audio buffers.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("no audio buffers to assemble")]
    EmptyInput,

    #[error("sample rate mismatch: expected {expected} Hz, found {found} Hz")]
    SampleRateMismatch { expected: u32, found: u32 },
}

/// Error raised by the optional combine step.
///
/// Combine failures never invalidate the per-chapter files already written;
/// the run still succeeds if at least one chapter file exists.
#[derive(Debug, Error)]
#[error("failed to combine chapters: {0}")]
pub struct CombineError(pub String);

/// Pre-flight validation errors. These are fatal before any work starts.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("input file must be an EPUB file: {0}")]
    NotAnEpub(PathBuf),

    #[error("invalid voice: {0}")]
    InvalidVoice(String),

    #[error("invalid output format: {0}")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembly_error_display() {
        let err = AssemblyError::SampleRateMismatch {
            expected: 24000,
            found: 22050,
        };
        assert_eq!(
            err.to_string(),
            "sample rate mismatch: expected 24000 Hz, found 22050 Hz"
        );
    }

    #[test]
    fn test_interrupt_is_fatal() {
        assert!(SynthesisError::Interrupted.is_fatal());
        assert!(!SynthesisError::Engine("boom".to_string()).is_fatal());
        assert!(!SynthesisError::NoAudio.is_fatal());
    }
}
