//! epub-narrator - convert EPUB e-books into narrated audiobooks.
//!
//! The pipeline extracts ordered chapters from an EPUB, normalizes and splits
//! each chapter into bounded speech-safe chunks, synthesizes each chunk with
//! the Kokoro TTS engine, and reassembles the resulting audio into per-chapter
//! files and, optionally, one combined audiobook.

pub mod audio;
pub mod config;
pub mod epub;
pub mod error;
pub mod pipeline;
pub mod text;
pub mod tts;
