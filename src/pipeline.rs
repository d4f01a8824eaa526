//! Conversion pipeline coordinator.
//!
//! Drives chapter iteration: chunk the text, synthesize each chunk in order,
//! assemble the chapter buffer, write it out, and optionally combine all
//! chapter files into one audiobook. Failures are contained at the smallest
//! enclosing unit: a failed chunk is dropped from its chapter, a failed
//! chapter is dropped from the run, and only extraction failure or an empty
//! output set fails the run as a whole.

use crate::audio::codec::{self, OutputFormat};
use crate::audio::{assembler, AudioBuffer};
use crate::epub::{Book, Chapter};
use crate::error::{ChunkingError, CombineError};
use crate::text::{self, duration};
use crate::tts::Synthesizer;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Options controlling one conversion run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory receiving chapter files (created if absent).
    pub output_dir: PathBuf,
    /// Format for chapter files.
    pub format: OutputFormat,
    /// Maximum characters per synthesized chunk.
    pub max_chars: usize,
    /// Narration speed for duration estimates.
    pub words_per_minute: u32,
}

/// Result of a conversion run.
#[derive(Debug)]
pub struct RunOutput {
    /// Chapter files actually written, in chapter order. May be shorter than
    /// the book's chapter count when chapters were skipped.
    pub chapter_files: Vec<PathBuf>,
    /// Number of chapters the run attempted.
    pub chapters_attempted: usize,
    /// Estimated spoken duration of everything written, in seconds.
    pub estimated_seconds: f64,
}

/// Convert every chapter of `book` to an audio file.
///
/// Chapters are processed strictly in order, and chunks strictly in sequence
/// within each chapter; the output must reproduce reading order exactly.
/// Returns an error only for fatal conditions (user interrupt); per-chapter
/// and per-chunk failures are logged and skipped.
pub fn generate_audiobook(
    book: &Book,
    synthesizer: &dyn Synthesizer,
    options: &PipelineOptions,
) -> Result<RunOutput> {
    std::fs::create_dir_all(&options.output_dir)?;

    info!(
        "starting audiobook generation: \"{}\" by {} ({} chapters, ~{} words)",
        book.title,
        book.author,
        book.chapters.len(),
        book.total_words()
    );

    let pb = ProgressBar::new(book.chapters.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} chapters {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut chapter_files = Vec::new();
    let mut estimated_seconds = 0.0;

    for chapter in &book.chapters {
        pb.set_message(chapter.title.clone());

        if let Some((path, seconds)) = process_one_chapter(chapter, synthesizer, options)? {
            estimated_seconds += seconds;
            chapter_files.push(path);
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    info!(
        "generation complete: {}/{} chapters written, estimated duration {}",
        chapter_files.len(),
        book.chapters.len(),
        duration::format_duration(estimated_seconds)
    );

    Ok(RunOutput {
        chapter_files,
        chapters_attempted: book.chapters.len(),
        estimated_seconds,
    })
}

/// Process a single chapter. Returns `Ok(None)` when the chapter was skipped;
/// an `Err` is fatal to the whole run.
fn process_one_chapter(
    chapter: &Chapter,
    synthesizer: &dyn Synthesizer,
    options: &PipelineOptions,
) -> Result<Option<(PathBuf, f64)>> {
    let chunks = text::process_chapter(chapter.index, &chapter.raw_text, options.max_chars);
    if chunks.is_empty() {
        warn!(
            "skipping chapter {} ({}): {}",
            chapter.index,
            chapter.title,
            ChunkingError::EmptyText
        );
        return Ok(None);
    }

    let speakable: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
    let seconds = duration::estimate_seconds(&speakable.join(" "), options.words_per_minute);
    info!(
        "chapter {} ({}): {} chunks, estimated {}",
        chapter.index,
        chapter.title,
        chunks.len(),
        duration::format_duration(seconds)
    );

    // Synthesize chunks strictly in sequence order
    let mut buffers: Vec<AudioBuffer> = Vec::new();
    for chunk in &chunks {
        match synthesizer.synthesize(&chunk.content) {
            Ok(segments) => buffers.extend(segments),
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                warn!(
                    "chapter {} chunk {}: synthesis failed, dropping chunk: {}",
                    chapter.index, chunk.sequence, e
                );
            }
        }
    }

    let chapter_audio = match assembler::assemble_chapter(&buffers) {
        Ok(audio) => audio,
        Err(e) => {
            warn!(
                "skipping chapter {} ({}): {}",
                chapter.index, chapter.title, e
            );
            return Ok(None);
        }
    };

    let path = options
        .output_dir
        .join(chapter_filename(chapter.index, &chapter.title, options.format));

    if let Err(e) = codec::write(&chapter_audio, &path, options.format) {
        warn!(
            "skipping chapter {} ({}): failed to write {}: {}",
            chapter.index,
            chapter.title,
            path.display(),
            e
        );
        return Ok(None);
    }

    info!(
        "chapter {} written: {} ({})",
        chapter.index,
        path.display(),
        duration::format_duration(chapter_audio.duration_secs())
    );

    Ok(Some((path, seconds)))
}

/// Combine chapter files into a single audiobook with inter-chapter silence.
///
/// Chapter files that fail to load are skipped with a warning, matching the
/// per-chapter skip policy of the generation loop. Fails only when nothing
/// could be read, assembled, or written.
pub fn combine_chapters(
    chapter_files: &[PathBuf],
    output_path: &Path,
    silence_ms: u32,
) -> Result<PathBuf, CombineError> {
    info!("combining {} chapters into one file", chapter_files.len());

    let mut buffers = Vec::new();
    for file in chapter_files {
        match codec::read(file) {
            Ok(buffer) => buffers.push(buffer),
            Err(e) => warn!("error loading {}: {}", file.display(), e),
        }
    }

    let combined = assembler::assemble_book(&buffers, silence_ms)
        .map_err(|e| CombineError(e.to_string()))?;

    let format = OutputFormat::from_extension(output_path);
    codec::write(&combined, output_path, format).map_err(|e| CombineError(e.to_string()))?;

    info!("combined audiobook saved to {}", output_path.display());
    Ok(output_path.to_path_buf())
}

/// Build the per-chapter output file name:
/// `chapter_{3-digit index}_{sanitized title}.{ext}`.
pub fn chapter_filename(index: usize, title: &str, format: OutputFormat) -> String {
    format!(
        "chapter_{:03}_{}.{}",
        index,
        sanitize_filename(title),
        format.extension()
    )
}

/// Strip characters that are invalid in file names, cap the length, and
/// replace spaces with underscores.
pub fn sanitize_filename(name: &str) -> String {
    const INVALID: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

    let cleaned: String = name.chars().filter(|c| !INVALID.contains(c)).collect();
    let truncated: String = cleaned.chars().take(100).collect();
    truncated.replace(' ', "_")
}
