//! Concatenation of per-chunk and per-chapter audio buffers.
//!
//! Ordering is load-bearing everywhere in this module: the input slices arrive
//! in reading order and the output must reproduce it exactly.

use super::AudioBuffer;
use crate::error::AssemblyError;

/// Silence inserted between chapters in the combined audiobook, in milliseconds.
pub const DEFAULT_SILENCE_MS: u32 = 2000;

/// Generate a silent buffer of the given duration.
pub fn silence(duration_ms: u32, sample_rate: u32) -> AudioBuffer {
    let sample_count = (sample_rate as u64 * duration_ms as u64 / 1000) as usize;
    AudioBuffer::new(vec![0.0; sample_count], sample_rate)
}

/// Concatenate per-chunk buffers into a single chapter buffer.
///
/// Fails with [`AssemblyError::EmptyInput`] if no buffers are given and
/// [`AssemblyError::SampleRateMismatch`] if the buffers disagree on sample
/// rate. A mismatch is never resampled or truncated silently.
pub fn assemble_chapter(chunk_buffers: &[AudioBuffer]) -> Result<AudioBuffer, AssemblyError> {
    let sample_rate = common_sample_rate(chunk_buffers)?;

    let total: usize = chunk_buffers.iter().map(|b| b.len()).sum();
    let mut samples = Vec::with_capacity(total);
    for buffer in chunk_buffers {
        samples.extend_from_slice(&buffer.samples);
    }

    Ok(AudioBuffer::new(samples, sample_rate))
}

/// Concatenate chapter buffers into a whole-book buffer.
///
/// A silence of `silence_ms` is inserted between every pair of consecutive
/// chapters; there is no leading or trailing silence.
pub fn assemble_book(
    chapter_buffers: &[AudioBuffer],
    silence_ms: u32,
) -> Result<AudioBuffer, AssemblyError> {
    let sample_rate = common_sample_rate(chapter_buffers)?;
    let gap = silence(silence_ms, sample_rate);

    let total: usize = chapter_buffers.iter().map(|b| b.len()).sum::<usize>()
        + gap.len() * (chapter_buffers.len() - 1);
    let mut samples = Vec::with_capacity(total);

    for (i, buffer) in chapter_buffers.iter().enumerate() {
        if i > 0 {
            samples.extend_from_slice(&gap.samples);
        }
        samples.extend_from_slice(&buffer.samples);
    }

    Ok(AudioBuffer::new(samples, sample_rate))
}

/// Validate that all buffers share one sample rate and return it.
fn common_sample_rate(buffers: &[AudioBuffer]) -> Result<u32, AssemblyError> {
    let first = buffers.first().ok_or(AssemblyError::EmptyInput)?;
    for buffer in &buffers[1..] {
        if buffer.sample_rate != first.sample_rate {
            return Err(AssemblyError::SampleRateMismatch {
                expected: first.sample_rate,
                found: buffer.sample_rate,
            });
        }
    }
    Ok(first.sample_rate)
}
