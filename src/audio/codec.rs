//! Audio file reading and writing.
//!
//! WAV files are handled natively with `hound`. Compressed formats (mp3, ogg)
//! go through an ffmpeg subprocess: the buffer is written to a temporary WAV
//! and transcoded, mirroring how decoding of non-WAV input works in reverse.

use super::AudioBuffer;
use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use std::process::Command;

/// Supported output container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Wav,
    Mp3,
    Ogg,
}

impl OutputFormat {
    /// Determine the format from a path's extension.
    ///
    /// Unrecognized or missing extensions default to mp3.
    pub fn from_extension(path: &Path) -> Self {
        match path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("wav") => OutputFormat::Wav,
            Some("ogg") => OutputFormat::Ogg,
            _ => OutputFormat::Mp3,
        }
    }

    /// Parse a format name as given on the command line.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "wav" => Some(OutputFormat::Wav),
            "mp3" => Some(OutputFormat::Mp3),
            "ogg" => Some(OutputFormat::Ogg),
            _ => None,
        }
    }

    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Wav => "wav",
            OutputFormat::Mp3 => "mp3",
            OutputFormat::Ogg => "ogg",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Get the ffmpeg command.
fn ffmpeg_command() -> Command {
    Command::new("ffmpeg")
}

/// Check if ffmpeg is available on this system.
pub fn is_ffmpeg_available() -> bool {
    ffmpeg_command()
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Write an audio buffer to a file in the given format.
pub fn write(buffer: &AudioBuffer, path: &Path, format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    match format {
        OutputFormat::Wav => write_wav(buffer, path),
        OutputFormat::Mp3 | OutputFormat::Ogg => write_via_ffmpeg(buffer, path),
    }
}

/// Read an audio file into a buffer.
///
/// WAV is read directly; anything else is decoded to a temporary WAV with
/// ffmpeg first. Multi-channel input is downmixed to mono.
pub fn read(path: &Path) -> Result<AudioBuffer> {
    match OutputFormat::from_extension(path) {
        OutputFormat::Wav => read_wav(path),
        _ => read_via_ffmpeg(path),
    }
}

fn write_wav(buffer: &AudioBuffer, path: &Path) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;

    for &sample in &buffer.samples {
        writer.write_sample(sample)?;
    }

    writer.finalize()?;
    Ok(())
}

fn read_wav(path: &Path) -> Result<AudioBuffer> {
    let reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

    let spec = reader.spec();
    let sample_rate = spec.sample_rate;
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            let max_val = (1i64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    // Downmix to mono by averaging channels
    let mono_samples = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok(AudioBuffer::new(mono_samples, sample_rate))
}

fn write_via_ffmpeg(buffer: &AudioBuffer, path: &Path) -> Result<()> {
    let temp_dir = tempfile::TempDir::new()?;
    let temp_wav = temp_dir.path().join("encode_input.wav");
    write_wav(buffer, &temp_wav)?;

    let output = ffmpeg_command()
        .args(["-y", "-i"])
        .arg(&temp_wav)
        .arg(path)
        .output()
        .context("Failed to run ffmpeg. Is ffmpeg installed?")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("ffmpeg encoding failed: {}", stderr);
    }

    Ok(())
}

fn read_via_ffmpeg(path: &Path) -> Result<AudioBuffer> {
    let temp_dir = tempfile::TempDir::new()?;
    let temp_wav = temp_dir.path().join("decode_output.wav");

    let output = ffmpeg_command()
        .args(["-y", "-i"])
        .arg(path)
        .arg(&temp_wav)
        .output()
        .context("Failed to run ffmpeg. Is ffmpeg installed?")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("ffmpeg decoding failed: {}", stderr);
    }

    read_wav(&temp_wav)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            OutputFormat::from_extension(&PathBuf::from("a.wav")),
            OutputFormat::Wav
        );
        assert_eq!(
            OutputFormat::from_extension(&PathBuf::from("a.ogg")),
            OutputFormat::Ogg
        );
        assert_eq!(
            OutputFormat::from_extension(&PathBuf::from("a.mp3")),
            OutputFormat::Mp3
        );
        // Unrecognized extensions default to mp3
        assert_eq!(
            OutputFormat::from_extension(&PathBuf::from("a.flac")),
            OutputFormat::Mp3
        );
        assert_eq!(
            OutputFormat::from_extension(&PathBuf::from("noext")),
            OutputFormat::Mp3
        );
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("wav"), Some(OutputFormat::Wav));
        assert_eq!(OutputFormat::parse("MP3"), Some(OutputFormat::Mp3));
        assert_eq!(OutputFormat::parse("ogg"), Some(OutputFormat::Ogg));
        assert_eq!(OutputFormat::parse("m4b"), None);
    }

    #[test]
    fn test_wav_round_trip() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("test.wav");

        let buffer = AudioBuffer::new(vec![0.0, 0.25, -0.5, 1.0], 24000);
        write(&buffer, &path, OutputFormat::Wav).unwrap();

        let loaded = read(&path).unwrap();
        assert_eq!(loaded.sample_rate, 24000);
        assert_eq!(loaded.samples.len(), 4);
        for (a, b) in buffer.samples.iter().zip(loaded.samples.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("test.wav");

        let buffer = AudioBuffer::new(vec![0.1; 100], 24000);
        write(&buffer, &path, OutputFormat::Wav).unwrap();
        assert!(path.exists());
    }
}
