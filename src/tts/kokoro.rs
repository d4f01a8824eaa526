//! Kokoro TTS backend.
//!
//! Model inference runs in a Python subprocess: the chunk text goes to a temp
//! file, a small driver script runs the Kokoro pipeline and writes a WAV, and
//! the WAV is read back into an [`AudioBuffer`]. Keeping inference out of
//! process means a model crash can never take the converter down with it.

use super::{is_valid_voice, Synthesizer, SAMPLE_RATE};
use crate::audio::{codec, AudioBuffer};
use crate::error::{ConfigurationError, SynthesisError};
use log::debug;
use std::path::Path;
use std::process::Command;

/// Python driver: reads text from argv[1], writes 24 kHz WAV to argv[2],
/// using the voice in argv[3].
const KOKORO_DRIVER: &str = r#"
import sys
import numpy as np
import soundfile as sf
from kokoro import KPipeline

with open(sys.argv[1], encoding="utf-8") as f:
    text = f.read()

pipeline = KPipeline(lang_code=sys.argv[3][0])
segments = [audio for _, _, audio in pipeline(text, voice=sys.argv[3], speed=1.0)]
if not segments:
    sys.exit(3)
sf.write(sys.argv[2], np.concatenate(segments), 24000)
"#;

/// Exit code the driver uses when the model produced no audio.
const EXIT_NO_AUDIO: i32 = 3;

/// Kokoro TTS engine driving a Python subprocess per chunk.
#[derive(Debug)]
pub struct KokoroEngine {
    voice: String,
    python: String,
}

impl KokoroEngine {
    /// Create an engine for the given voice.
    ///
    /// Fails if the voice is not in the catalogue. The Python interpreter is
    /// taken from `EPUB_NARRATOR_PYTHON` when set, otherwise `python3`.
    pub fn new(voice: &str) -> Result<Self, ConfigurationError> {
        if !is_valid_voice(voice) {
            return Err(ConfigurationError::InvalidVoice(voice.to_string()));
        }

        let python =
            std::env::var("EPUB_NARRATOR_PYTHON").unwrap_or_else(|_| "python3".to_string());

        Ok(Self {
            voice: voice.to_string(),
            python,
        })
    }

    fn run_driver(&self, text_path: &Path, wav_path: &Path) -> Result<(), SynthesisError> {
        let output = Command::new(&self.python)
            .arg("-c")
            .arg(KOKORO_DRIVER)
            .arg(text_path)
            .arg(wav_path)
            .arg(&self.voice)
            .output()?;

        if output.status.success() {
            return Ok(());
        }

        if was_interrupted(&output.status) {
            return Err(SynthesisError::Interrupted);
        }

        if output.status.code() == Some(EXIT_NO_AUDIO) {
            return Err(SynthesisError::NoAudio);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(SynthesisError::Engine(
            stderr.lines().last().unwrap_or("unknown error").to_string(),
        ))
    }
}

impl Synthesizer for KokoroEngine {
    fn synthesize(&self, text: &str) -> Result<Vec<AudioBuffer>, SynthesisError> {
        if text.trim().is_empty() {
            return Err(SynthesisError::NoAudio);
        }

        let temp_dir = tempfile::TempDir::new()?;
        let text_path = temp_dir.path().join("chunk.txt");
        let wav_path = temp_dir.path().join("chunk.wav");
        std::fs::write(&text_path, text)?;

        debug!("synthesizing {} chars with voice {}", text.len(), self.voice);
        self.run_driver(&text_path, &wav_path)?;

        let buffer = codec::read(&wav_path)
            .map_err(|e| SynthesisError::Engine(format!("failed to read engine output: {e}")))?;

        if buffer.is_empty() {
            return Err(SynthesisError::NoAudio);
        }
        if buffer.sample_rate != SAMPLE_RATE {
            return Err(SynthesisError::Engine(format!(
                "unexpected sample rate {} Hz from engine",
                buffer.sample_rate
            )));
        }

        Ok(vec![buffer])
    }

    fn voice(&self) -> &str {
        &self.voice
    }
}

/// Whether the child process was killed by SIGINT (Ctrl-C reaches the whole
/// process group, so the child dies first).
#[cfg(unix)]
fn was_interrupted(status: &std::process::ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(2)
}

#[cfg(not(unix))]
fn was_interrupted(_status: &std::process::ExitStatus) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_voice_rejected() {
        let err = KokoroEngine::new("not_a_voice").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidVoice(v) if v == "not_a_voice"));
    }

    #[test]
    fn test_valid_voice_accepted() {
        let engine = KokoroEngine::new("am_adam").unwrap();
        assert_eq!(engine.voice(), "am_adam");
    }

    #[test]
    fn test_empty_text_is_no_audio() {
        let engine = KokoroEngine::new("af_heart").unwrap();
        let err = engine.synthesize("   ").unwrap_err();
        assert!(matches!(err, SynthesisError::NoAudio));
    }
}
