//! Speech synthesis backend trait and voice catalogue.

pub mod kokoro;

use crate::audio::AudioBuffer;
use crate::error::SynthesisError;

/// Sample rate of synthesizer output, in Hz.
pub const SAMPLE_RATE: u32 = 24000;

/// Voices available in the Kokoro model.
pub const AVAILABLE_VOICES: &[&str] = &[
    "af_heart",     // Female, American English
    "af_bella",     // Female, American English
    "af_sarah",     // Female, American English
    "am_adam",      // Male, American English
    "am_michael",   // Male, American English
    "bf_emma",      // Female, British English
    "bf_isabella",  // Female, British English
    "bm_george",    // Male, British English
    "bm_lewis",     // Male, British English
];

/// Check whether a voice name is in the catalogue.
pub fn is_valid_voice(name: &str) -> bool {
    AVAILABLE_VOICES.contains(&name)
}

/// A speech synthesis backend.
///
/// Implementations turn one text chunk into one or more ordered PCM segments
/// at [`SAMPLE_RATE`]; the caller concatenates them. Any failure means "no
/// audio for this chunk" — the pipeline decides whether to skip or abort.
pub trait Synthesizer {
    /// Synthesize a text chunk into ordered audio segments.
    fn synthesize(&self, text: &str) -> Result<Vec<AudioBuffer>, SynthesisError>;

    /// Name of the voice in use.
    fn voice(&self) -> &str;
}
