//! Persisted user defaults for epub-narrator.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::text::chunker::DEFAULT_MAX_CHARS;
use crate::text::duration::DEFAULT_WORDS_PER_MINUTE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarratorConfig {
    /// Default voice when -v is not given
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Default output format when -f is not given (wav or mp3)
    #[serde(default = "default_format")]
    pub format: String,

    /// Maximum characters per synthesized chunk
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Narration speed used for duration estimates
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,
}

fn default_voice() -> String {
    "af_heart".to_string()
}

fn default_format() -> String {
    "mp3".to_string()
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_words_per_minute() -> u32 {
    DEFAULT_WORDS_PER_MINUTE
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            voice: default_voice(),
            format: default_format(),
            max_chars: default_max_chars(),
            words_per_minute: default_words_per_minute(),
        }
    }
}

impl NarratorConfig {
    /// Get the config file path: ~/.config/epub-narrator/config.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("epub-narrator")
            .join("config.toml"))
    }

    /// Load config from file, returning defaults if the file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: NarratorConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
