//! Spoken-duration estimation, used for reporting only.

/// Average narration speed used when the caller does not override it.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 150;

/// Estimate spoken duration in seconds from word count.
pub fn estimate_seconds(text: &str, words_per_minute: u32) -> f64 {
    if text.is_empty() || words_per_minute == 0 {
        return 0.0;
    }
    let word_count = text.split_whitespace().count();
    word_count as f64 / words_per_minute as f64 * 60.0
}

/// Format a duration in seconds as space-joined `{h}h {m}m {s}s` tokens.
///
/// Zero-valued hour and minute tokens are omitted; seconds are always shown
/// when no larger unit is present.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{secs}s"));
    }

    parts.join(" ")
}
