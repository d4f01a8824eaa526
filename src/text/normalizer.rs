//! Text normalization for TTS processing.
//!
//! `normalize` is a pure function and is idempotent: running it over its own
//! output changes nothing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Unicode characters that trip up TTS engines, and their replacements.
const PROBLEMATIC_CHARS: &[(char, &str)] = &[
    ('\u{2018}', "'"),   // Left single quote
    ('\u{2019}', "'"),   // Right single quote
    ('\u{201c}', "\""),  // Left double quote
    ('\u{201d}', "\""),  // Right double quote
    ('\u{2013}', "-"),   // En dash
    ('\u{2014}', "-"),   // Em dash
    ('\u{2026}', "..."), // Ellipsis
    ('\u{00a0}', " "),   // Non-breaking space
    ('\u{200b}', ""),    // Zero-width space
    ('\u{200c}', ""),    // Zero-width non-joiner
    ('\u{200d}', ""),    // Zero-width joiner
    ('\u{feff}', ""),    // BOM
];

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());
static PERIODS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{4,}").unwrap());
static BANGS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!{2,}").unwrap());
static QUESTIONS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\?{2,}").unwrap());

/// Normalize raw chapter text for speech synthesis.
///
/// This:
/// - replaces smart quotes, dashes, and the ellipsis character with ASCII
/// - strips carriage returns, zero-width characters, and converts tabs to spaces
/// - removes URL-shaped substrings (replaced with a space so adjacent words
///   never fuse; the whitespace pass collapses the extra space)
/// - joins single line breaks into spaces and collapses blank-line runs to one
///   paragraph break
/// - collapses space runs, 4+ periods, and repeated `!`/`?`
/// - trims leading and trailing whitespace
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\r' => {}
            '\t' => cleaned.push(' '),
            _ => {
                if let Some((_, replacement)) =
                    PROBLEMATIC_CHARS.iter().find(|(ch, _)| *ch == c)
                {
                    cleaned.push_str(replacement);
                } else {
                    cleaned.push(c);
                }
            }
        }
    }

    let cleaned = URL_RE.replace_all(&cleaned, " ");
    let cleaned = PERIODS_RE.replace_all(&cleaned, "...");
    let cleaned = BANGS_RE.replace_all(&cleaned, "!");
    let cleaned = QUESTIONS_RE.replace_all(&cleaned, "?");

    collapse_whitespace(&cleaned)
}

/// Collapse whitespace runs: a run containing two or more newlines becomes a
/// paragraph break, a run with exactly one newline becomes a space (text
/// wrapped across source lines turns into one logical line), and any other
/// whitespace run becomes a single space.
fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut run_newlines = 0usize;
    let mut in_run = false;

    for c in text.chars() {
        if c.is_whitespace() {
            in_run = true;
            if c == '\n' {
                run_newlines += 1;
            }
        } else {
            if in_run {
                if !result.is_empty() {
                    if run_newlines >= 2 {
                        result.push_str("\n\n");
                    } else {
                        result.push(' ');
                    }
                }
                in_run = false;
                run_newlines = 0;
            }
            result.push(c);
        }
    }

    // A trailing whitespace run is dropped entirely (trim).
    result
}
