//! EPUB parsing and chapter text extraction.

use crate::error::ExtractionError;
use log::{info, warn};
use std::path::Path;

/// Spine items with less than this much text are treated as non-chapters
/// (covers, blank separators, image-only pages).
const MIN_CHAPTER_CHARS: usize = 50;

/// One ordered document unit extracted from the source book.
#[derive(Debug, Clone)]
pub struct Chapter {
    /// 1-based position, stable and matching source order.
    pub index: usize,
    /// Display title; synthetic "Chapter N" when no heading was found.
    pub title: String,
    /// Plain text content, as extracted.
    pub raw_text: String,
}

/// Parsed EPUB book.
#[derive(Debug)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub language: String,
    /// Chapters in reading order.
    pub chapters: Vec<Chapter>,
}

impl Book {
    /// Approximate word count across all chapters.
    pub fn total_words(&self) -> usize {
        self.chapters
            .iter()
            .map(|c| c.raw_text.split_whitespace().count())
            .sum()
    }
}

/// Parse an EPUB file into ordered chapters plus metadata.
///
/// Malformed spine entries are skipped with a warning; the parse only fails
/// when the archive cannot be opened or no readable chapter remains.
pub fn parse_epub(path: &Path) -> Result<Book, ExtractionError> {
    let mut doc =
        epub::doc::EpubDoc::new(path).map_err(|e| ExtractionError::Open(e.to_string()))?;

    let title = doc
        .mdata("title")
        .map(|m| m.value.clone())
        .unwrap_or_else(|| "Unknown".to_string());
    let author = doc
        .mdata("creator")
        .map(|m| m.value.clone())
        .unwrap_or_else(|| "Unknown".to_string());
    let language = doc
        .mdata("language")
        .map(|m| m.value.clone())
        .unwrap_or_else(|| "en".to_string());

    let mut chapters = Vec::new();
    let spine = doc.spine.clone();

    for spine_item in spine.iter() {
        let Some((content_bytes, _mime)) = doc.get_resource(&spine_item.idref) else {
            warn!("skipping unreadable spine item: {}", spine_item.idref);
            continue;
        };

        let html = String::from_utf8_lossy(&content_bytes).to_string();
        let raw_text = html_to_text(&html);

        if raw_text.trim().chars().count() < MIN_CHAPTER_CHARS {
            continue;
        }

        let index = chapters.len() + 1;
        let chapter_title =
            extract_title_from_html(&html).unwrap_or_else(|| format!("Chapter {index}"));

        info!(
            "extracted: {} ({} characters)",
            chapter_title,
            raw_text.chars().count()
        );

        chapters.push(Chapter {
            index,
            title: chapter_title,
            raw_text,
        });
    }

    if chapters.is_empty() {
        return Err(ExtractionError::NoReadableContent);
    }

    info!("extracted {} chapters", chapters.len());

    Ok(Book {
        title,
        author,
        language,
        chapters,
    })
}

/// Extract a chapter title from heading tags (h1 through h3, then title).
fn extract_title_from_html(html: &str) -> Option<String> {
    for tag in ["h1", "h2", "h3", "title"] {
        if let Some(title) = extract_tag_text(html, tag) {
            return Some(title);
        }
    }
    None
}

/// Find the first occurrence of `tag` and return its trimmed text content.
///
/// Tag matching is ASCII case-insensitive over the original string, so byte
/// offsets always land on char boundaries regardless of the content between
/// the tags.
fn extract_tag_text(html: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    let start = find_ascii_ci(html, &open, 0)?;
    let tag_end = html[start..].find('>')?;
    let content_start = start + tag_end + 1;
    let end = find_ascii_ci(html, &close, content_start)?;

    let text = strip_html_tags(&html[content_start..end]);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Byte offset of the first ASCII case-insensitive match of `needle` in
/// `haystack`, starting at `from`. `needle` must be ASCII.
fn find_ascii_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let hay = haystack.as_bytes().get(from..)?;
    hay.windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
        .map(|i| i + from)
}

/// Strip HTML tags from a string.
fn strip_html_tags(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }

    result
}

/// Convert chapter HTML to plain text. Entities are decoded by html2text;
/// the normalizer downstream maps the resulting Unicode punctuation to ASCII.
fn html_to_text(html: &str) -> String {
    // Wide width so html2text does not re-wrap prose; the normalizer joins
    // any remaining single line breaks later.
    html2text::from_read(html.as_bytes(), 10_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_tags() {
        assert_eq!(strip_html_tags("<p>Hello</p>"), "Hello");
        assert_eq!(
            strip_html_tags("<h1>Title</h1><p>Content</p>"),
            "TitleContent"
        );
        assert_eq!(strip_html_tags("<a href=\"test\">Link</a>"), "Link");
    }

    #[test]
    fn test_extract_title_h1() {
        let html = "<html><body><h1>Chapter One</h1><p>Content here</p></body></html>";
        assert_eq!(
            extract_title_from_html(html),
            Some("Chapter One".to_string())
        );
    }

    #[test]
    fn test_extract_title_falls_through_headings() {
        let html = "<html><body><h3>Part Three</h3><p>Content</p></body></html>";
        assert_eq!(extract_title_from_html(html), Some("Part Three".to_string()));
    }

    #[test]
    fn test_extract_title_none() {
        let html = "<html><body><p>No heading at all</p></body></html>";
        assert_eq!(extract_title_from_html(html), None);
    }

    #[test]
    fn test_extract_title_uppercase_tags() {
        let html = "<HTML><BODY><H1>Shouty Chapter</H1><p>text</p></BODY></HTML>";
        assert_eq!(
            extract_title_from_html(html),
            Some("Shouty Chapter".to_string())
        );
    }

    #[test]
    fn test_extract_title_multibyte_content() {
        // Characters whose lowercase form has a different byte length must
        // not throw the offsets off.
        let html = "<h1>İstanbul Geceleri</h1><p>é and more</p>";
        assert_eq!(
            extract_title_from_html(html),
            Some("İstanbul Geceleri".to_string())
        );
        assert_eq!(extract_title_from_html("<h1>İİİİİİ</h1>é more"), Some("İİİİİİ".to_string()));
    }

    #[test]
    fn test_html_entities_decoded() {
        let text = html_to_text("<p>Salt &amp; pepper &hellip; done</p>");
        assert!(text.contains("Salt & pepper"));
        assert!(text.contains('\u{2026}'));
    }

    #[test]
    fn test_book_total_words() {
        let book = Book {
            title: "T".to_string(),
            author: "A".to_string(),
            language: "en".to_string(),
            chapters: vec![
                Chapter {
                    index: 1,
                    title: "One".to_string(),
                    raw_text: "three little words".to_string(),
                },
                Chapter {
                    index: 2,
                    title: "Two".to_string(),
                    raw_text: "two words".to_string(),
                },
            ],
        };
        assert_eq!(book.total_words(), 5);
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_epub(Path::new("/nonexistent/book.epub")).unwrap_err();
        assert!(matches!(err, ExtractionError::Open(_)));
    }
}
