//! Markup stripping and paragraph segmentation.

use once_cell::sync::Lazy;
use regex::Regex;

/// Paragraphs at or below this many characters are dropped as noise.
const MIN_PARAGRAPH_CHARS: usize = 10;

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

static BLOCK_BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</(?:p|h[1-6]|div|li|ul|ol|blockquote|section|article|table|tr)\s*>|<br\s*/?>|<hr\s*/?>")
        .unwrap()
});

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static BLANK_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t\r\f\v]*\n").unwrap());

static H2_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<h2[\s>]").unwrap());

static H3_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<h3[\s>]").unwrap());

static MD_H2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*##[ \t]+\S").unwrap());

static MD_H3_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*###[ \t]+\S").unwrap());

static MD_HEADER_MARK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]+").unwrap());

// ---------------------------------------------------------------------------
// Segmentation
// ---------------------------------------------------------------------------

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Strips markup, turning block boundaries into blank lines.
pub fn strip_markup(document: &str) -> String {
    let normalized = document.replace("\r\n", "\n");
    let broken = BLOCK_BREAK_RE.replace_all(&normalized, "\n\n");
    let untagged = TAG_RE.replace_all(&broken, "");
    let unmarked = MD_HEADER_MARK_RE.replace_all(&untagged, "");
    decode_entities(&unmarked)
}

/// Splits plain text on blank lines, keeping trimmed paragraphs longer
/// than [`MIN_PARAGRAPH_CHARS`] characters.
pub fn split_paragraphs(plain: &str) -> Vec<String> {
    BLANK_LINE_RE
        .split(plain)
        .map(str::trim)
        .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
        .map(str::to_string)
        .collect()
}

/// Ordered paragraph list for a markup-bearing document.
pub fn segment(document: &str) -> Vec<String> {
    split_paragraphs(&strip_markup(document))
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A document prepared for scoring: plain text, paragraphs and the
/// structural counts that need the original markup.
#[derive(Debug, Clone)]
pub struct Document {
    pub plain: String,
    pub paragraphs: Vec<String>,
    pub h2_count: usize,
    pub h3_count: usize,
    pub word_count: usize,
    pub char_count: usize,
}

impl Document {
    pub fn parse(raw: &str) -> Self {
        let plain = strip_markup(raw);
        let paragraphs = split_paragraphs(&plain);
        let h2_count = H2_TAG_RE.find_iter(raw).count() + MD_H2_RE.find_iter(raw).count();
        let h3_count = H3_TAG_RE.find_iter(raw).count() + MD_H3_RE.find_iter(raw).count();
        let word_count = plain.split_whitespace().count();
        let char_count = plain.chars().filter(|c| !c.is_whitespace()).count();
        Self {
            plain,
            paragraphs,
            h2_count,
            h3_count,
            word_count,
            char_count,
        }
    }

    /// The first `n` characters of the plain text, leading whitespace skipped.
    pub fn intro(&self, n: usize) -> &str {
        let text = self.plain.trim_start();
        match text.char_indices().nth(n) {
            Some((idx, _)) => &text[..idx],
            None => text,
        }
    }
}
