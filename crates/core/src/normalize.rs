//! Plain text to Markdown rewriting.
//!
//! Works line by line and never changes the number of lines:
//!
//! - blank lines stay blank
//! - `1. item` style lines pass through
//! - lines starting with `•`, `-` or `*` become `- item`
//! - short all-caps lines become `## Title Cased` headers
//! - everything else is left alone as paragraph text

use std::sync::LazyLock;

use regex::Regex;

/// Lines at least this many characters long are never promoted to headers.
pub const DEFAULT_MAX_HEADER_LEN: usize = 50;

static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+").expect("ordered list pattern is valid"));

const BULLET_MARKERS: &[char] = &['•', '-', '*'];

/// Rewrites plain text into Markdown using the default header length limit.
///
/// # Example
///
/// ```rust
/// use restyler_core::normalize;
///
/// let md = normalize("ALL CAPS TITLE\nSome text\n• item one\n• item two");
/// assert_eq!(md, "## All Caps Title\nSome text\n- item one\n- item two");
/// ```
pub fn normalize(text: &str) -> String {
    normalize_with_limit(text, DEFAULT_MAX_HEADER_LEN)
}

/// Rewrites plain text into Markdown, promoting all-caps lines shorter than
/// `max_header_len` characters to level-2 headers.
///
/// A line ending in `\r\n` keeps it.
pub fn normalize_with_limit(text: &str, max_header_len: usize) -> String {
    text.split('\n')
        .map(|line| match line.strip_suffix('\r') {
            Some(line) => normalize_line(line, max_header_len) + "\r",
            None => normalize_line(line, max_header_len),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_line(line: &str, max_header_len: usize) -> String {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if ORDERED_ITEM.is_match(trimmed) {
        return line.to_string();
    }

    if let Some(rest) = trimmed.strip_prefix(BULLET_MARKERS) {
        return format!("- {}", rest.trim_start());
    }

    if trimmed.chars().count() < max_header_len && is_upper(trimmed) {
        return format!("## {}", title_case(trimmed));
    }

    line.to_string()
}

/// True when the text has at least one cased character and no lower-case ones.
fn is_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Upper-cases the first cased character of every word and lower-cases the rest.
///
/// A word is a run of cased characters, so `DON'T` becomes `Don'T` and
/// `2ND` becomes `2Nd`.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        let cased = c.is_uppercase() || c.is_lowercase();
        if cased && in_word {
            out.extend(c.to_lowercase());
        } else if cased {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        in_word = cased;
    }
    out
}
