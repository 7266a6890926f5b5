//! Content type detection.
//!
//! Decides whether a piece of target content is empty, Markdown, or plain
//! text. Every non-blank line is checked against a fixed table of Markdown
//! signals; a line scores at most one point no matter how many signals it
//! hits. When more than [`DEFAULT_MARKDOWN_THRESHOLD`] of the non-blank lines
//! score, the content is Markdown.
//!
//! # Example
//!
//! ```rust
//! use restyler_core::{ContentType, classify};
//!
//! assert_eq!(classify("# Title\n\nSome paragraph."), ContentType::Markdown);
//! assert_eq!(classify("Just a sentence."), ContentType::PlainText);
//! assert_eq!(classify("   \n  "), ContentType::Empty);
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::RegexSet;
use serde::Serialize;

use crate::Result;

/// Fraction of non-blank lines that must carry a Markdown signal.
pub const DEFAULT_MARKDOWN_THRESHOLD: f64 = 0.2;

/// A named Markdown signal pattern, matched against a single trimmed line.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownSignal {
    pub name: &'static str,
    pub pattern: &'static str,
}

/// The built-in signal table.
pub const MARKDOWN_SIGNALS: &[MarkdownSignal] = &[
    MarkdownSignal { name: "header", pattern: r"^#{1,6}\s" },
    MarkdownSignal { name: "bold", pattern: r"^\*\*.+\*\*$" },
    MarkdownSignal { name: "italic", pattern: r"^\*[^*\s].*\*$" },
    MarkdownSignal { name: "unordered_list", pattern: r"^\*\s" },
    MarkdownSignal { name: "ordered_list", pattern: r"^\d+\.\s" },
    MarkdownSignal { name: "blockquote", pattern: r"^>\s" },
    MarkdownSignal { name: "code_fence", pattern: r"^```" },
    MarkdownSignal { name: "horizontal_rule", pattern: r"^-{3,}$" },
    MarkdownSignal { name: "link", pattern: r"\[[^\]]*\]\([^)]*\)" },
    MarkdownSignal { name: "image", pattern: r"!\[[^\]]*\]\([^)]*\)" },
    MarkdownSignal { name: "inline_code", pattern: r"`[^`]+`" },
];

static DEFAULT_CLASSIFIER: LazyLock<Classifier> = LazyLock::new(Classifier::builtin);

/// The detected kind of target content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Empty or whitespace-only input.
    Empty,
    /// Input that already reads as Markdown.
    Markdown,
    /// Anything else.
    PlainText,
}

impl ContentType {
    /// Human-readable description of how content of this type is processed.
    pub fn processing_strategy(self) -> &'static str {
        match self {
            ContentType::Markdown => "Markdown to HTML conversion with syntax highlighting",
            ContentType::PlainText => "Plain text to HTML paragraphs conversion",
            ContentType::Empty => "Empty content detected",
        }
    }

    /// The wire name, as used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Empty => "empty",
            ContentType::Markdown => "markdown",
            ContentType::PlainText => "plain_text",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring detail behind a classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub content_type: ContentType,
    /// Non-blank lines matching at least one signal.
    pub score: usize,
    /// Non-blank lines in the input.
    pub non_empty_lines: usize,
}

impl ClassificationReport {
    /// Share of non-blank lines that carried a signal.
    pub fn ratio(&self) -> f64 {
        if self.non_empty_lines == 0 { 0.0 } else { self.score as f64 / self.non_empty_lines as f64 }
    }
}

/// Line-based Markdown detector.
///
/// The signal table is compiled once into a [`RegexSet`] and never changes
/// afterwards, so a Classifier can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct Classifier {
    signals: RegexSet,
    names: Vec<&'static str>,
    threshold: f64,
}

impl Classifier {
    /// Builds a classifier from a custom signal table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RestylerError::InvalidPattern`] if a pattern does not compile.
    pub fn with_signals(signals: &[MarkdownSignal], threshold: f64) -> Result<Self> {
        let names = signals.iter().map(|s| s.name).collect();
        let signals = RegexSet::new(signals.iter().map(|s| s.pattern))?;
        Ok(Self { signals, names, threshold })
    }

    /// Builds a classifier from the built-in table with a custom threshold.
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold, ..DEFAULT_CLASSIFIER.clone() }
    }

    fn builtin() -> Self {
        Self::with_signals(MARKDOWN_SIGNALS, DEFAULT_MARKDOWN_THRESHOLD)
            .expect("built-in markdown signal patterns are valid")
    }

    /// Gets the ratio a document must exceed to count as Markdown.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scores content line by line.
    pub fn score(&self, content: &str) -> ClassificationReport {
        if content.trim().is_empty() {
            return ClassificationReport { content_type: ContentType::Empty, score: 0, non_empty_lines: 0 };
        }

        let mut score = 0;
        let mut non_empty_lines = 0;
        for line in content.lines().map(str::trim).filter(|line| !line.is_empty()) {
            non_empty_lines += 1;
            if self.signals.is_match(line) {
                score += 1;
            }
        }

        let mut report = ClassificationReport { content_type: ContentType::PlainText, score, non_empty_lines };
        if non_empty_lines > 0 && report.ratio() > self.threshold {
            report.content_type = ContentType::Markdown;
        }
        report
    }

    /// Classifies content as empty, Markdown, or plain text.
    pub fn classify(&self, content: &str) -> ContentType {
        self.score(content).content_type
    }

    /// Names of the signals a single line matches.
    pub fn matching_signals(&self, line: &str) -> Vec<&'static str> {
        self.signals
            .matches(line.trim())
            .into_iter()
            .filter_map(|idx| self.names.get(idx).copied())
            .collect()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        DEFAULT_CLASSIFIER.clone()
    }
}

/// Classifies content with the built-in signal table and threshold.
pub fn classify(content: &str) -> ContentType {
    DEFAULT_CLASSIFIER.classify(content)
}
