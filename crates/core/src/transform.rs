//! Main restyling API.
//!
//! This module sequences the pipeline: classify the target content, turn it
//! into HTML, extract the source page's styles and apply them to the result.
//! The entry point is the [`Restyler`] struct, along with the convenience
//! functions [`transform`] and [`process_source`].
//!
//! # Example
//!
//! ```rust
//! use restyler_core::{ContentType, transform};
//!
//! let source = "<html><head><style>body{color:red}</style></head>\
//!               <body><p style='font-size:20px'>x</p></body></html>";
//! let result = transform(source, "# Hi\nHello").unwrap();
//!
//! assert_eq!(result.content_type, ContentType::Markdown);
//! assert!(result.transformed_html.contains("<style>body{color:red}</style>"));
//! assert!(result.transformed_html.contains(r#"<p style="font-size:20px">Hello</p>"#));
//! ```

use std::time::Instant;

use serde::Serialize;

use crate::apply::apply_styles;
use crate::classify::{Classifier, ContentType, DEFAULT_MARKDOWN_THRESHOLD};
use crate::extract::StyleProfile;
use crate::normalize::{DEFAULT_MAX_HEADER_LEN, normalize_with_limit};
use crate::parse::Document;
use crate::render::{RenderOptions, render_markdown_with_options};
use crate::{RestylerError, Result};

const MISSING_INPUT: &str = "Both source HTML and target content are required";
const MISSING_SOURCE_TEXT: &str = "Source text is required";

/// Configuration for the Restyler pipeline.
///
/// # Example
///
/// ```rust
/// use restyler_core::RestylerConfig;
///
/// let config = RestylerConfig::builder()
///     .markdown_threshold(0.3)
///     .max_header_len(40)
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestylerConfig {
    /// Share of non-blank lines that must look like Markdown (default: 0.2).
    pub markdown_threshold: f64,

    /// All-caps lines must be shorter than this to become headers (default: 50).
    pub max_header_len: usize,

    /// Markdown rendering extensions (default: all enabled).
    pub render: RenderOptions,
}

impl Default for RestylerConfig {
    fn default() -> Self {
        Self {
            markdown_threshold: DEFAULT_MARKDOWN_THRESHOLD,
            max_header_len: DEFAULT_MAX_HEADER_LEN,
            render: RenderOptions::default(),
        }
    }
}

impl RestylerConfig {
    /// Creates a new builder for RestylerConfig.
    pub fn builder() -> RestylerConfigBuilder {
        RestylerConfigBuilder::new()
    }
}

/// Builder for RestylerConfig.
pub struct RestylerConfigBuilder {
    config: RestylerConfig,
}

impl RestylerConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: RestylerConfig::default() }
    }

    /// Sets the Markdown detection threshold.
    pub fn markdown_threshold(mut self, value: f64) -> Self {
        self.config.markdown_threshold = value;
        self
    }

    /// Sets the header length limit for plain text normalization.
    pub fn max_header_len(mut self, value: usize) -> Self {
        self.config.max_header_len = value;
        self
    }

    /// Sets the Markdown rendering options.
    pub fn render(mut self, value: RenderOptions) -> Self {
        self.config.render = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> RestylerConfig {
        self.config
    }
}

impl Default for RestylerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a single transform call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformResult {
    /// Target content rendered to HTML and restyled.
    pub transformed_html: String,
    /// What the target content was detected as.
    pub content_type: ContentType,
    /// Human-readable description of the processing path.
    pub processing_strategy: String,
    /// The target content exactly as supplied.
    pub original_content: String,
    /// The Markdown that was rendered.
    pub processed_markdown: String,
}

/// Outcome of classifying and normalizing source text without restyling it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedSource {
    pub content_type: ContentType,
    /// Normalized Markdown for plain text, the input unchanged otherwise.
    pub processed_content: String,
}

/// Main entry point for restyling.
///
/// A Restyler holds only immutable configuration. Every call parses its own
/// documents, so one instance can serve concurrent callers.
///
/// # Example
///
/// ```rust
/// use restyler_core::{Restyler, RestylerConfig};
///
/// let restyler = Restyler::with_config(RestylerConfig::builder().markdown_threshold(0.5).build());
/// let result = restyler.transform("<p style='margin:0'>x</p>", "one line\n`two`").unwrap();
/// assert_eq!(result.processing_strategy, "Plain text to HTML paragraphs conversion");
/// ```
#[derive(Debug, Clone)]
pub struct Restyler {
    config: RestylerConfig,
    classifier: Classifier,
}

impl Restyler {
    /// Creates a Restyler with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RestylerConfig::default())
    }

    /// Creates a Restyler with a custom configuration.
    pub fn with_config(config: RestylerConfig) -> Self {
        let classifier = Classifier::with_threshold(config.markdown_threshold);
        Self { config, classifier }
    }

    /// Gets the active configuration.
    pub fn config(&self) -> &RestylerConfig {
        &self.config
    }

    /// Classifies target content.
    pub fn classify(&self, content: &str) -> ContentType {
        self.classifier.classify(content)
    }

    /// Rewrites plain text into Markdown.
    pub fn normalize(&self, text: &str) -> String {
        normalize_with_limit(text, self.config.max_header_len)
    }

    /// Renders Markdown to an HTML fragment.
    pub fn render(&self, markdown: &str) -> String {
        render_markdown_with_options(markdown, self.config.render)
    }

    /// Classifies text and normalizes it if it is plain text.
    ///
    /// # Errors
    ///
    /// Returns [`RestylerError::Validation`] for empty or whitespace-only text.
    pub fn process_source(&self, text: &str) -> Result<ProcessedSource> {
        if text.trim().is_empty() {
            return Err(RestylerError::Validation(MISSING_SOURCE_TEXT.to_string()));
        }

        let content_type = self.classify(text);
        let processed_content = match content_type {
            ContentType::PlainText => self.normalize(text),
            ContentType::Markdown | ContentType::Empty => text.to_string(),
        };

        Ok(ProcessedSource { content_type, processed_content })
    }

    /// Restyles target content to match the source page.
    ///
    /// # Errors
    ///
    /// Returns [`RestylerError::Validation`] when either input is empty or
    /// whitespace-only.
    pub fn transform(&self, source_html: &str, target_content: &str) -> Result<TransformResult> {
        if source_html.trim().is_empty() || target_content.trim().is_empty() {
            return Err(RestylerError::Validation(MISSING_INPUT.to_string()));
        }

        let started = Instant::now();
        let report = self.classifier.score(target_content);
        let content_type = report.content_type;
        tracing::debug!(
            content_type = %content_type,
            score = report.score,
            lines = report.non_empty_lines,
            "classified target content"
        );

        let (processed_markdown, fragment) = match content_type {
            ContentType::Markdown => (target_content.to_string(), self.render(target_content)),
            ContentType::PlainText => {
                let markdown = self.normalize(target_content);
                let html = self.render(&markdown);
                (markdown, html)
            }
            ContentType::Empty => (target_content.to_string(), String::new()),
        };

        let target = Document::parse(&fragment);
        let source = Document::parse(source_html);
        let profile = StyleProfile::from_document(&source);
        tracing::debug!(
            css_blocks = profile.css_rules.len(),
            inline_styles = profile.inline_style_count(),
            classes = profile.class_names.len(),
            ids = profile.element_ids.len(),
            "extracted source styles"
        );

        let transformed_html = apply_styles(target, &profile).to_html();
        tracing::debug!(
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            output_len = transformed_html.len(),
            "transform complete"
        );

        Ok(TransformResult {
            transformed_html,
            content_type,
            processing_strategy: content_type.processing_strategy().to_string(),
            original_content: target_content.to_string(),
            processed_markdown,
        })
    }
}

impl Default for Restyler {
    fn default() -> Self {
        Self::new()
    }
}

/// Restyles target content with the default configuration.
///
/// See [`Restyler::transform`].
pub fn transform(source_html: &str, target_content: &str) -> Result<TransformResult> {
    Restyler::new().transform(source_html, target_content)
}

/// Classifies and normalizes source text with the default configuration.
///
/// See [`Restyler::process_source`].
pub fn process_source(text: &str) -> Result<ProcessedSource> {
    Restyler::new().process_source(text)
}
