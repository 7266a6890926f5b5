//! Style extraction from a source HTML page.
//!
//! A single document-order walk collects everything the applier needs into a
//! [`StyleProfile`]:
//!
//! - inline `style` attributes, grouped by tag name
//! - the text of every `<style>` block
//! - every class token and element id in use
//!
//! # Example
//!
//! ```rust
//! use restyler_core::extract_styles;
//!
//! let profile = extract_styles(r#"<p style="color:red">a</p><p style="color:blue">b</p>"#);
//! assert_eq!(profile.inline_styles["p"], vec!["color:red", "color:blue"]);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::parse::Document;

/// Presentation rules collected from one source document.
///
/// Ordering of `inline_styles` values and of `css_rules` follows the source
/// document. Class names and ids are sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleProfile {
    /// Raw `style` attribute values keyed by lower-case tag name, one entry per element.
    pub inline_styles: BTreeMap<String, Vec<String>>,
    /// Text of each non-empty `<style>` element.
    pub css_rules: Vec<String>,
    /// Every whitespace-separated `class` token.
    pub class_names: BTreeSet<String>,
    /// Every non-empty `id` value.
    pub element_ids: BTreeSet<String>,
}

impl StyleProfile {
    /// Collects the profile of an already parsed document.
    pub fn from_document(doc: &Document) -> Self {
        let mut profile = Self::default();

        for element in doc.elements() {
            let tag = element.name().to_ascii_lowercase();

            if let Some(style) = element.attr("style") {
                profile.inline_styles.entry(tag.clone()).or_default().push(style.to_string());
            }

            if tag == "style" {
                let css = element.text();
                if !css.is_empty() {
                    profile.css_rules.push(css);
                }
            }

            profile.class_names.extend(element.classes().map(str::to_string));

            if let Some(id) = element.attr("id").filter(|id| !id.is_empty()) {
                profile.element_ids.insert(id.to_string());
            }
        }

        profile
    }

    /// Returns true when nothing would be applied to a target.
    pub fn is_empty(&self) -> bool {
        self.inline_styles.is_empty() && self.css_rules.is_empty()
    }

    /// Number of elements that carried an inline style.
    pub fn inline_style_count(&self) -> usize {
        self.inline_styles.values().map(Vec::len).sum()
    }
}

/// Parses source HTML and extracts its style profile.
///
/// Never fails: malformed markup is parsed on a best-effort basis.
pub fn extract_styles(source_html: &str) -> StyleProfile {
    StyleProfile::from_document(&Document::parse(source_html))
}
