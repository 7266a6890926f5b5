//! Style application onto a target document.
//!
//! Two things are copied from a [`StyleProfile`]:
//!
//! 1. All collected CSS goes into one `<style>` element appended to `<head>`.
//! 2. For every tag name with inline styles, the most common style value is
//!    written onto every element of that tag in the target.
//!
//! Nothing else in the target is touched.

use std::collections::HashMap;

use crate::extract::StyleProfile;
use crate::parse::Document;

/// Applies a style profile to a target document and returns it.
///
/// # Example
///
/// ```rust
/// use restyler_core::{Document, apply_styles, extract_styles};
///
/// let profile = extract_styles(r#"<p style="color:red">a</p><p style="color:red">b</p><p style="color:blue">c</p>"#);
/// let target = apply_styles(Document::parse("<p>one</p><p>two</p>"), &profile);
/// assert_eq!(target.to_html(), r#"<p style="color:red">one</p><p style="color:red">two</p>"#);
/// ```
pub fn apply_styles(mut target: Document, profile: &StyleProfile) -> Document {
    if !profile.css_rules.is_empty() {
        let css = profile.css_rules.join("\n");
        target.append_to_head("style", &css);
    }

    for (tag, styles) in &profile.inline_styles {
        if let Some(style) = most_common_style(styles) {
            let updated = target.set_attr(tag, "style", style);
            if updated > 0 {
                tracing::debug!(tag = %tag, elements = updated, style, "applied inline style");
            }
        }
    }

    target
}

/// Picks the most frequent style string.
///
/// Ties go to the value that first appears in `styles`. Returns `None` for an
/// empty slice.
pub fn most_common_style(styles: &[String]) -> Option<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for style in styles {
        let count = counts.entry(style.as_str()).or_insert(0);
        if *count == 0 {
            order.push(style.as_str());
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for style in order {
        let count = counts[style];
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((style, count));
        }
    }

    best.map(|(style, _)| style)
}
