//! HTML parsing and in-place DOM editing.
//!
//! This module provides the [`Document`] and [`Element`] types. A Document
//! owns the `scraper::Html` tree produced by html5ever and edits that tree
//! directly, so parsing, walking and serialization never recurse per nesting
//! level. Parsing never fails: malformed markup always yields a best-effort
//! tree.
//!
//! # Example
//!
//! ```rust
//! use restyler_core::parse::Document;
//!
//! let mut doc = Document::parse("<p>Hello</p><p>World</p>");
//! doc.set_attr("p", "style", "color:red");
//! assert_eq!(doc.to_html(), r#"<p style="color:red">Hello</p><p style="color:red">World</p>"#);
//! ```

use std::fmt;

use ego_tree::{NodeId, NodeRef};
use html5ever::{LocalName, QualName, ns};
use scraper::node::Text;
use scraper::{ElementRef, Html, Node, StrTendril};

/// Represents a parsed HTML document or body fragment.
///
/// Input that carries an `<html>` tag or a doctype is parsed as a complete
/// document. Anything else is parsed as a body fragment, so rendered
/// Markdown does not gain a synthetic `<html>`, `<head>` or `<body>`.
///
/// # Example
///
/// ```rust
/// use restyler_core::parse::Document;
///
/// let doc = Document::parse("<html><head><title>Test</title></head><body><p>Hello</p></body></html>");
/// assert!(doc.has_element("title"));
/// assert_eq!(doc.elements().count(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// This never fails. Malformed markup is repaired the way a browser would.
    pub fn parse(html: &str) -> Self {
        let html = if looks_like_document(html) { Html::parse_document(html) } else { Html::parse_fragment(html) };
        Self { html }
    }

    /// Gets the underlying `scraper::Html` tree.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Returns true when the input was parsed as a body fragment.
    pub fn is_fragment(&self) -> bool {
        self.html.tree.root().value().is_fragment()
    }

    /// Gets every element in document order.
    ///
    /// The context element html5ever wraps a fragment in is not included.
    pub fn elements(&self) -> impl Iterator<Item = Element<'_>> {
        self.content_root()
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .map(|element| Element { element })
    }

    /// Finds the first element with the given tag name, in document order.
    pub fn find(&self, tag: &str) -> Option<Element<'_>> {
        self.elements().find(|el| el.name() == tag)
    }

    /// Returns true if at least one element has the given tag name.
    pub fn has_element(&self, tag: &str) -> bool {
        self.find(tag).is_some()
    }

    /// Gets the `<head>` element if the document has one.
    pub fn head(&self) -> Option<Element<'_>> {
        self.find("head")
    }

    /// Sets an attribute on every element with the given tag name.
    ///
    /// Existing values are overwritten in place. Returns the number of
    /// elements that were updated.
    pub fn set_attr(&mut self, tag: &str, name: &str, value: &str) -> usize {
        let ids: Vec<NodeId> = self.elements().filter(|el| el.name() == tag).map(|el| el.element.id()).collect();

        for id in &ids {
            if let Some(mut node) = self.html.tree.get_mut(*id) {
                if let Node::Element(element) = node.value() {
                    element.attrs.insert(attr_name(name), StrTendril::from(value));
                }
            }
        }

        ids.len()
    }

    /// Returns the `<head>` element, creating it when missing.
    ///
    /// A new head is inserted as the first child of `<html>`, or as the first
    /// top-level node when there is no `<html>` either.
    pub fn ensure_head(&mut self) -> NodeId {
        if let Some(head) = self.head() {
            return head.element.id();
        }

        let parent = match self.find("html") {
            Some(html) => html.element.id(),
            None => self.content_root().id(),
        };

        let head = html_element("head");
        match self.html.tree.get_mut(parent) {
            Some(mut node) => node.prepend(head).id(),
            None => self.html.tree.root_mut().prepend(head).id(),
        }
    }

    /// Appends a `<tag>text</tag>` element as the last child of `<head>`.
    pub fn append_to_head(&mut self, tag: &str, text: &str) {
        let head = self.ensure_head();
        if let Some(mut head) = self.html.tree.get_mut(head) {
            head.append(html_element(tag)).append(Node::Text(Text { text: StrTendril::from(text) }));
        }
    }

    /// Serializes the document to an HTML string.
    ///
    /// Fragments serialize their top-level nodes only.
    pub fn to_html(&self) -> String {
        if self.is_fragment() {
            if let Some(container) = ElementRef::wrap(self.content_root()) {
                return container.inner_html();
            }
        }
        self.html.html()
    }

    /// The node whose descendants are the parsed content.
    fn content_root(&self) -> NodeRef<'_, Node> {
        let root = self.html.tree.root();
        if root.value().is_fragment() {
            root.children().find(|child| child.value().is_element()).unwrap_or(root)
        } else {
            root
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

/// A read-only view of one element in a [`Document`].
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the lower-case tag name.
    pub fn name(&self) -> &'a str {
        self.element.value().name()
    }

    /// Gets the value of an attribute.
    ///
    /// Returns `None` if the attribute is not present.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.attr(name)
    }

    /// Iterates over the whitespace-separated `class` tokens.
    pub fn classes(&self) -> impl Iterator<Item = &'a str> {
        self.element.value().classes()
    }

    /// Gets the concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the outer HTML of this element.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }
}

fn looks_like_document(html: &str) -> bool {
    let lower = html.to_ascii_lowercase();
    lower.contains("<html") || lower.contains("<!doctype")
}

fn html_element(tag: &str) -> Node {
    let name = QualName::new(None, ns!(html), LocalName::from(tag));
    Node::Element(scraper::node::Element::new(name, Vec::new()))
}

fn attr_name(name: &str) -> QualName {
    QualName::new(None, ns!(), LocalName::from(name))
}
