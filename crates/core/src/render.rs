//! Markdown to HTML rendering.
//!
//! Rendering is delegated to pulldown-cmark. Two passes run over its event
//! stream before the HTML is written out: headings get table-of-contents
//! anchors, and fenced code in a known language is highlighted by syntect
//! into classed `<span>`s inside a `<div class="codehilite">`.

use std::collections::HashSet;
use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};
use serde::Serialize;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

const CODEHILITE_OPEN: &str = "<div class=\"codehilite\">\n";
const CODEHILITE_CLOSE: &str = "</div>\n";

/// Options for Markdown rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderOptions {
    /// Enable GFM tables
    pub tables: bool,
    /// Enable `~~strikethrough~~`
    pub strikethrough: bool,
    /// Give every heading a slug `id` so it can be linked from a table of contents
    pub heading_ids: bool,
    /// Highlight fenced code and wrap every code block in `<div class="codehilite">`
    pub highlight_code: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { tables: true, strikethrough: true, heading_ids: true, highlight_code: true }
    }
}

impl RenderOptions {
    /// Plain CommonMark with every extension switched off.
    pub fn commonmark() -> Self {
        Self { tables: false, strikethrough: false, heading_ids: false, highlight_code: false }
    }

    fn to_pulldown_options(self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        opts
    }
}

/// Renders Markdown to an HTML fragment with the default extensions.
///
/// # Example
///
/// ```rust
/// use restyler_core::render_markdown;
///
/// let html = render_markdown("# Hi\nHello");
/// assert_eq!(html, "<h1 id=\"hi\">Hi</h1>\n<p>Hello</p>\n");
/// ```
pub fn render_markdown(markdown: &str) -> String {
    render_markdown_with_options(markdown, RenderOptions::default())
}

/// Renders Markdown to an HTML fragment.
pub fn render_markdown_with_options(markdown: &str, options: RenderOptions) -> String {
    let mut events: Vec<Event<'_>> = Parser::new_ext(markdown, options.to_pulldown_options()).collect();

    if options.heading_ids {
        assign_heading_ids(&mut events);
    }
    if options.highlight_code {
        events = highlight_code_blocks(events);
    }

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

fn assign_heading_ids(events: &mut [Event<'_>]) {
    let mut used = HashSet::new();
    let mut i = 0;

    while i < events.len() {
        if let Event::Start(Tag::Heading { id: None, .. }) = &events[i] {
            let mut text = String::new();
            let mut end = i + 1;
            while end < events.len() {
                match &events[end] {
                    Event::End(TagEnd::Heading(_)) => break,
                    Event::Text(t) | Event::Code(t) => text.push_str(t),
                    _ => {}
                }
                end += 1;
            }

            let slug = unique_slug(slugify(&text), &mut used);
            if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
                *id = Some(CowStr::from(slug));
            }
            i = end;
        }
        i += 1;
    }
}

fn highlight_code_blocks(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut block: Option<Vec<Event<'_>>> = None;

    for event in events {
        match event {
            Event::Start(Tag::CodeBlock(_)) => block = Some(vec![event]),
            Event::End(TagEnd::CodeBlock) => {
                let mut events = block.take().unwrap_or_default();
                events.push(event);
                emit_code_block(events, &mut out);
            }
            event => match block.as_mut() {
                Some(events) => events.push(event),
                None => out.push(event),
            },
        }
    }

    out
}

/// Replaces one code block with highlighted HTML, or wraps it unchanged when
/// its language is unknown.
fn emit_code_block<'a>(events: Vec<Event<'a>>, out: &mut Vec<Event<'a>>) {
    let lang = match events.first() {
        Some(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)))) => {
            info.split_whitespace().next().unwrap_or_default().to_string()
        }
        _ => String::new(),
    };
    let code: String = events
        .iter()
        .filter_map(|event| match event {
            Event::Text(text) => Some(&**text),
            _ => None,
        })
        .collect();

    out.push(Event::Html(CowStr::Borrowed(CODEHILITE_OPEN)));
    match highlight_code(&lang, &code) {
        Some(highlighted) => {
            let html = format!("<pre><code class=\"language-{}\">{}</code></pre>\n", lang, highlighted);
            out.push(Event::Html(html.into()));
        }
        None => out.extend(events),
    }
    out.push(Event::Html(CowStr::Borrowed(CODEHILITE_CLOSE)));
}

/// Highlights code as classed spans. Returns `None` for unknown languages.
fn highlight_code(lang: &str, code: &str) -> Option<String> {
    if lang.is_empty() {
        return None;
    }
    let syntax = SYNTAX_SET.find_syntax_by_token(lang)?;

    let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);
    for line in LinesWithEndings::from(code) {
        if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
            tracing::warn!(lang, error = %e, "syntax highlighting failed");
            return None;
        }
    }

    Some(generator.finalize())
}

/// Turns heading text into an anchor slug.
///
/// Lower-cases, keeps ASCII letters, digits, `_` and `-`, and collapses runs
/// of whitespace and hyphens into a single `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c == '-' || c.is_whitespace() {
            pending_dash = true;
        }
    }

    slug
}

/// Suffixes `_1`, `_2`, ... until the slug is unused. Empty slugs always get a suffix.
fn unique_slug(slug: String, used: &mut HashSet<String>) -> String {
    let mut candidate = slug.clone();
    let mut n = 1;
    while candidate.is_empty() || used.contains(&candidate) {
        candidate = format!("{}_{}", slug, n);
        n += 1;
    }
    used.insert(candidate.clone());
    candidate
}
