pub mod apply;
pub mod classify;
pub mod error;
pub mod extract;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod normalize;
pub mod parse;
pub mod render;
pub mod transform;

pub use apply::{apply_styles, most_common_style};
pub use classify::{ClassificationReport, Classifier, ContentType, MARKDOWN_SIGNALS, MarkdownSignal, classify};
pub use error::{RestylerError, Result};
pub use extract::{StyleProfile, extract_styles};
#[cfg(feature = "fetch")]
pub use fetch::{FetchConfig, Fetcher, fetch_file, fetch_stdin, fetch_url};
pub use normalize::{normalize, normalize_with_limit};
pub use parse::{Document, Element};
pub use render::{RenderOptions, render_markdown, render_markdown_with_options};
pub use transform::{
    ProcessedSource, Restyler, RestylerConfig, RestylerConfigBuilder, TransformResult, process_source, transform,
};
