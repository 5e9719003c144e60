mod block;
mod config;
mod error;
mod html;
mod inline;
mod node;
mod parser;

pub use block::{BlockKind, Span, SpanKind};
pub use config::{Config, DEFAULT_CONFIG_PATH, OutputConfig};
pub use error::{ConfigError, Error, Result};
pub use html::{block_to_node, build_document, span_to_node};
pub use inline::{split_delimiter, split_images, split_links, tokenize};
pub use node::{Attributes, Node};
pub use parser::{classify, split_blocks};

/// Convert markdown to an HTML string wrapped in a single `<div>`.
///
/// Text and attribute values are emitted without HTML escaping.
pub fn markdown_to_html(markdown: &str) -> Result<String> {
    build_document(markdown)?.render()
}
