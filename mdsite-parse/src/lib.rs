//! `mdsite-parse`: Markdown to HTML for the mdsite static site generator.
//!
//! The pipeline cuts a document into blocks on blank lines, classifies each
//! block, tokenizes the inline text of each block into typed spans, and builds
//! a tree of [`HtmlNode`]s rooted at a `div`.
//!
//! Text content is not HTML-escaped.
//!
//! # Quick start
//!
//! ```
//! let html = mdsite_parse::markdown_to_html("# Title\n\nHello **world**").unwrap();
//! assert_eq!(html, "<div><h1>Title</h1><p>Hello <b>world</b></p></div>");
//! ```

pub mod blocks;
pub mod compile;
pub mod error;
pub mod inline;
pub mod node;
pub mod page;
pub mod types;

pub use blocks::{block_to_block_kind, markdown_to_blocks};
pub use compile::markdown_to_html_node;
pub use error::{Error, Result};
pub use inline::text_to_spans;
pub use node::{Attributes, HtmlNode};
pub use page::{Template, extract_title};
pub use types::*;

/// Convert a Markdown document straight to its HTML string.
pub fn markdown_to_html(markdown: &str) -> Result<String> {
    markdown_to_html_node(markdown)?.to_html()
}
