//! htm2md - HTML to Markdown converter
//!
//! This library converts HTML documents into readable Markdown, keeping the
//! structure that survives the trip (headings, emphasis, links, images, code
//! blocks, nested lists and tables) and dropping the rest.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `parser`: charset-aware decoding and HTML5 parsing using html5ever
//! - `charset`: character encoding detection
//! - `dom`: the owned document tree the renderer works on
//! - `normalize`: naked-text wrapping before rendering, blank-line collapsing after
//! - `converter`: Markdown generation from the document tree
//! - `table`: simple/complex table classification and rendering
//! - `language`: fence language guessing for code blocks
//! - `batch`: parallel conversion of a directory tree
//!
//! # Examples
//!
//! ```rust
//! let markdown = htm2md::html_to_markdown(
//!     "<h1>Title</h1><ul><li>one</li><li>two</li></ul>",
//! );
//! assert_eq!(markdown, "# Title\n- one\n- two");
//! ```

pub mod batch;
pub mod charset;
pub mod converter;
pub mod dom;
pub mod error;
pub mod language;
mod list;
pub mod normalize;
pub mod parser;
pub mod table;

pub use batch::{BatchOptions, BatchReport};
pub use converter::{ConversionOptions, LinkTargets, MarkdownConverter};
pub use dom::{Document, Element, Node};
pub use error::ConversionError;
pub use parser::parse_html;

/// Convert HTML text to Markdown with default options
pub fn html_to_markdown(html: &str) -> String {
    MarkdownConverter::new().convert_str(html)
}
