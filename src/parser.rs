//! HTML5 parser using html5ever
//!
//! This module turns raw bytes into the owned [`Document`] tree the converter
//! renders. It handles malformed markup gracefully according to the HTML5
//! specification.
//!
//! # Overview
//!
//! The parser uses Mozilla's html5ever library, which implements the WHATWG
//! HTML5 parsing algorithm. Even malformed HTML is parsed consistently and
//! predictably, following the same rules as modern web browsers: unclosed
//! tags are closed, misnested inline tags are repaired, and a fragment
//! without `html`/`body` gets both.
//!
//! Parsing runs in three steps:
//!
//! 1. **Decode**: detect the charset (see [`crate::charset`]), strip a
//!    byte-order mark, and decode to UTF-8
//! 2. **Parse**: build an html5ever `RcDom`
//! 3. **Lower**: copy the `RcDom` into the owned tree, dropping non-content
//!    elements and flattening anything nested deeper than the depth limit
//!
//! # Examples
//!
//! ```rust
//! use htm2md::parser::parse_html;
//!
//! // Parse well-formed HTML
//! let html = b"<html><body><h1>Hello</h1></body></html>";
//! let document = parse_html(html).expect("Failed to parse HTML");
//! assert!(document.body().is_some());
//!
//! // Parse malformed HTML (missing closing tags)
//! let malformed = b"<html><body><h1>Hello";
//! let document = parse_html(malformed).expect("Parser handles malformed HTML");
//! assert_eq!(document.body().map(|body| body.text_content()), Some("Hello".to_string()));
//! ```

use std::borrow::Cow;

use encoding_rs::Encoding;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::RcDom;

use crate::charset::detect_charset;
use crate::dom::{DEFAULT_MAX_NESTING_DEPTH, Document};
use crate::error::ConversionError;

/// Parse HTML bytes into a document tree
///
/// The charset is detected from a byte-order mark or meta tag, defaulting to
/// UTF-8. Empty input yields a document with an empty body.
///
/// # Errors
///
/// Returns [`ConversionError::EncodingError`] when the input is not valid
/// for the detected charset, or the charset is unsupported.
pub fn parse_html(html: &[u8]) -> Result<Document, ConversionError> {
    parse_html_with_charset(html, None)
}

/// Parse HTML bytes with an optional charset label overriding detection
///
/// # Examples
///
/// ```rust
/// use htm2md::parser::parse_html_with_charset;
///
/// // "Café" in ISO-8859-1
/// let document = parse_html_with_charset(b"<p>Caf\xE9</p>", Some("iso-8859-1"))
///     .expect("Failed to parse HTML");
/// assert_eq!(document.body().map(|body| body.text_content()), Some("Café".to_string()));
/// ```
pub fn parse_html_with_charset(
    html: &[u8],
    charset: Option<&str>,
) -> Result<Document, ConversionError> {
    parse_html_with_options(html, charset, DEFAULT_MAX_NESTING_DEPTH)
}

/// Parse HTML bytes with an optional charset label and a nesting limit
pub fn parse_html_with_options(
    html: &[u8],
    charset: Option<&str>,
    max_depth: usize,
) -> Result<Document, ConversionError> {
    let detected_charset = detect_charset(charset, html);
    let text = decode_html(html, &detected_charset)?;
    Ok(parse_str(&text, max_depth))
}

/// Parse already-decoded HTML text
///
/// Never fails: html5ever recovers from any markup.
pub fn parse_str(html: &str, max_depth: usize) -> Document {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    Document::from_rcdom(&dom, max_depth)
}

/// Decode HTML bytes to UTF-8 text, without a leading byte-order mark
fn decode_html<'a>(html: &'a [u8], charset: &str) -> Result<Cow<'a, str>, ConversionError> {
    let html = match Encoding::for_bom(html) {
        Some((_, bom_length)) => &html[bom_length..],
        None => html,
    };

    if charset.eq_ignore_ascii_case("UTF-8") {
        return std::str::from_utf8(html).map(Cow::Borrowed).map_err(|e| {
            ConversionError::EncodingError(format!(
                "Invalid UTF-8 at byte position {}: {}",
                e.valid_up_to(),
                e
            ))
        });
    }

    let encoding = Encoding::for_label(charset.as_bytes()).ok_or_else(|| {
        ConversionError::EncodingError(format!("Unsupported charset '{}'", charset))
    })?;

    encoding
        .decode_without_bom_handling_and_without_replacement(html)
        .ok_or_else(|| {
            ConversionError::EncodingError(format!(
                "Invalid byte sequence for charset '{}'",
                charset
            ))
        })
}
