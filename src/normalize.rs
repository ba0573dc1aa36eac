//! Whole-document normalization passes
//!
//! Two passes bracket rendering:
//!
//! - [`wrap_naked_text`] runs on the tree before rendering. Free text sitting
//!   directly in `body` is wrapped in a `p`, so it gets paragraph treatment
//!   like every other top-level block.
//! - [`collapse_blank_lines`] runs on the rendered Markdown. Block rules emit
//!   generous newlines, and this pass squeezes every run of blank lines down
//!   to one, then trims the document.

use std::borrow::Cow;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::dom::{Document, Element, Node};

/// Wrap non-blank text nodes that are direct children of `body` in a `p`
///
/// Whitespace-only text and element children are left untouched. A document
/// without a `body` is not modified. Returns the number of wrapped nodes.
pub fn wrap_naked_text(document: &mut Document) -> usize {
    let Some(body) = document.body_mut() else {
        return 0;
    };

    let mut wrapped = 0;
    for child in body.children.iter_mut() {
        if let Node::Text(text) = child
            && !text.trim().is_empty()
        {
            let paragraph = Element::new("p").with_text(std::mem::take(text));
            *child = Node::Element(paragraph);
            wrapped += 1;
        }
    }

    if wrapped > 0 {
        debug!("Wrapped {} naked text node(s) in paragraphs", wrapped);
    }
    wrapped
}

/// Collapse runs of three or more newlines to exactly two, then trim
///
/// ```rust
/// use htm2md::normalize::collapse_blank_lines;
///
/// assert_eq!(collapse_blank_lines("\n# Title\n\n\n\nBody\n"), "# Title\n\nBody");
/// ```
pub fn collapse_blank_lines(markdown: &str) -> String {
    static BLANK_RUN: OnceLock<Option<Regex>> = OnceLock::new();
    let blank_run = BLANK_RUN.get_or_init(|| Regex::new(r"\n{3,}").ok());

    let collapsed = match blank_run.as_ref() {
        Some(regex) => regex.replace_all(markdown, "\n\n"),
        None => Cow::Borrowed(markdown),
    };

    collapsed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;
    use proptest::prelude::*;

    #[test]
    fn test_wraps_text_directly_under_body() {
        let mut doc = parse_html(b"<html><body>Loose text<p>Para</p></body></html>")
            .expect("Parse failed");
        assert_eq!(wrap_naked_text(&mut doc), 1);

        let body = doc.body().expect("body");
        let first = body.children[0].as_element().expect("wrapped element");
        assert_eq!(first.name, "p");
        assert_eq!(first.children, vec![Node::text("Loose text")]);
        assert_eq!(body.children[1].as_element().map(|e| e.name.as_str()), Some("p"));
    }

    #[test]
    fn test_whitespace_text_is_untouched() {
        let mut doc = Document::new(vec![Node::Element(
            Element::new("body")
                .with_text("\n   ")
                .with_child(Element::new("div").with_text("inside")),
        )]);
        let before = doc.clone();
        assert_eq!(wrap_naked_text(&mut doc), 0);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_only_direct_children_are_wrapped() {
        let mut doc = Document::new(vec![Node::Element(
            Element::new("html").with_child(
                Element::new("body")
                    .with_child(Element::new("div").with_text("nested"))
                    .with_text(" tail "),
            ),
        )]);
        assert_eq!(wrap_naked_text(&mut doc), 1);

        let body = doc.body().expect("body");
        assert_eq!(body.children[0].as_element().map(|e| e.name.as_str()), Some("div"));
        let tail = body.children[1].as_element().expect("wrapped tail");
        assert_eq!(tail.name, "p");
        assert_eq!(tail.text_content(), " tail ");
    }

    #[test]
    fn test_document_without_body_is_unchanged() {
        let mut doc = Document::new(vec![Node::text("loose")]);
        assert_eq!(wrap_naked_text(&mut doc), 0);
        assert_eq!(doc.children, vec![Node::text("loose")]);
    }

    #[test]
    fn test_collapse_four_newlines_to_two() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_collapse_keeps_single_blank_line() {
        assert_eq!(collapse_blank_lines("a\n\nb\nc"), "a\n\nb\nc");
    }

    #[test]
    fn test_collapse_trims_document() {
        assert_eq!(collapse_blank_lines("\n\n\n  # T\n\n\n"), "# T");
        assert_eq!(collapse_blank_lines("   "), "");
    }

    #[test]
    fn test_collapse_leaves_internal_spaces() {
        assert_eq!(collapse_blank_lines("a  b\n  - c"), "a  b\n  - c");
    }

    proptest! {
        #[test]
        fn prop_collapse_is_idempotent(text in "[a-c \\n]{0,60}") {
            let once = collapse_blank_lines(&text);
            let twice = collapse_blank_lines(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_collapse_leaves_no_triple_newline(text in "[a-c \\n]{0,60}") {
            prop_assert!(!collapse_blank_lines(&text).contains("\n\n\n"));
        }
    }
}
