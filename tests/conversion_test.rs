//! End-to-end conversion tests
//!
//! These tests drive whole documents through `convert_html` and check the
//! final Markdown byte for byte.

use htm2md::converter::{ConversionOptions, LinkTargets, MarkdownConverter};
use htm2md::dom::{Document, Element, Node};
use htm2md::language::{CodeLanguage, guess_language};
use htm2md::normalize::collapse_blank_lines;
use htm2md::table::is_complex_table;
use htm2md::{ConversionError, html_to_markdown};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn convert(html: &str) -> String {
    MarkdownConverter::new()
        .convert_html(html.as_bytes())
        .expect("Conversion failed")
}

#[test]
fn test_basic_document() {
    let markdown = convert(
        "<html><body><h1>Title</h1><p>Hello <b>world</b></p>\
         <ul><li>one</li><li>two</li></ul></body></html>",
    );

    assert_eq!(markdown, "# Title\nHello  **world**\n- one\n- two");
    assert!(markdown.starts_with("# Title"));
    let lines: Vec<&str> = markdown.lines().collect();
    let one = lines.iter().position(|line| *line == "- one").expect("first item");
    assert_eq!(lines[one + 1], "- two");
}

#[test]
fn test_realistic_article() {
    let html = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Install guide</title>
    <style>body { font-family: serif; }</style>
</head>
<body>
<h2>Install</h2>
<p>Run the <code>setup</code> script:</p>
<pre><code>#!/bin/sh
./configure &amp;&amp; make</code></pre>
<blockquote>Back up your data first.</blockquote>
<ol>
  <li>Download</li>
  <li>Unpack<ul><li>verify</li></ul></li>
</ol>
<hr>
<p>Check the <a href="sums.txt" title="Checksums">sums</a></p>
<p>Logo: <img src="logo.png" alt="logo"></p>
</body>
</html>"#;

    let expected = "## Install\n\nRun the `setup` script:\n\n```bash\n#!/bin/sh\n./configure && make\n```\n\n\
                    > Back up your data first.\n\n1. Download\n2. Unpack\n    - verify\n\n---\n\n\
                    Check the [sums]( \"Checksums\")\n\nLogo: ![logo](logo.png)";

    assert_eq!(convert(html), expected);
}

#[test]
fn test_link_contract_is_exact() {
    let anchor = Element::new("a").with_attr("href", "http://x").with_text("hello");
    assert_eq!(MarkdownConverter::new().render(&Node::from(anchor)), "[hello]() ");
}

#[test]
fn test_href_mode_keeps_targets() {
    let converter = MarkdownConverter::with_options(ConversionOptions {
        link_targets: LinkTargets::Href,
        ..Default::default()
    });
    let markdown = converter.convert_str("<p>Read <a href=\"/docs\" title=\"Docs\">the docs</a>.</p>");
    assert_eq!(markdown, "Read [the docs](/docs \"Docs\") .");
}

#[test]
fn test_simple_table_rows() {
    let markdown = convert(
        "<table><thead><tr><th>A</th><th>B</th></tr></thead>\
         <tbody><tr><td>1</td><td>2</td></tr><tr><td>3</td><td>4</td></tr></tbody></table>",
    );
    assert_eq!(markdown, "| A  | B  |\n| --- | --- |\n| 1  | 2  |\n| 3  | 4  |");
}

#[test]
fn test_rowspan_table_takes_complex_path() {
    let markdown = convert(
        "<table><tr><td rowspan=\"2\">span</td><td>a</td></tr><tr><td>b</td></tr></table>",
    );
    assert_eq!(
        markdown,
        "<table><tr><td rowspan=\"2\">span</td><td>a</td></tr><tr><td>b</td></tr></table>"
    );
}

#[test]
fn test_table_cell_newline_sanitized() {
    let markdown = convert("<table><tr><td>a\nb</td></tr></table>");
    assert_eq!(markdown, "| a b  |\n| --- |");
}

#[test]
fn test_is_complex_table_public() {
    let table = Element::new("table").with_child(
        Element::new("tr").with_child(Element::new("td").with_attr("rowspan", "2")),
    );
    assert!(is_complex_table(&table));
}

#[test]
fn test_language_heuristic_public() {
    assert_eq!(guess_language("Python"), CodeLanguage::Python);
    assert_eq!(guess_language("!/bin/bash"), CodeLanguage::Bash);
}

#[test]
fn test_empty_and_whitespace_documents() {
    assert_eq!(convert(""), "");
    assert_eq!(convert("   \n\t "), "");
    assert_eq!(MarkdownConverter::new().convert(&Document::default()), "");
}

#[test]
fn test_non_utf8_without_label_fails() {
    let result = MarkdownConverter::new().convert_html(b"<p>Caf\xE9</p>");
    assert!(matches!(result, Err(ConversionError::EncodingError(_))));
}

#[test]
fn test_meta_charset_is_honoured() {
    let markdown = MarkdownConverter::new()
        .convert_html(b"<html><head><meta charset=\"windows-1252\"></head><body><p>\x80 5</p></body></html>")
        .expect("Conversion failed");
    assert_eq!(markdown, "\u{20ac} 5");
}

#[test]
fn test_deep_nesting_is_flattened() {
    let converter = MarkdownConverter::with_options(ConversionOptions {
        max_depth: 8,
        ..Default::default()
    });
    let html = format!("{}<b>deep</b>{}", "<div>".repeat(20), "</div>".repeat(20));
    assert_eq!(converter.convert_str(&html), "deep");
}

#[test]
fn test_pathological_nesting_completes() {
    let html = format!("{}x", "<ul><li>".repeat(3_000));
    let markdown = html_to_markdown(&html);
    assert!(markdown.contains('x'));
}

proptest! {
    #[test]
    fn prop_heading_line(level in 1usize..=6, text in "[A-Za-z0-9]{1,20}") {
        let markdown = html_to_markdown(&format!("<p>before</p><h{level}>{text}</h{level}><p>after</p>"));
        let heading = format!("{} {}", "#".repeat(level), text);
        prop_assert!(markdown.lines().any(|line| line == heading), "missing {:?} in {:?}", heading, markdown);
    }

    #[test]
    fn prop_output_normalizer_is_idempotent(html in "[a-z<>/ \\n]{0,80}") {
        let markdown = html_to_markdown(&html);
        prop_assert_eq!(collapse_blank_lines(&markdown), markdown);
    }
}
