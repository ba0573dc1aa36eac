//! Markdown converter - transforms the document tree to Markdown
//!
//! The converter is a single depth-first fold over the owned tree. Every node
//! appends its Markdown fragment to one shared output buffer, in document
//! order, and nothing in the tree is modified while rendering.
//!
//! # Element Handlers
//!
//! Dispatch goes through [`Tag`], one variant per handled element family plus
//! a catch-all. Unknown elements are transparent: their children are rendered
//! in place and the element itself leaves no trace.
//!
//! | Element | Fragment |
//! |---|---|
//! | `h1`-`h6` | `\n# text\n` (one `#` per level) |
//! | `p` | `text\n` |
//! | `br` | `\n` |
//! | `strong`, `b` | ` **text** ` |
//! | `em`, `i` | ` *text* ` |
//! | `del`, `s` | `~~text~~` |
//! | `a` | `[text]( "title") ` when `href` is set, children otherwise |
//! | `img` | `![alt](src "title") ` when `src` is set, `\n` otherwise |
//! | `ul`, `ol` | nested list rendering, see `list.rs` |
//! | `blockquote` | every line prefixed with `> ` |
//! | `code` | fenced block inside `pre`, inline backticks elsewhere |
//! | `pre` | delegates to its first `code`, or fences its raw text |
//! | `hr` | `\n---\n\n` |
//! | `table` | pipe table or reduced markup, see [`crate::table`] |
//!
//! "text" is the rendered children with surrounding whitespace trimmed.
//! Internal whitespace is never touched.
//!
//! # Links
//!
//! By default a link keeps only its optional title and drops the target:
//! `<a href="http://x">hello</a>` becomes `[hello]() `. Existing converted
//! corpora depend on this output, so it stays the default.
//! [`LinkTargets::Href`] writes the target as well.
//!
//! # Examples
//!
//! ```rust
//! use htm2md::converter::MarkdownConverter;
//!
//! let converter = MarkdownConverter::new();
//! let markdown = converter.convert_str("<h1>Title</h1><p>Some <em>content</em></p>");
//! assert_eq!(markdown, "# Title\nSome  *content*");
//! ```

use log::debug;

use crate::dom::{DEFAULT_MAX_NESTING_DEPTH, Document, Element, Node};
use crate::error::ConversionError;
use crate::language::guess_language;
use crate::normalize::{collapse_blank_lines, wrap_naked_text};
use crate::parser::{parse_html_with_options, parse_str};
use crate::table::render_table;

/// What an anchor's link target contains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkTargets {
    /// `[text]( "title") `: the href is left out
    #[default]
    TitleOnly,
    /// `[text](href "title") `
    Href,
}

/// Conversion options
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Link target rendering
    pub link_targets: LinkTargets,
    /// Element nesting kept when parsing; deeper subtrees become plain text
    pub max_depth: usize,
    /// Charset label that overrides detection (e.g. `"windows-1252"`)
    pub charset: Option<String>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            link_targets: LinkTargets::TitleOnly,
            max_depth: DEFAULT_MAX_NESTING_DEPTH,
            charset: None,
        }
    }
}

/// Element families with their own rendering rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Heading(usize),
    Paragraph,
    LineBreak,
    Strong,
    Emphasis,
    Strikethrough,
    Anchor,
    Image,
    List,
    ListItem,
    Blockquote,
    Code,
    Preformatted,
    Rule,
    Table,
    Other,
}

impl Tag {
    fn from_name(name: &str) -> Self {
        match name {
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "p" => Tag::Paragraph,
            "br" => Tag::LineBreak,
            "strong" | "b" => Tag::Strong,
            "em" | "i" => Tag::Emphasis,
            "del" | "s" => Tag::Strikethrough,
            "a" => Tag::Anchor,
            "img" => Tag::Image,
            "ul" | "ol" => Tag::List,
            "li" => Tag::ListItem,
            "blockquote" => Tag::Blockquote,
            "code" => Tag::Code,
            "pre" => Tag::Preformatted,
            "hr" => Tag::Rule,
            "table" => Tag::Table,
            _ => Tag::Other,
        }
    }
}

/// Markdown converter
///
/// Holds only its options, so one converter can be shared by every worker
/// of a batch run.
///
/// # Examples
///
/// ```rust
/// use htm2md::converter::{ConversionOptions, LinkTargets, MarkdownConverter};
///
/// let converter = MarkdownConverter::with_options(ConversionOptions {
///     link_targets: LinkTargets::Href,
///     ..Default::default()
/// });
/// let markdown = converter.convert_str("<p><a href=\"https://example.com\">Example</a></p>");
/// assert_eq!(markdown, "[Example](https://example.com)");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MarkdownConverter {
    options: ConversionOptions,
}

impl MarkdownConverter {
    /// Create a new converter with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new converter with custom options
    pub fn with_options(options: ConversionOptions) -> Self {
        Self { options }
    }

    /// Options this converter was built with
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Decode, parse and convert an HTML byte stream
    ///
    /// Free text directly inside `body` is wrapped in paragraphs before
    /// rendering. Empty input converts to an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::EncodingError`] when the bytes are not valid
    /// in the detected charset, or the charset label is unknown.
    pub fn convert_html(&self, html: &[u8]) -> Result<String, ConversionError> {
        let mut document = parse_html_with_options(
            html,
            self.options.charset.as_deref(),
            self.options.max_depth,
        )?;
        wrap_naked_text(&mut document);
        Ok(self.convert(&document))
    }

    /// Parse and convert already-decoded HTML text
    pub fn convert_str(&self, html: &str) -> String {
        let mut document = parse_str(html, self.options.max_depth);
        wrap_naked_text(&mut document);
        self.convert(&document)
    }

    /// Convert a parsed document
    ///
    /// Renders every top-level node, then collapses blank-line runs and trims
    /// the result. The document is used as given; no naked-text wrapping
    /// happens here.
    pub fn convert(&self, document: &Document) -> String {
        let mut output = String::new();
        for child in &document.children {
            self.render_node(child, None, &mut output);
        }

        let markdown = collapse_blank_lines(&output);
        debug!(
            "Rendered {} byte(s) of Markdown, {} after normalization",
            output.len(),
            markdown.len()
        );
        markdown
    }

    /// Markdown fragment of a single node, rendered without a parent
    ///
    /// The fragment is returned as-is, without blank-line collapsing or
    /// trimming, so fragments of siblings can be concatenated.
    ///
    /// ```rust
    /// use htm2md::converter::MarkdownConverter;
    /// use htm2md::dom::Element;
    ///
    /// let strong = Element::new("strong").with_text(" bold ");
    /// assert_eq!(MarkdownConverter::new().render(&strong.into()), " **bold** ");
    /// ```
    pub fn render(&self, node: &Node) -> String {
        let mut output = String::new();
        self.render_node(node, None, &mut output);
        output
    }

    pub(crate) fn render_node(&self, node: &Node, parent: Option<&Element>, output: &mut String) {
        match node {
            Node::Text(text) => output.extend(text.chars().filter(|&c| c != '\t')),
            Node::Element(element) => self.render_element(element, parent, output),
        }
    }

    fn render_element(&self, element: &Element, parent: Option<&Element>, output: &mut String) {
        match Tag::from_name(&element.name) {
            Tag::Heading(level) => {
                output.push('\n');
                output.extend(std::iter::repeat_n('#', level));
                output.push(' ');
                self.render_trimmed(element, output);
                output.push('\n');
            }
            Tag::Paragraph => {
                self.render_trimmed(element, output);
                output.push('\n');
            }
            Tag::LineBreak => output.push('\n'),
            Tag::Strong => self.render_wrapped(element, " **", "** ", output),
            Tag::Emphasis => self.render_wrapped(element, " *", "* ", output),
            Tag::Strikethrough => self.render_wrapped(element, "~~", "~~", output),
            Tag::Anchor => self.handle_link(element, output),
            Tag::Image => handle_image(element, output),
            Tag::List => self.render_list(element, 0, output),
            Tag::Blockquote => self.handle_blockquote(element, output),
            Tag::Code => self.handle_code(element, parent, output),
            Tag::Preformatted => self.handle_preformatted(element, output),
            Tag::Rule => output.push_str("\n---\n\n"),
            Tag::Table => {
                render_table(element, output);
                output.push_str("\n\n");
            }
            Tag::ListItem | Tag::Other => self.render_children(element, output),
        }
    }

    fn render_children(&self, element: &Element, output: &mut String) {
        for child in &element.children {
            self.render_node(child, Some(element), output);
        }
    }

    /// Render the children, then trim what they appended
    fn render_trimmed(&self, element: &Element, output: &mut String) {
        let start_len = output.len();
        self.render_children(element, output);
        trim_tail(output, start_len);
    }

    fn render_wrapped(&self, element: &Element, open: &str, close: &str, output: &mut String) {
        output.push_str(open);
        self.render_trimmed(element, output);
        output.push_str(close);
    }

    /// Handle anchor elements
    ///
    /// An anchor without a non-empty `href` is transparent.
    fn handle_link(&self, element: &Element, output: &mut String) {
        let Some(href) = element.attr("href").filter(|href| !href.is_empty()) else {
            self.render_children(element, output);
            return;
        };

        output.push('[');
        self.render_trimmed(element, output);
        output.push_str("](");
        if self.options.link_targets == LinkTargets::Href {
            output.push_str(href);
        }
        push_title(element, output);
        output.push_str(") ");
    }

    fn handle_blockquote(&self, element: &Element, output: &mut String) {
        let start_len = output.len();
        self.render_trimmed(element, output);
        let content = output.split_off(start_len);

        for (index, line) in content.split('\n').enumerate() {
            if index > 0 {
                output.push('\n');
            }
            output.push_str("> ");
            output.push_str(line);
        }
        output.push_str("\n\n");
    }

    /// Handle code elements
    ///
    /// Only a `code` whose direct parent is a `pre` becomes a fenced block.
    fn handle_code(&self, element: &Element, parent: Option<&Element>, output: &mut String) {
        let start_len = output.len();
        self.render_trimmed(element, output);

        if parent.is_some_and(|parent| parent.name == "pre") {
            let code = output.split_off(start_len);
            let language = guess_language(&code);
            output.push_str("\n```");
            output.push_str(language.as_str());
            output.push('\n');
            output.push_str(&code);
            output.push_str("\n```\n\n");
        } else {
            output.insert(start_len, '`');
            output.push('`');
        }
    }

    fn handle_preformatted(&self, element: &Element, output: &mut String) {
        match element.find_with_parent("code") {
            Some((code, parent)) => self.handle_code(code, Some(parent), output),
            None => {
                output.push_str("\n```\n");
                output.push_str(element.text_content().trim());
                output.push_str("\n```\n\n");
            }
        }
    }
}

/// Handle image elements
///
/// An image without a non-empty `src` leaves a single line break.
fn handle_image(element: &Element, output: &mut String) {
    let Some(src) = element.attr("src").filter(|src| !src.is_empty()) else {
        output.push('\n');
        return;
    };

    output.push_str("![");
    output.push_str(element.attr("alt").unwrap_or_default());
    output.push_str("](");
    output.push_str(src);
    push_title(element, output);
    output.push_str(") ");
}

/// Append ` "title"` when the element carries a non-empty title
fn push_title(element: &Element, output: &mut String) {
    if let Some(title) = element.attr("title")
        && !title.is_empty()
    {
        output.push_str(" \"");
        output.push_str(title);
        output.push('"');
    }
}

/// Trim leading and trailing whitespace of `output[start..]` in place
pub(crate) fn trim_tail(output: &mut String, start: usize) {
    let kept = output[start..].trim_end().len();
    output.truncate(start + kept);

    let leading = kept - output[start..].trim_start().len();
    output.drain(start..start + leading);
}
