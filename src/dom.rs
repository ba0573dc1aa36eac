//! Owned document tree
//!
//! html5ever hands back a reference-counted DOM with parent back-pointers and
//! interior mutability. The renderer wants something simpler: a strict
//! ownership tree where every node belongs to exactly one parent and nothing
//! changes while it is being read. This module lowers the `RcDom` into that
//! tree once, right after parsing.
//!
//! Lowering also takes care of the things the renderer should never see:
//!
//! - comments, doctypes and processing instructions are dropped
//! - non-content elements (`head`, `script`, `style`, `noscript`, `meta`) are
//!   removed with their whole subtree
//! - nesting deeper than the configured limit is flattened into text, so
//!   every later recursive pass has a bounded depth

use log::{debug, warn};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Default limit for element nesting kept by the lowering pass
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;

/// Elements removed together with their children before rendering
const NON_CONTENT_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "meta"];

/// A node of the owned document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Raw text, entities already decoded by the parser
    Text(String),
    /// An element with its attributes and children
    Element(Element),
}

impl Node {
    /// Shorthand for a text node
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// Returns the element if this node is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An element node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase local tag name
    pub name: String,
    /// Attributes in source order
    pub attrs: Vec<(String, String)>,
    /// Children in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element without attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute append
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder-style text child append
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::Text(text.into()))
    }

    /// Value of the first attribute with the given name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the attribute is present at all, even with an empty value
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(key, _)| key == name)
    }

    /// Direct element children, in order
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First descendant element with the given tag, in document order
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.find_with_parent(name).map(|(found, _)| found)
    }

    /// First descendant element with the given tag, together with its parent
    pub fn find_with_parent(&self, name: &str) -> Option<(&Element, &Element)> {
        for child in self.child_elements() {
            if child.name == name {
                return Some((child, self));
            }
            if let Some(found) = child.find_with_parent(name) {
                return Some(found);
            }
        }
        None
    }

    /// Whether any descendant element has the given tag
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// All descendant elements whose tag is one of `names`, in pre-order
    ///
    /// Matches nested inside other matches are included.
    pub fn find_all(&self, names: &[&str]) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_all(names, &mut found);
        found
    }

    fn collect_all<'a>(&'a self, names: &[&str], found: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if names.contains(&child.name.as_str()) {
                found.push(child);
            }
            child.collect_all(names, found);
        }
    }

    /// Raw concatenation of every descendant text node
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.push_text(&mut text);
        text
    }

    fn push_text(&self, text: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(value) => text.push_str(value),
                Node::Element(element) => element.push_text(text),
            }
        }
    }

    /// Descendant text strings, each trimmed, empty ones dropped
    pub fn text_fragments(&self) -> Vec<&str> {
        let mut fragments = Vec::new();
        self.collect_fragments(&mut fragments);
        fragments
    }

    fn collect_fragments<'a>(&'a self, fragments: &mut Vec<&'a str>) {
        for child in &self.children {
            match child {
                Node::Text(value) => {
                    let trimmed = value.trim();
                    if !trimmed.is_empty() {
                        fragments.push(trimmed);
                    }
                }
                Node::Element(element) => element.collect_fragments(fragments),
            }
        }
    }
}

/// A parsed document: the children of the document root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Top-level nodes (normally a single `html` element)
    pub children: Vec<Node>,
}

impl Document {
    /// Wrap already-built top-level nodes
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Lower an html5ever DOM into the owned tree
    ///
    /// Elements nested `max_depth` levels below the document root are
    /// replaced by a text node holding their descendant text.
    pub fn from_rcdom(dom: &RcDom, max_depth: usize) -> Self {
        let mut lowering = Lowering {
            max_depth,
            flattened: 0,
        };
        let children = lowering.children_of(&dom.document, 0);

        if lowering.flattened > 0 {
            warn!(
                "Document nesting exceeds {} levels; flattened {} subtree(s) to text",
                max_depth, lowering.flattened
            );
        }
        debug!("Lowered document with {} top-level node(s)", children.len());

        Self { children }
    }

    /// The content container (`body`), if the document has one
    pub fn body(&self) -> Option<&Element> {
        self.children.iter().find_map(|node| match node {
            Node::Element(element) if element.name == "body" => Some(element),
            Node::Element(element) => element.find("body"),
            Node::Text(_) => None,
        })
    }

    /// Mutable access to the content container
    pub fn body_mut(&mut self) -> Option<&mut Element> {
        find_element_mut(&mut self.children, "body")
    }
}

fn find_element_mut<'a>(nodes: &'a mut [Node], name: &str) -> Option<&'a mut Element> {
    for node in nodes {
        if let Node::Element(element) = node {
            if element.name == name {
                return Some(element);
            }
            if let Some(found) = find_element_mut(&mut element.children, name) {
                return Some(found);
            }
        }
    }
    None
}

/// State of one RcDom to owned tree lowering pass
struct Lowering {
    max_depth: usize,
    flattened: usize,
}

impl Lowering {
    fn children_of(&mut self, handle: &Handle, depth: usize) -> Vec<Node> {
        handle
            .children
            .borrow()
            .iter()
            .filter_map(|child| self.lower(child, depth))
            .collect()
    }

    fn lower(&mut self, handle: &Handle, depth: usize) -> Option<Node> {
        match handle.data {
            NodeData::Text { ref contents } => Some(Node::Text(contents.borrow().to_string())),
            NodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                let tag: &str = name.local.as_ref();
                if NON_CONTENT_ELEMENTS.contains(&tag) {
                    return None;
                }
                if depth >= self.max_depth {
                    self.flattened += 1;
                    return Some(Node::Text(flatten_text(handle)));
                }

                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                    .collect();
                let children = self.children_of(handle, depth + 1);

                Some(Node::Element(Element {
                    name: tag.to_string(),
                    attrs,
                    children,
                }))
            }
            // Comments, doctypes and processing instructions carry no content
            NodeData::Document
            | NodeData::Doctype { .. }
            | NodeData::Comment { .. }
            | NodeData::ProcessingInstruction { .. } => None,
        }
    }
}

/// Descendant text of a subtree, gathered with an explicit stack
fn flatten_text(handle: &Handle) -> String {
    let mut text = String::new();
    let mut stack: Vec<Handle> = vec![handle.clone()];

    while let Some(node) = stack.pop() {
        match node.data {
            NodeData::Text { ref contents } => text.push_str(&contents.borrow()),
            NodeData::Element { ref name, .. }
                if NON_CONTENT_ELEMENTS.contains(&&*name.local) => {}
            NodeData::Element { .. } => {
                stack.extend(node.children.borrow().iter().rev().cloned());
            }
            _ => {}
        }
    }

    text
}
