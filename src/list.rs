//! Nested list rendering
//!
//! Each `li` becomes one item. The item's children are rendered one by one
//! and the non-blank results are stacked as lines. A nested `ul`/`ol` child is
//! rendered one level deeper and joins the stack as its own block. The first
//! line gets the item marker, every later line gets the continuation indent.
//!
//! Indentation is two spaces per level. Because nested lists are rendered
//! with their own indent and then re-indented as continuation lines, a child
//! list item sits two spaces deeper than its parent's continuation lines:
//!
//! ```text
//! - outer
//!   continued
//!     - inner
//! ```

use crate::converter::MarkdownConverter;
use crate::dom::{Element, Node};

const INDENT: &str = "  ";

impl MarkdownConverter {
    /// Render a `ul`/`ol` at the given nesting depth
    ///
    /// Ordered lists are always numbered from 1, whatever their `start`
    /// attribute says. The fragment ends with a newline.
    pub(crate) fn render_list(&self, list: &Element, depth: usize, output: &mut String) {
        let ordered = list.name == "ol";
        let indent = INDENT.repeat(depth);
        let continuation = INDENT.repeat(depth + 1);

        let items = list.child_elements().filter(|child| child.name == "li");
        for (index, item) in items.enumerate() {
            if index > 0 {
                output.push('\n');
            }

            let content = self.item_blocks(item, depth).join("\n");
            let mut lines = content.split('\n');

            output.push_str(&indent);
            if ordered {
                output.push_str(&(index + 1).to_string());
                output.push('.');
            } else {
                output.push('-');
            }
            output.push(' ');
            output.push_str(lines.next().unwrap_or_default());

            for line in lines {
                output.push('\n');
                if !line.trim().is_empty() {
                    output.push_str(&continuation);
                    output.push_str(line);
                }
            }
        }
        output.push('\n');
    }

    /// Non-blank rendered blocks of one list item, in child order
    fn item_blocks(&self, item: &Element, depth: usize) -> Vec<String> {
        let mut blocks = Vec::new();

        for child in &item.children {
            match child {
                Node::Element(sublist) if sublist.name == "ul" || sublist.name == "ol" => {
                    let mut rendered = String::new();
                    self.render_list(sublist, depth + 1, &mut rendered);
                    if !rendered.trim().is_empty() {
                        blocks.push(format!("{}\n", rendered.trim_end()));
                    }
                }
                _ => {
                    let mut rendered = String::new();
                    self.render_node(child, Some(item), &mut rendered);
                    let trimmed = rendered.trim();
                    if !trimmed.is_empty() {
                        blocks.push(trimmed.to_string());
                    }
                }
            }
        }

        blocks
    }
}
