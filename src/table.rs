//! Table rendering
//!
//! A table is rendered one of two ways, chosen per table by
//! [`is_complex_table`]:
//!
//! - **Simple** tables become pipe tables. The first row is the header,
//!   followed by a `---` separator as wide as the header, then every
//!   remaining row.
//! - **Complex** tables (spanning cells, nested tables, images) cannot be
//!   expressed as a pipe table, so they are re-emitted as reduced HTML that
//!   keeps only `table`, `tr`, `td`, `th` and `img`.
//!
//! # Examples
//!
//! ```rust
//! use htm2md::html_to_markdown;
//!
//! let markdown = html_to_markdown(
//!     "<table><tr><th>Name</th><th>Age</th></tr><tr><td>Ann</td><td>30</td></tr></table>",
//! );
//! assert_eq!(markdown, "| Name  | Age  |\n| --- | --- |\n| Ann  | 30  |");
//! ```

use log::debug;

use crate::dom::{Element, Node};

/// Elements kept by the reduced markup of complex tables
const REDUCED_ELEMENTS: &[&str] = &["table", "tr", "td", "th"];

/// Whether a table needs the reduced-markup fallback
///
/// A table is complex when it contains an image anywhere, or when any cell
/// of any row has a `rowspan` or `colspan` attribute (even an empty one) or
/// holds a nested table.
pub fn is_complex_table(table: &Element) -> bool {
    if table.contains("img") {
        return true;
    }

    table
        .find_all(&["tr"])
        .into_iter()
        .flat_map(|row| row.find_all(&["td", "th"]))
        .any(|cell| cell.has_attr("rowspan") || cell.has_attr("colspan") || cell.contains("table"))
}

/// Append the rendering of a table to `output`
///
/// A simple table without any row renders as nothing.
pub(crate) fn render_table(table: &Element, output: &mut String) {
    if is_complex_table(table) {
        debug!("Rendering complex table as reduced markup");
        output.push('\n');
        write_reduced_markup(table, output);
        output.push_str("\n\n");
        return;
    }

    let rows: Vec<Vec<String>> = table
        .find_all(&["tr"])
        .into_iter()
        .map(|row| row.find_all(&["td", "th"]).into_iter().map(cell_text).collect())
        .collect();

    let Some((header, body)) = rows.split_first() else {
        debug!("Skipping table without rows");
        return;
    };
    debug!(
        "Rendering pipe table with {} column(s) and {} body row(s)",
        header.len(),
        body.len()
    );

    output.push_str("\n\n");
    push_row(output, header.as_slice());
    output.push('\n');
    push_row(output, vec!["---"; header.len()].as_slice());
    output.push('\n');
    for (index, row) in body.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }
        push_row(output, row.as_slice());
    }
    output.push_str("\n\n");
}

/// Cell text for a pipe table: fragments joined by a space, line breaks
/// flattened, one trailing space
fn cell_text(cell: &Element) -> String {
    let text = cell
        .text_fragments()
        .join(" ")
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ");
    format!("{} ", text.trim())
}

fn push_row<S: AsRef<str>>(output: &mut String, cells: &[S]) {
    output.push_str("| ");
    for (index, cell) in cells.iter().enumerate() {
        if index > 0 {
            output.push_str(" | ");
        }
        output.push_str(cell.as_ref());
    }
    output.push_str(" |");
}

fn write_reduced_markup(element: &Element, output: &mut String) {
    let name = element.name.as_str();

    if name == "img" {
        output.push_str("<img ");
        for (index, (key, value)) in element.attrs.iter().enumerate() {
            if index > 0 {
                output.push(' ');
            }
            output.push_str(key);
            output.push_str("=\"");
            output.push_str(value);
            output.push('"');
        }
        output.push_str("/>");
        return;
    }

    let kept = REDUCED_ELEMENTS.contains(&name);
    if kept {
        output.push('<');
        output.push_str(name);
        if let Some(rowspan) = element.attr("rowspan") {
            output.push_str(" rowspan=\"");
            output.push_str(rowspan);
            output.push('"');
        }
        output.push('>');
    }

    for child in &element.children {
        match child {
            Node::Text(text) => output.push_str(text),
            Node::Element(child) => write_reduced_markup(child, output),
        }
    }

    if kept {
        output.push_str("</");
        output.push_str(name);
        output.push('>');
    }
}
