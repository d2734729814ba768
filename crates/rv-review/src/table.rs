//! Table rendering.

use rv_odf::XmlNode;

use crate::context::RenderContext;
use crate::error::ConvertError;
use crate::inline::render_content;

/// Cell placeholder for empty cells.
const EMPTY_CELL: &str = ".";
/// Separator emitted after a header row with an empty corner cell.
const HEADER_SEPARATOR: &str = "--------------";
/// Joins paragraphs inside one cell.
const CELL_LINE_BREAK: &str = "@<br>{}";
/// Upper bound for `table:number-rows-repeated`.
///
/// Spreadsheet exports pad tables with up to a million repeated empty rows.
const MAX_ROW_REPEAT: usize = 100;

/// Render a table block into output lines, including the trailing blank line.
pub(crate) fn render_table(
    table: &XmlNode,
    ctx: &mut RenderContext<'_>,
) -> Result<Vec<String>, ConvertError> {
    let name = table.attr("table:name").unwrap_or("table");
    let columns = column_count(table);
    let mut rows = Vec::new();
    collect_rows(table, &mut rows);

    // Images inside cells would split the tab-joined row; emit them after the table.
    ctx.defer_frames();
    let mut lines = vec![format!("//table[{name}][]{{")];
    let mut emitted = 0;
    for row in &rows {
        let cells = render_row(row, columns, ctx)?;
        let header_corner = cells.first().is_some_and(|c| c == EMPTY_CELL);
        let line = cells.join("\t");
        let repeat = repeat_count(row, "table:number-rows-repeated").min(MAX_ROW_REPEAT);
        for _ in 0..repeat {
            lines.push(line.clone());
            if emitted == 0 && header_corner {
                lines.push(HEADER_SEPARATOR.to_owned());
            }
            emitted += 1;
        }
    }
    lines.push("//}".to_owned());
    lines.push(String::new());

    let frames = ctx.take_deferred_frames();
    if !frames.is_empty() {
        lines.extend(frames);
        lines.push(String::new());
    }
    tracing::debug!(name, rows = emitted, columns, "Rendered table");
    Ok(lines)
}

fn render_row(
    row: &XmlNode,
    columns: usize,
    ctx: &mut RenderContext<'_>,
) -> Result<Vec<String>, ConvertError> {
    let mut cells = Vec::new();
    for cell in &row.children {
        let covered = cell.is("table:covered-table-cell");
        if !(covered || cell.is("table:table-cell")) {
            continue;
        }
        let text = if covered {
            String::new()
        } else {
            render_cell(cell, ctx)?
        };
        let text = if text.is_empty() {
            EMPTY_CELL.to_owned()
        } else if text.starts_with('.') {
            format!(".{text}")
        } else {
            text
        };

        let repeat = repeat_count(cell, "table:number-columns-repeated");
        // Spreadsheet-style trailing repeats can be huge; stop at the declared width.
        let remaining = columns.saturating_sub(cells.len()).max(1);
        for _ in 1..repeat.min(remaining) {
            cells.push(text.clone());
        }
        cells.push(text);
    }
    Ok(cells)
}

/// Value of a repeat attribute, at least 1.
fn repeat_count(node: &XmlNode, attr: &str) -> usize {
    node.attr(attr)
        .and_then(|n| n.parse::<usize>().ok())
        .unwrap_or(1)
        .max(1)
}

fn render_cell(cell: &XmlNode, ctx: &mut RenderContext<'_>) -> Result<String, ConvertError> {
    let mut parts = Vec::new();
    for child in &cell.children {
        let text = render_content(child, ctx)?;
        if !text.is_empty() {
            parts.push(text);
        }
    }
    Ok(parts.join(CELL_LINE_BREAK))
}

fn collect_rows<'a>(node: &'a XmlNode, rows: &mut Vec<&'a XmlNode>) {
    for child in &node.children {
        match child.tag.as_str() {
            "table:table-row" => rows.push(child),
            "table:table-header-rows" | "table:table-rows" | "table:table-row-group" => {
                collect_rows(child, rows);
            }
            _ => {}
        }
    }
}

/// Declared column count (`table:table-column`, honouring repeats).
fn column_count(node: &XmlNode) -> usize {
    node.children
        .iter()
        .map(|child| match child.tag.as_str() {
            "table:table-column" => repeat_count(child, "table:number-columns-repeated"),
            "table:table-columns" | "table:table-header-columns" | "table:table-column-group" => {
                column_count(child)
            }
            _ => 0,
        })
        .sum()
}
