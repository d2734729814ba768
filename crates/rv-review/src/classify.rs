//! Block classification.
//!
//! Each direct child of the document body maps to exactly one
//! [`BlockKind`]. Structural elements (tables, lists, image-only
//! paragraphs) are recognised first; paragraphs are then classified by
//! their named style, resolving automatic styles (`P1`) to the user-visible
//! style they derive from.

use rv_config::StylesConfig;
use rv_odf::{ListKind, StyleSheet, XmlNode};

use crate::escape::heading_level;

/// Style assumed for paragraphs without a `text:style-name`.
const DEFAULT_PARAGRAPH_STYLE: &str = "Standard";

/// Inline elements that never contribute content.
pub(crate) const IGNORED_INLINE: &[&str] = &[
    "office:annotation",
    "office:annotation-end",
    "text:bookmark",
    "text:bookmark-start",
    "text:bookmark-end",
    "text:reference-mark",
    "text:reference-mark-start",
    "text:reference-mark-end",
    "text:soft-page-break",
    "text:note-citation",
    "text:number",
];

/// Kind of a top-level block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// Document title.
    Title,
    /// Subtitle.
    Subtitle,
    /// Heading with its output level (number of `=` markers).
    Heading(usize),
    /// Line of a code listing region.
    Code,
    /// Line of a signature region.
    Author,
    /// Line of a quotation region.
    Quote,
    /// Plain paragraph.
    Body,
    /// List with the marker kind of its outermost level.
    List(ListKind),
    /// Table.
    Table,
    /// Paragraph holding only image frames.
    Image,
    /// Paragraph with an unrecognised style (the resolved style name).
    Unknown(String),
}

/// Classify a body child.
#[must_use]
pub fn classify(node: &XmlNode, sheet: &StyleSheet, names: &StylesConfig) -> BlockKind {
    match node.tag.as_str() {
        "table:table" => BlockKind::Table,
        "text:list" => BlockKind::List(list_kind(node, sheet)),
        "draw:frame" => BlockKind::Image,
        "text:p" | "text:h" => {
            if is_image_paragraph(node) {
                return BlockKind::Image;
            }
            let heading = node.is("text:h");
            // An unstyled heading must not fall back to the body style.
            if heading && node.attr("text:style-name").is_none() {
                return outline_heading(node);
            }
            let style = paragraph_style(node, sheet);
            classify_style(style, names).unwrap_or_else(|| {
                if heading {
                    outline_heading(node)
                } else {
                    BlockKind::Unknown(style.to_owned())
                }
            })
        }
        other => BlockKind::Unknown(other.to_owned()),
    }
}

/// Heading one level below its `text:outline-level` (default 1).
fn outline_heading(node: &XmlNode) -> BlockKind {
    let level = node
        .attr("text:outline-level")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(1);
    BlockKind::Heading(level + 1)
}

/// Named paragraph style of a block, resolved through automatic styles.
pub(crate) fn paragraph_style<'a>(node: &'a XmlNode, sheet: &'a StyleSheet) -> &'a str {
    let raw = node
        .attr("text:style-name")
        .unwrap_or(DEFAULT_PARAGRAPH_STYLE);
    sheet.named_style("paragraph", raw)
}

fn classify_style(style: &str, names: &StylesConfig) -> Option<BlockKind> {
    let matches = |list: &[String]| list.iter().any(|name| name == style);
    if matches(&names.title) {
        Some(BlockKind::Title)
    } else if matches(&names.subtitle) {
        Some(BlockKind::Subtitle)
    } else if let Some(level) = heading_level(style) {
        Some(BlockKind::Heading(level))
    } else if matches(&names.code) {
        Some(BlockKind::Code)
    } else if matches(&names.author) {
        Some(BlockKind::Author)
    } else if matches(&names.quote) {
        Some(BlockKind::Quote)
    } else if matches(&names.body) {
        Some(BlockKind::Body)
    } else {
        None
    }
}

/// Marker kind of a list from its own style or its first paragraph's.
pub(crate) fn list_kind(list: &XmlNode, sheet: &StyleSheet) -> ListKind {
    if let Some(style) = list
        .attr("text:style-name")
        .and_then(|name| sheet.list_style(name))
    {
        return style.kind();
    }
    first_paragraph(list)
        .and_then(|p| p.attr("text:style-name"))
        .and_then(|name| sheet.paragraph_list_style(name))
        .and_then(|name| sheet.list_style(name))
        .map(rv_odf::ListStyle::kind)
        .unwrap_or_default()
}

fn first_paragraph(node: &XmlNode) -> Option<&XmlNode> {
    node.children.iter().find_map(|child| {
        if child.is("text:p") || child.is("text:h") {
            Some(child)
        } else {
            first_paragraph(child)
        }
    })
}

/// A paragraph whose only content is one or more image frames.
fn is_image_paragraph(node: &XmlNode) -> bool {
    if !node.text.trim().is_empty() {
        return false;
    }
    let mut frames = 0;
    for child in &node.children {
        if !child.tail.trim().is_empty() {
            return false;
        }
        if child.is("draw:frame") {
            frames += 1;
        } else if !IGNORED_INLINE.contains(&child.tag.as_str()) {
            return false;
        }
    }
    frames > 0
}
