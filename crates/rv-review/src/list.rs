//! List rendering.
//!
//! Nesting depth is inferred from each item's left margin: margins are
//! compared in order against the ones already seen in the list, starting
//! from a zero baseline. The first registered margin that is at least as
//! large as the item's wins; a larger margin registers a deeper level.

use rv_odf::{Length, ListKind, ListStyle, XmlNode};

use crate::context::RenderContext;
use crate::error::ConvertError;
use crate::inline::render_content;

/// Margins seen so far in one list block, in centimetres.
#[derive(Debug)]
pub struct MarginLevels {
    levels: Vec<f64>,
}

impl MarginLevels {
    /// Registry holding only the zero baseline.
    #[must_use]
    pub fn new() -> Self {
        Self { levels: vec![0.0] }
    }

    /// Depth (0-based) for an item with the given margin.
    pub fn depth(&mut self, margin: f64) -> usize {
        if let Some(index) = self.levels.iter().position(|&known| margin <= known) {
            return index;
        }
        self.levels.push(margin);
        self.levels.len() - 1
    }
}

impl Default for MarginLevels {
    fn default() -> Self {
        Self::new()
    }
}

/// A paragraph inside a list with its structural nesting level (1-based).
struct Item<'a> {
    paragraph: &'a XmlNode,
    level: u32,
    list_style: Option<&'a str>,
}

/// Render a list block into output lines, including the trailing blank line.
pub(crate) fn render_list(
    list: &XmlNode,
    kind: ListKind,
    ctx: &mut RenderContext<'_>,
) -> Result<Vec<String>, ConvertError> {
    let mut items = Vec::new();
    collect_items(list, 1, list.attr("text:style-name"), &mut items);

    // Images would break the item line; they follow the list instead.
    ctx.defer_frames();
    let mut levels = MarginLevels::new();
    let mut lines = Vec::with_capacity(items.len() + 1);
    for (index, item) in items.iter().enumerate() {
        let text = render_content(item.paragraph, ctx)?;
        let line = match kind {
            ListKind::Number => format!(" {}. {text}", index + 1),
            ListKind::Bullet => {
                let depth = levels.depth(effective_margin(item, ctx));
                format!(" {} {text}", ctx.options.bullet.repeat(depth + 1))
            }
        };
        lines.push(line);
    }
    lines.push(String::new());

    let frames = ctx.take_deferred_frames();
    if !frames.is_empty() {
        lines.extend(frames);
        lines.push(String::new());
    }
    Ok(lines)
}

fn collect_items<'a>(
    list: &'a XmlNode,
    level: u32,
    list_style: Option<&'a str>,
    items: &mut Vec<Item<'a>>,
) {
    for entry in &list.children {
        if !(entry.is("text:list-item") || entry.is("text:list-header")) {
            continue;
        }
        for child in &entry.children {
            match child.tag.as_str() {
                "text:p" | "text:h" => items.push(Item {
                    paragraph: child,
                    level,
                    list_style,
                }),
                "text:list" => {
                    let nested_style = child.attr("text:style-name").or(list_style);
                    collect_items(child, level + 1, nested_style, items);
                }
                _ => {}
            }
        }
    }
}

/// Left margin of an item in centimetres.
fn effective_margin(item: &Item<'_>, ctx: &RenderContext<'_>) -> f64 {
    let sheet = ctx.sheet;
    if let Some(margin) = item
        .paragraph
        .attr("text:style-name")
        .and_then(|name| sheet.paragraph_property(name, "fo:margin-left"))
    {
        return to_cm(margin);
    }
    let Some(style) = item.list_style.and_then(|name| sheet.list_style(name)) else {
        return 0.0;
    };
    // Relative to the outermost level so unindented items sit at the baseline.
    (level_margin(style, item.level) - level_margin(style, 1)).max(0.0)
}

fn level_margin(style: &ListStyle, level: u32) -> f64 {
    style
        .level(level)
        .and_then(|l| l.margin_left.as_deref())
        .map_or(0.0, to_cm)
}

fn to_cm(value: &str) -> f64 {
    Length::parse(value)
        .and_then(|len| len.to_cm())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rv_odf::{ImageStore, OdfDocument, OdfError, OdfXmlParser};

    use super::*;
    use crate::options::ConvertOptions;

    const CONTENT: &str = r#"<office:document-content>
<office:automatic-styles>
  <style:style style:name="P1" style:family="paragraph"><style:paragraph-properties fo:margin-left="0cm"/></style:style>
  <style:style style:name="P2" style:family="paragraph"><style:paragraph-properties fo:margin-left="1cm"/></style:style>
  <style:style style:name="P3" style:family="paragraph"><style:paragraph-properties fo:margin-left="20mm"/></style:style>
  <style:style style:name="P4" style:family="paragraph"><style:paragraph-properties fo:margin-left="0.5cm"/></style:style>
  <text:list-style style:name="L1">
    <text:list-level-style-bullet text:level="1"><style:list-level-properties><style:list-level-label-alignment fo:margin-left="1.27cm"/></style:list-level-properties></text:list-level-style-bullet>
    <text:list-level-style-bullet text:level="2"><style:list-level-properties><style:list-level-label-alignment fo:margin-left="1.905cm"/></style:list-level-properties></text:list-level-style-bullet>
  </text:list-style>
</office:automatic-styles>
<office:body><office:text/></office:body>
</office:document-content>"#;

    struct NoImages;

    impl ImageStore for NoImages {
        fn store(&mut self, _href: &str, _file_name: &str) -> Result<(), OdfError> {
            Ok(())
        }
    }

    fn render(xml: &str, kind: ListKind) -> Vec<String> {
        let list = OdfXmlParser::new().parse(xml.as_bytes()).unwrap();
        let doc = OdfDocument::from_xml(CONTENT.as_bytes(), None).unwrap();
        let options = ConvertOptions::default();
        let mut images = NoImages;
        let mut ctx = RenderContext::new(&options, &doc.styles, "doc", &mut images);
        render_list(&list, kind, &mut ctx).unwrap()
    }

    #[test]
    fn test_margin_levels_first_match() {
        let mut levels = MarginLevels::new();
        assert_eq!(levels.depth(0.0), 0);
        assert_eq!(levels.depth(1.0), 1);
        assert_eq!(levels.depth(2.0), 2);
        assert_eq!(levels.depth(0.5), 1);
        assert_eq!(levels.depth(1.0), 1);
        assert_eq!(levels.depth(-1.0), 0);
    }

    #[test]
    fn test_equal_zero_margins_are_top_level() {
        let lines = render(
            r#"<text:list><text:list-item><text:p text:style-name="P1">one</text:p></text:list-item><text:list-item><text:p text:style-name="P1">two</text:p></text:list-item></text:list>"#,
            ListKind::Bullet,
        );
        assert_eq!(lines, vec![" * one", " * two", ""]);
    }

    #[test]
    fn test_greater_margin_goes_deeper() {
        let lines = render(
            r#"<text:list>
<text:list-item><text:p text:style-name="P1">a</text:p></text:list-item>
<text:list-item><text:p text:style-name="P2">b</text:p></text:list-item>
<text:list-item><text:p text:style-name="P3">c</text:p></text:list-item>
<text:list-item><text:p text:style-name="P4">d</text:p></text:list-item>
</text:list>"#,
            ListKind::Bullet,
        );
        assert_eq!(lines, vec![" * a", " ** b", " *** c", " ** d", ""]);
    }

    #[test]
    fn test_nested_list_uses_list_style_levels() {
        let lines = render(
            r#"<text:list text:style-name="L1"><text:list-item><text:p>outer</text:p><text:list><text:list-item><text:p>inner</text:p></text:list-item></text:list></text:list-item><text:list-item><text:p>next</text:p></text:list-item></text:list>"#,
            ListKind::Bullet,
        );
        assert_eq!(lines, vec![" * outer", " ** inner", " * next", ""]);
    }

    #[test]
    fn test_numbered_list_ignores_depth() {
        let lines = render(
            r#"<text:list><text:list-item><text:p text:style-name="P1">first</text:p></text:list-item><text:list-item><text:p text:style-name="P2">second</text:p></text:list-item><text:list-item><text:p>third</text:p></text:list-item></text:list>"#,
            ListKind::Number,
        );
        assert_eq!(lines, vec![" 1. first", " 2. second", " 3. third", ""]);
    }

    #[test]
    fn test_multiple_paragraphs_per_item() {
        let lines = render(
            r"<text:list><text:list-item><text:p>a</text:p><text:p>b</text:p></text:list-item></text:list>",
            ListKind::Bullet,
        );
        assert_eq!(lines, vec![" * a", " * b", ""]);
    }

    #[test]
    fn test_image_in_item_follows_list() {
        let lines = render(
            r#"<text:list><text:list-item><text:p>See <draw:frame><draw:image xlink:href="Pictures/a.png"/></draw:frame></text:p></text:list-item><text:list-item><text:p>next</text:p></text:list-item></text:list>"#,
            ListKind::Number,
        );
        assert_eq!(
            lines,
            vec![" 1. See ", " 2. next", "", "//indepimage[doc-a][]", ""]
        );
    }
}
