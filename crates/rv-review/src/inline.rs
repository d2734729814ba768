//! Inline content rendering.
//!
//! Walks the children of a paragraph-like element and produces its text
//! with inline markup. Each child is rendered, then its tail text follows,
//! so document order is preserved.

use rv_odf::XmlNode;

use crate::classify::IGNORED_INLINE;
use crate::context::RenderContext;
use crate::error::ConvertError;
use crate::escape::escape_param;
use crate::image;

/// Render the content of `node` (its text and children, not its tail).
pub(crate) fn render_content(
    node: &XmlNode,
    ctx: &mut RenderContext<'_>,
) -> Result<String, ConvertError> {
    let mut out = String::new();
    push_text(&mut out, &node.text);
    for child in &node.children {
        let rendered = render_element(child, ctx)?;
        out.push_str(&rendered);
        push_text(&mut out, &child.tail);
    }
    Ok(out)
}

/// Render a single inline element.
fn render_element(node: &XmlNode, ctx: &mut RenderContext<'_>) -> Result<String, ConvertError> {
    let tag = node.tag.as_str();
    if IGNORED_INLINE.contains(&tag) {
        return Ok(String::new());
    }
    match tag {
        "text:note" => render_note(node, ctx),
        "draw:frame" => {
            // Frames inside running text still become standalone lines.
            let line = image::render_frame(node, ctx)?.and_then(|l| ctx.defer_frame(l));
            Ok(line.map(|l| format!("\n{l}\n")).unwrap_or_default())
        }
        "text:a" => render_link(node, ctx),
        "text:span" => render_span(node, ctx),
        "text:s" => {
            let count = node
                .attr("text:c")
                .and_then(|c| c.parse::<usize>().ok())
                .unwrap_or(1);
            Ok(" ".repeat(count))
        }
        "text:tab" => Ok("\t".to_owned()),
        "text:line-break" => Ok("\n".to_owned()),
        _ => render_content(node, ctx),
    }
}

fn render_span(node: &XmlNode, ctx: &mut RenderContext<'_>) -> Result<String, ConvertError> {
    let content = render_content(node, ctx)?;
    let bold = node
        .attr("text:style-name")
        .and_then(|name| ctx.sheet.text_property(name, "fo:font-weight"))
        == Some("bold");
    if bold {
        Ok(format!("@<b>{{{content}}}"))
    } else {
        Ok(content)
    }
}

fn render_link(node: &XmlNode, ctx: &mut RenderContext<'_>) -> Result<String, ConvertError> {
    let content = render_content(node, ctx)?;
    let Some(href) = node.attr("xlink:href") else {
        return Ok(content);
    };
    if content.is_empty() {
        Ok(format!("@<href>{{{href}}}"))
    } else {
        Ok(format!("@<href>{{{href},{}}}", escape_param(&content)))
    }
}

/// Render a footnote or endnote reference and queue its body.
fn render_note(node: &XmlNode, ctx: &mut RenderContext<'_>) -> Result<String, ConvertError> {
    let local = match node.attr("text:id") {
        Some(id) => id.to_owned(),
        None => ctx.footnotes.next_anonymous_id(),
    };
    let id = format!("{}-{local}", ctx.basename);

    let mut body = String::new();
    if let Some(note_body) = node.child("text:note-body") {
        for paragraph in &note_body.children {
            body.push('\n');
            body.push_str(&render_content(paragraph, ctx)?);
        }
    }
    tracing::debug!(id, class = node.attr("text:note-class"), "Collected note");
    ctx.footnotes.push(&id, &body);
    Ok(format!("@<fn>{{{id}}}"))
}

fn push_text(out: &mut String, text: &str) {
    out.extend(text.chars().filter(|&c| c != '\r'));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rv_odf::{ImageStore, OdfDocument, OdfError, OdfXmlParser, StyleSheet};

    use super::*;
    use crate::options::ConvertOptions;

    const CONTENT: &str = r#"<office:document-content>
<office:automatic-styles>
  <style:style style:name="T1" style:family="text"><style:text-properties fo:font-weight="bold"/></style:style>
  <style:style style:name="T2" style:family="text"><style:text-properties fo:font-style="italic"/></style:style>
  <style:style style:name="T3" style:family="text" style:parent-style-name="Strong_20_Emphasis"/>
</office:automatic-styles>
<office:styles>
  <style:style style:name="Strong_20_Emphasis" style:family="text"><style:text-properties fo:font-weight="bold"/></style:style>
</office:styles>
<office:body><office:text/></office:body>
</office:document-content>"#;

    struct NoImages;

    impl ImageStore for NoImages {
        fn store(&mut self, href: &str, _file_name: &str) -> Result<(), OdfError> {
            Err(OdfError::MissingImage(href.to_owned()))
        }
    }

    fn sheet() -> StyleSheet {
        OdfDocument::from_xml(CONTENT.as_bytes(), None)
            .unwrap()
            .styles
    }

    fn render(xml: &str) -> (String, Vec<String>) {
        let node = OdfXmlParser::new().parse(xml.as_bytes()).unwrap();
        let options = ConvertOptions::default();
        let sheet = sheet();
        let mut images = NoImages;
        let mut ctx = RenderContext::new(&options, &sheet, "doc", &mut images);
        let text = render_content(&node, &mut ctx).unwrap();
        (text, ctx.footnotes.flush())
    }

    #[test]
    fn test_plain_text() {
        let (text, notes) = render("<text:p>Hello world</text:p>");
        assert_eq!(text, "Hello world");
        assert!(notes.is_empty());
    }

    #[test]
    fn test_bold_span() {
        let (text, _) = render(
            r#"<text:p>a <text:span text:style-name="T1">bold</text:span> b</text:p>"#,
        );
        assert_eq!(text, "a @<b>{bold} b");
    }

    #[test]
    fn test_bold_via_parent_style() {
        let (text, _) =
            render(r#"<text:p><text:span text:style-name="T3">x</text:span></text:p>"#);
        assert_eq!(text, "@<b>{x}");
    }

    #[test]
    fn test_non_bold_span_is_transparent() {
        let (text, _) =
            render(r#"<text:p><text:span text:style-name="T2">it</text:span>!</text:p>"#);
        assert_eq!(text, "it!");
    }

    #[test]
    fn test_link() {
        let (text, _) = render(
            r#"<text:p>Go <text:a xlink:href="http://example.com/">there</text:a>.</text:p>"#,
        );
        assert_eq!(text, "Go @<href>{http://example.com/,there}.");
    }

    #[test]
    fn test_link_without_text() {
        let (text, _) = render(r#"<text:p><text:a xlink:href="http://x.org/"/></text:p>"#);
        assert_eq!(text, "@<href>{http://x.org/}");
    }

    #[test]
    fn test_spaces_tabs_breaks() {
        let (text, _) = render(
            r#"<text:p>a<text:s text:c="3"/>b<text:s/>c<text:tab/>d<text:line-break/>e</text:p>"#,
        );
        assert_eq!(text, "a   b c\td\ne");
    }

    #[test]
    fn test_ignored_elements_keep_tail() {
        let (text, _) = render(
            r#"<text:p>a<text:bookmark text:name="x"/>b<office:annotation><text:p>note</text:p></office:annotation>c</text:p>"#,
        );
        assert_eq!(text, "abc");
    }

    #[test]
    fn test_unknown_elements_are_transparent() {
        let (text, _) = render("<text:p>x<text:sequence>1</text:sequence>y</text:p>");
        assert_eq!(text, "x1y");
    }

    #[test]
    fn test_carriage_returns_stripped() {
        let (text, _) = render("<text:p>a&#13;b</text:p>");
        assert_eq!(text, "ab");
    }

    #[test]
    fn test_footnote() {
        let (text, notes) = render(
            r#"<text:p>Claim<text:note text:id="ftn1" text:note-class="footnote"><text:note-citation>1</text:note-citation><text:note-body><text:p>Source [a]</text:p></text:note-body></text:note> here.</text:p>"#,
        );
        assert_eq!(text, "Claim@<fn>{doc-ftn1} here.");
        assert_eq!(notes, vec![r"//footnote[doc-ftn1][Source [a\]]".to_owned()]);
    }

    #[test]
    fn test_footnote_without_id() {
        let (text, notes) = render(
            "<text:p>a<text:note><text:note-body><text:p>one</text:p></text:note-body></text:note>\
             b<text:note><text:note-body><text:p>two</text:p></text:note-body></text:note></text:p>",
        );
        assert_eq!(text, "a@<fn>{doc-fn1}b@<fn>{doc-fn2}");
        assert_eq!(
            notes,
            vec![
                "//footnote[doc-fn1][one]".to_owned(),
                "//footnote[doc-fn2][two]".to_owned(),
            ]
        );
    }

    #[test]
    fn test_nested_markup_in_footnote() {
        let (_, notes) = render(
            r#"<text:p><text:note text:id="n"><text:note-body><text:p><text:span text:style-name="T1">b</text:span></text:p></text:note-body></text:note></text:p>"#,
        );
        assert_eq!(notes, vec!["//footnote[doc-n][@<b>{b}]".to_owned()]);
    }
}
