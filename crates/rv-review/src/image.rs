//! Image frame rendering.
//!
//! A `draw:frame` becomes a single `//indepimage` line. The image member is
//! copied out of the container under a document-prefixed name, the caption
//! comes from the frame's text box (or its title), and the width is given
//! relative to the page width.

use rv_odf::XmlNode;

use crate::context::RenderContext;
use crate::error::ConvertError;
use crate::escape::{escape_param, width_percentage};
use crate::inline::render_content;

/// Render an image frame, extracting the image.
///
/// Returns `None` for frames without an internal image and for vector
/// formats that cannot be placed directly.
pub(crate) fn render_frame(
    frame: &XmlNode,
    ctx: &mut RenderContext<'_>,
) -> Result<Option<String>, ConvertError> {
    let candidates = image_candidates(frame);
    if candidates.is_empty() {
        tracing::debug!(frame = frame.attr("draw:name"), "Frame has no image");
        return Ok(None);
    }
    // Office suites may store a raster fallback next to a vector original.
    let Some(href) = candidates
        .iter()
        .filter_map(|image| image.attr("xlink:href"))
        .find(|href| !ctx.options.is_skipped_extension(extension(href)))
    else {
        tracing::debug!(frame = frame.attr("draw:name"), "Skipping vector image");
        return Ok(None);
    };
    if is_external(href) {
        tracing::debug!(href, "Skipping linked image");
        return Ok(None);
    }

    let original = href.rsplit('/').next().unwrap_or(href);
    let file_name = format!("{}-{original}", ctx.basename);
    ctx.images.store(href, &file_name)?;
    ctx.images_written += 1;

    let name = if ctx.options.is_raster_extension(extension(&file_name)) {
        file_name
            .rsplit_once('.')
            .map_or(file_name.as_str(), |(stem, _)| stem)
    } else {
        file_name.as_str()
    };
    let caption = escape_param(&caption(frame, ctx)?);
    let width = frame.attr("svg:width").and_then(|w| {
        ctx.options
            .page_width
            .as_ref()
            .and_then(|page| width_percentage(w, page))
    });

    Ok(Some(match width {
        Some(width) => format!("//indepimage[{name}][{caption}][width=\"{width}\"]"),
        None => format!("//indepimage[{name}][{caption}]"),
    }))
}

/// `draw:image` elements of the innermost frame that holds any.
fn image_candidates(node: &XmlNode) -> Vec<&XmlNode> {
    let direct: Vec<&XmlNode> = node
        .children_named("draw:image")
        .filter(|image| image.attr("xlink:href").is_some())
        .collect();
    if !direct.is_empty() {
        return direct;
    }
    node.children
        .iter()
        .map(image_candidates)
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

fn is_external(href: &str) -> bool {
    href.starts_with("../") || href.starts_with('/') || href.contains("://")
}

fn extension(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rsplit_once('.').map_or("", |(_, ext)| ext)
}

/// Caption text from the frame's text box, else its `svg:title`.
fn caption(frame: &XmlNode, ctx: &mut RenderContext<'_>) -> Result<String, ConvertError> {
    if let Some(text_box) = frame.child("draw:text-box") {
        let text_box = without_frames(text_box);
        let mut parts = Vec::new();
        for paragraph in &text_box.children {
            let text = render_content(paragraph, ctx)?;
            let text = text.trim();
            if !text.is_empty() {
                parts.push(text.to_owned());
            }
        }
        return Ok(parts.join(" "));
    }
    Ok(frame
        .child("svg:title")
        .map(|title| title.text_content().trim().to_owned())
        .unwrap_or_default())
}

/// Copy of `node` with nested frames removed, keeping their tail text.
fn without_frames(node: &XmlNode) -> XmlNode {
    let mut copy = XmlNode::new(node.tag.as_str())
        .with_text(node.text.as_str())
        .with_tail(node.tail.as_str());
    copy.attrs.clone_from(&node.attrs);
    for child in &node.children {
        if child.is("draw:frame") {
            match copy.children.last_mut() {
                Some(prev) => prev.tail.push_str(&child.tail),
                None => copy.text.push_str(&child.tail),
            }
        } else {
            copy.children.push(without_frames(child));
        }
    }
    copy
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rv_odf::{ImageStore, OdfError, OdfXmlParser, StyleSheet};

    use super::*;
    use crate::options::ConvertOptions;

    #[derive(Default)]
    struct RecordingStore {
        stored: Vec<(String, String)>,
    }

    impl ImageStore for RecordingStore {
        fn store(&mut self, href: &str, file_name: &str) -> Result<(), OdfError> {
            self.stored.push((href.to_owned(), file_name.to_owned()));
            Ok(())
        }
    }

    fn render(xml: &str) -> (Option<String>, Vec<(String, String)>) {
        let frame = OdfXmlParser::new().parse(xml.as_bytes()).unwrap();
        let options = ConvertOptions::default();
        let sheet = StyleSheet::default();
        let mut store = RecordingStore::default();
        let line = {
            let mut ctx = RenderContext::new(&options, &sheet, "ch01", &mut store);
            render_frame(&frame, &mut ctx).unwrap()
        };
        (line, store.stored)
    }

    #[test]
    fn test_plain_image_with_width() {
        let (line, stored) = render(
            r#"<draw:frame svg:width="7.55cm"><draw:image xlink:href="Pictures/10000.png"/></draw:frame>"#,
        );
        assert_eq!(
            line.as_deref(),
            Some(r#"//indepimage[ch01-10000][][width="50.00%"]"#)
        );
        assert_eq!(
            stored,
            vec![("Pictures/10000.png".to_owned(), "ch01-10000.png".to_owned())]
        );
    }

    #[test]
    fn test_width_in_other_unit_omitted() {
        let (line, _) = render(
            r#"<draw:frame svg:width="300px"><draw:image xlink:href="Pictures/a.jpg"/></draw:frame>"#,
        );
        assert_eq!(line.as_deref(), Some("//indepimage[ch01-a][]"));
    }

    #[test]
    fn test_vector_image_skipped() {
        let (line, stored) = render(
            r#"<draw:frame><draw:image xlink:href="Pictures/chart.svm"/></draw:frame>"#,
        );
        assert_eq!(line, None);
        assert!(stored.is_empty());
    }

    #[test]
    fn test_raster_fallback_preferred_over_vector() {
        let (line, stored) = render(
            r#"<draw:frame><draw:image xlink:href="Pictures/d.wmf"/><draw:image xlink:href="Pictures/d.png"/></draw:frame>"#,
        );
        assert_eq!(line.as_deref(), Some("//indepimage[ch01-d][]"));
        assert_eq!(stored[0].0, "Pictures/d.png");
    }

    #[test]
    fn test_non_raster_extension_kept_in_name() {
        let (line, _) = render(
            r#"<draw:frame><draw:image xlink:href="Pictures/d.tiff"/></draw:frame>"#,
        );
        assert_eq!(line.as_deref(), Some("//indepimage[ch01-d.tiff][]"));
    }

    #[test]
    fn test_caption_from_text_box() {
        let (line, stored) = render(
            r#"<draw:frame svg:width="15.1cm"><draw:text-box><text:p>Figure 1: <draw:frame><draw:image xlink:href="Pictures/x.png"/></draw:frame>Setup [a]</text:p></draw:text-box></draw:frame>"#,
        );
        assert_eq!(
            line.as_deref(),
            Some(r#"//indepimage[ch01-x][Figure 1: Setup [a\]][width="100.00%"]"#)
        );
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn test_caption_from_title() {
        let (line, _) = render(
            r#"<draw:frame><draw:image xlink:href="Pictures/x.gif"/><svg:title>Logo</svg:title></draw:frame>"#,
        );
        assert_eq!(line.as_deref(), Some("//indepimage[ch01-x][Logo]"));
    }

    #[test]
    fn test_frame_without_image() {
        let (line, stored) =
            render("<draw:frame><draw:text-box><text:p>Sidebar</text:p></draw:text-box></draw:frame>");
        assert_eq!(line, None);
        assert!(stored.is_empty());
    }

    #[test]
    fn test_linked_image_skipped() {
        let (line, stored) = render(
            r#"<draw:frame><draw:image xlink:href="../shared/logo.png"/></draw:frame>"#,
        );
        assert_eq!(line, None);
        assert!(stored.is_empty());
    }
}
