//! Document walker.
//!
//! Visits the direct children of the document body in order, classifies
//! each one, emits region markers from the region state machine, renders
//! the block and finally writes any footnotes the block collected.
//! Footnotes of a block inside an open code or quote region are written
//! before the region closes, so they become part of that region.

use std::io::Write;

use rv_config::Config;
use rv_odf::{ImageStore, OdfDocument, XmlNode};

use crate::classify::{BlockKind, classify};
use crate::context::RenderContext;
use crate::error::ConvertError;
use crate::image::render_frame;
use crate::inline::render_content;
use crate::list::render_list;
use crate::options::ConvertOptions;
use crate::region::transition;
use crate::table::render_table;

/// Body children that carry no printable content.
const SKIPPED_BLOCKS: &[&str] = &[
    "text:sequence-decls",
    "text:variable-decls",
    "text:user-field-decls",
    "text:tracked-changes",
    "text:table-of-content",
    "office:forms",
    "text:soft-page-break",
];

/// Counters reported after a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Blocks visited.
    pub blocks: usize,
    /// Lines written.
    pub lines: usize,
    /// Images extracted.
    pub images: usize,
    /// Footnotes written.
    pub footnotes: usize,
}

/// Converts a parsed document into Re:VIEW markup.
///
/// # Example
///
/// ```
/// use rv_odf::{ImageStore, OdfDocument, OdfError};
/// use rv_review::Converter;
///
/// struct NoImages;
///
/// impl ImageStore for NoImages {
///     fn store(&mut self, _href: &str, _name: &str) -> Result<(), OdfError> {
///         Ok(())
///     }
/// }
///
/// let xml = br#"<office:document-content><office:body><office:text>
/// <text:h text:style-name="Heading_20_1">Intro</text:h>
/// </office:text></office:body></office:document-content>"#;
/// let doc = OdfDocument::from_xml(xml, None).unwrap();
/// let out = Converter::default()
///     .convert_to_string(&doc, "ch01", &mut NoImages)
///     .unwrap();
/// assert_eq!(out, "== Intro\n\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter with explicit options.
    #[must_use]
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Create a converter from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(ConvertOptions::from_config(config))
    }

    /// Convert `doc`, writing markup lines to `out`.
    ///
    /// `basename` prefixes footnote ids and extracted image names. Images
    /// are handed to `images` as frames are encountered.
    pub fn convert<W: Write>(
        &self,
        doc: &OdfDocument,
        basename: &str,
        images: &mut dyn ImageStore,
        out: W,
    ) -> Result<ConvertSummary, ConvertError> {
        let mut ctx = RenderContext::new(&self.options, &doc.styles, basename, images);
        let mut writer = LineWriter::new(out);
        let mut blocks = 0;

        self.walk(&doc.body, &mut ctx, &mut writer, &mut blocks)?;

        let close = transition(ctx.region, None);
        for marker in close.emit {
            writer.line(marker)?;
        }
        writer.flush()?;

        let summary = ConvertSummary {
            blocks,
            lines: writer.lines,
            images: ctx.images_written,
            footnotes: ctx.footnotes.total(),
        };
        tracing::info!(
            basename,
            blocks = summary.blocks,
            lines = summary.lines,
            images = summary.images,
            footnotes = summary.footnotes,
            "Conversion completed"
        );
        Ok(summary)
    }

    /// Convert `doc` into a string.
    pub fn convert_to_string(
        &self,
        doc: &OdfDocument,
        basename: &str,
        images: &mut dyn ImageStore,
    ) -> Result<String, ConvertError> {
        let mut buf = Vec::new();
        self.convert(doc, basename, images, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn walk<W: Write>(
        &self,
        container: &XmlNode,
        ctx: &mut RenderContext<'_>,
        writer: &mut LineWriter<W>,
        blocks: &mut usize,
    ) -> Result<(), ConvertError> {
        for node in &container.children {
            let tag = node.tag.as_str();
            if tag == "text:section" {
                self.walk(node, ctx, writer, blocks)?;
                continue;
            }
            if SKIPPED_BLOCKS.contains(&tag) {
                continue;
            }
            *blocks += 1;
            self.block(node, ctx, writer)?;
        }
        Ok(())
    }

    fn block<W: Write>(
        &self,
        node: &XmlNode,
        ctx: &mut RenderContext<'_>,
        writer: &mut LineWriter<W>,
    ) -> Result<(), ConvertError> {
        let kind = classify(node, ctx.sheet, &self.options.styles);
        let step = transition(ctx.region, Some(&kind));
        for marker in step.emit {
            writer.line(marker)?;
        }
        ctx.region = step.next;

        for line in render_block(node, &kind, ctx)? {
            writer.line(&line)?;
        }

        if !ctx.footnotes.is_empty() {
            for note in ctx.footnotes.flush() {
                writer.line(&note)?;
            }
            writer.line("")?;
        }
        Ok(())
    }
}

/// Output lines for one block.
fn render_block(
    node: &XmlNode,
    kind: &BlockKind,
    ctx: &mut RenderContext<'_>,
) -> Result<Vec<String>, ConvertError> {
    let lines = match kind {
        BlockKind::List(list_kind) => return render_list(node, *list_kind, ctx),
        BlockKind::Table => return render_table(node, ctx),
        BlockKind::Image => return render_images(node, ctx),
        BlockKind::Title => vec![format!("= {}", text(node, ctx)?), String::new()],
        BlockKind::Subtitle => vec![
            "//subtitle{".to_owned(),
            text(node, ctx)?,
            "//}".to_owned(),
            String::new(),
        ],
        BlockKind::Heading(level) => {
            vec![format!("{} {}", "=".repeat(*level), text(node, ctx)?), String::new()]
        }
        BlockKind::Code | BlockKind::Quote | BlockKind::Author => vec![text(node, ctx)?],
        BlockKind::Body => {
            let text = text(node, ctx)?;
            if text.is_empty() {
                vec![String::new()]
            } else {
                vec![text, String::new()]
            }
        }
        BlockKind::Unknown(style) => {
            tracing::debug!(style = %style, "Unknown paragraph style");
            vec![format!("<<{style}>>{}", text(node, ctx)?), String::new()]
        }
    };
    Ok(lines)
}

fn text(node: &XmlNode, ctx: &mut RenderContext<'_>) -> Result<String, ConvertError> {
    let rendered = render_content(node, ctx)?;
    Ok(rendered.trim_matches('\n').to_owned())
}

fn render_images(node: &XmlNode, ctx: &mut RenderContext<'_>) -> Result<Vec<String>, ConvertError> {
    let mut lines = Vec::new();
    if node.is("draw:frame") {
        lines.extend(render_frame(node, ctx)?);
    } else {
        for frame in node.children_named("draw:frame") {
            lines.extend(render_frame(frame, ctx)?);
        }
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    Ok(lines)
}

/// Line-oriented writer counting emitted lines.
struct LineWriter<W: Write> {
    inner: W,
    lines: usize,
}

impl<W: Write> LineWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, lines: 0 }
    }

    fn line(&mut self, line: &str) -> std::io::Result<()> {
        self.inner.write_all(line.as_bytes())?;
        self.inner.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
