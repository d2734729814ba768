//! Per-conversion mutable state.

use rv_odf::{ImageStore, StyleSheet};

use crate::footnote::Footnotes;
use crate::options::ConvertOptions;
use crate::region::Region;

/// State threaded through one conversion run.
///
/// A fresh context is created for every document, so nothing leaks
/// between conversions.
pub(crate) struct RenderContext<'a> {
    pub options: &'a ConvertOptions,
    pub sheet: &'a StyleSheet,
    /// Output file stem, used to prefix footnote ids and image names.
    pub basename: &'a str,
    pub images: &'a mut dyn ImageStore,
    pub footnotes: Footnotes,
    pub region: Region,
    pub images_written: usize,
    /// Image directives held back while rendering one-line constructs
    /// (table rows, list items). `None` splices frames in place.
    deferred_frames: Option<Vec<String>>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        options: &'a ConvertOptions,
        sheet: &'a StyleSheet,
        basename: &'a str,
        images: &'a mut dyn ImageStore,
    ) -> Self {
        Self {
            options,
            sheet,
            basename,
            images,
            footnotes: Footnotes::new(),
            region: Region::None,
            images_written: 0,
            deferred_frames: None,
        }
    }

    /// Start holding back image directives instead of splicing them inline.
    pub fn defer_frames(&mut self) {
        self.deferred_frames = Some(Vec::new());
    }

    /// Hold back `line` if deferral is active, else hand it back.
    pub fn defer_frame(&mut self, line: String) -> Option<String> {
        match self.deferred_frames.as_mut() {
            Some(deferred) => {
                deferred.push(line);
                None
            }
            None => Some(line),
        }
    }

    /// Stop deferring and return the held-back directives.
    pub fn take_deferred_frames(&mut self) -> Vec<String> {
        self.deferred_frames.take().unwrap_or_default()
    }
}
