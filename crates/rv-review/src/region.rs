//! Open/close bookkeeping for multi-paragraph regions.
//!
//! Consecutive code, quote and author paragraphs share one enclosing
//! block. The region opens before the first paragraph of its kind and
//! closes as soon as a block of any other kind follows, or at the end of
//! the document.

use crate::classify::BlockKind;

/// Closing marker shared by all regions.
pub const CLOSE_MARKER: &str = "//}";

/// Currently open region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    /// No region open.
    #[default]
    None,
    /// `//emlist{`
    Code,
    /// `//quote{`
    Quote,
    /// `//author{`
    Author,
}

impl Region {
    /// Region a block belongs to.
    #[must_use]
    pub fn for_kind(kind: &BlockKind) -> Self {
        match kind {
            BlockKind::Code => Self::Code,
            BlockKind::Quote => Self::Quote,
            BlockKind::Author => Self::Author,
            _ => Self::None,
        }
    }

    fn open_markers(self) -> &'static [&'static str] {
        match self {
            Self::None => &[],
            Self::Code => &["//emlist{"],
            Self::Quote => &["//quote{"],
            // Signature blocks are separated from preceding text.
            Self::Author => &["", "//author{"],
        }
    }
}

/// Markers to emit and the region that results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Lines written before the next block.
    pub emit: Vec<&'static str>,
    /// Region after the transition.
    pub next: Region,
}

/// Compute the transition from `current` to the region of `next`.
///
/// `None` marks the end of the document.
#[must_use]
pub fn transition(current: Region, next: Option<&BlockKind>) -> Transition {
    let target = next.map_or(Region::None, Region::for_kind);
    if target == current {
        return Transition {
            emit: Vec::new(),
            next: current,
        };
    }
    let mut emit = Vec::new();
    if current != Region::None {
        emit.push(CLOSE_MARKER);
    }
    emit.extend_from_slice(target.open_markers());
    Transition { emit, next: target }
}
