//! Re:VIEW markup generation from OpenDocument text.
//!
//! The [`Converter`] walks the body of an [`OdfDocument`](rv_odf::OdfDocument)
//! block by block:
//!
//! - each block is [classified](classify()) into a closed set of
//!   [`BlockKind`]s using its resolved paragraph style
//! - consecutive code, quote and signature paragraphs share one region
//!   whose open and close markers come from [`transition`]
//! - inline content (bold spans, links, footnotes, image frames) is rendered
//!   in document order
//! - footnote bodies are queued and written after the block that
//!   referenced them
//!
//! Images are handed to an [`ImageStore`](rv_odf::ImageStore) as they are
//! encountered.

mod classify;
mod context;
mod converter;
mod error;
mod escape;
mod footnote;
mod image;
mod inline;
mod list;
mod options;
mod region;
mod table;

pub use classify::{BlockKind, classify};
pub use converter::{ConvertSummary, Converter};
pub use error::ConvertError;
pub use escape::{escape_param, heading_level, width_percentage};
pub use footnote::Footnotes;
pub use list::MarginLevels;
pub use options::ConvertOptions;
pub use region::{CLOSE_MARKER, Region, Transition, transition};
