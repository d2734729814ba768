//! Error types for document conversion.

use std::io;

use rv_odf::OdfError;

/// Conversion error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// Writing the markup output failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
    /// Reading from the document container failed (image extraction).
    #[error(transparent)]
    Odf(#[from] OdfError),
}
