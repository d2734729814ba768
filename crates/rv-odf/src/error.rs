//! Error types for the ODF reader.

use quick_xml::encoding::EncodingError;
use zip::result::ZipError;

/// Error while opening or reading an OpenDocument container.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OdfError {
    /// Reading the container or writing an extracted image failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The file is not a readable ZIP container.
    #[error("invalid document container: {0}")]
    Zip(#[from] ZipError),

    /// A required part or element is absent from the container.
    #[error("missing {0} (is this an OpenDocument text file?)")]
    MissingPart(String),

    /// An image referenced by a frame is not stored in the container.
    #[error("image {0} not found in document")]
    MissingImage(String),

    /// A document part is not well-formed XML.
    #[error("malformed document XML: {0}")]
    XmlParse(#[from] quick_xml::Error),

    /// Text could not be decoded from the part's declared encoding.
    #[error("cannot decode document XML: {0}")]
    Encoding(#[from] EncodingError),
}
