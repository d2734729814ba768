//! OpenDocument container access.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::OdfError;
use crate::parser::OdfXmlParser;
use crate::styles::StyleSheet;
use crate::tree::XmlNode;

/// Main document part.
const CONTENT_PART: &str = "content.xml";
/// Named styles part.
const STYLES_PART: &str = "styles.xml";

/// Destination for images referenced by the document.
///
/// The converter calls [`store`](Self::store) once per image frame it emits.
pub trait ImageStore {
    /// Copy the container member `href` to the image directory as `file_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the member is missing or the file cannot be written.
    fn store(&mut self, href: &str, file_name: &str) -> Result<(), OdfError>;
}

/// Parsed text document: body element and style index.
#[derive(Debug, Clone)]
pub struct OdfDocument {
    /// The `office:text` element holding the block sequence.
    pub body: XmlNode,
    /// Styles from `content.xml` and `styles.xml`.
    pub styles: StyleSheet,
}

impl OdfDocument {
    /// Build a document from raw XML parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed or has no `office:text` body.
    pub fn from_xml(content: &[u8], styles: Option<&[u8]>) -> Result<Self, OdfError> {
        let parser = OdfXmlParser::new();
        let content_root = parser.parse(content)?;
        let styles_root = styles.map(|xml| parser.parse(xml)).transpose()?;
        let style_sheet = StyleSheet::from_parts(&content_root, styles_root.as_ref());

        let body = content_root
            .child("office:body")
            .and_then(|body| body.child("office:text"))
            .cloned()
            .ok_or_else(|| OdfError::MissingPart("office:text".to_owned()))?;

        Ok(Self {
            body,
            styles: style_sheet,
        })
    }
}

/// An opened `.odt` container.
pub struct OdfPackage {
    archive: ZipArchive<File>,
}

impl OdfPackage {
    /// Open a document container.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not a ZIP archive.
    pub fn open(path: &Path) -> Result<Self, OdfError> {
        let file = File::open(path).map_err(|e| {
            OdfError::Io(std::io::Error::new(
                e.kind(),
                format!("{e}: {}", path.display()),
            ))
        })?;
        let archive = ZipArchive::new(file)?;
        tracing::debug!(path = %path.display(), entries = archive.len(), "Opened container");
        Ok(Self { archive })
    }

    /// Load and parse the text document.
    ///
    /// `content.xml` is required; `styles.xml` is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if the content part is missing or malformed.
    pub fn document(&mut self) -> Result<OdfDocument, OdfError> {
        let content = self
            .read_part(CONTENT_PART)?
            .ok_or_else(|| OdfError::MissingPart(CONTENT_PART.to_owned()))?;
        let styles = self.read_part(STYLES_PART)?;
        if styles.is_none() {
            tracing::warn!("Container has no styles.xml, named styles unavailable");
        }
        OdfDocument::from_xml(&content, styles.as_deref())
    }

    /// Image store writing into `dir`.
    pub fn images(&mut self, dir: impl Into<PathBuf>) -> PackageImages<'_> {
        PackageImages {
            package: self,
            dir: dir.into(),
        }
    }

    fn read_part(&mut self, name: &str) -> Result<Option<Vec<u8>>, OdfError> {
        match self.archive.by_name(name) {
            Ok(mut entry) => {
                let mut bytes = Vec::new();
                entry.read_to_end(&mut bytes)?;
                Ok(Some(bytes))
            }
            Err(ZipError::FileNotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// [`ImageStore`] extracting images from an [`OdfPackage`].
pub struct PackageImages<'a> {
    package: &'a mut OdfPackage,
    dir: PathBuf,
}

impl ImageStore for PackageImages<'_> {
    fn store(&mut self, href: &str, file_name: &str) -> Result<(), OdfError> {
        let mut entry = match self.package.archive.by_name(href) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Err(OdfError::MissingImage(href.to_owned())),
            Err(e) => return Err(e.into()),
        };
        std::fs::create_dir_all(&self.dir)?;
        let target = self.dir.join(file_name);
        let mut file = File::create(&target)?;
        let bytes = std::io::copy(&mut entry, &mut file)?;
        tracing::debug!(href, target = %target.display(), bytes, "Extracted image");
        Ok(())
    }
}
