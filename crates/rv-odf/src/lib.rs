//! OpenDocument Text reader for RV.
//!
//! Opens `.odt` containers, parses their XML parts into an owned
//! [`XmlNode`] tree and resolves styles through ODF inheritance rules.
//! Images are copied out of the container through the [`ImageStore`] trait
//! so converters can be tested without touching the filesystem.
//!
//! # Example
//!
//! ```
//! use rv_odf::OdfDocument;
//!
//! let content = br#"<office:document-content><office:body><office:text>
//! <text:p text:style-name="Standard">Hello</text:p>
//! </office:text></office:body></office:document-content>"#;
//!
//! let doc = OdfDocument::from_xml(content, None).unwrap();
//! assert_eq!(doc.body.children[0].text, "Hello");
//! ```

mod error;
mod length;
mod package;
mod parser;
mod styles;
mod tree;

pub use error::OdfError;
pub use length::Length;
pub use package::{ImageStore, OdfDocument, OdfPackage, PackageImages};
pub use parser::OdfXmlParser;
pub use styles::{ListKind, ListLevel, ListStyle, PropertySet, StyleDef, StyleSheet};
pub use tree::XmlNode;
