//! ODF XML part parser.
//!
//! Builds an owned [`XmlNode`] tree with a stack of open elements. Text is
//! attached ElementTree-style: before the first child it goes to the
//! element's `text`, afterwards to the preceding child's `tail`.

use std::borrow::Cow;
use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::OdfError;
use crate::tree::XmlNode;

/// Parse an ODF XML part (`content.xml`, `styles.xml`) into an [`XmlNode`] tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct OdfXmlParser;

impl OdfXmlParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse raw XML bytes and return the root element.
    ///
    /// Whitespace is preserved: ODF paragraphs carry significant spaces.
    /// Elements left open at the end of input are closed implicitly.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not well-formed XML or contain no
    /// root element.
    pub fn parse(self, xml: &[u8]) -> Result<XmlNode, OdfError> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(false);

        let mut open: Vec<XmlNode> = Vec::new();
        let mut buf = Vec::new();
        loop {
            let finished = match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    open.push(element(&reader, &e));
                    None
                }
                Event::Empty(e) => attach(&mut open, element(&reader, &e)),
                Event::End(_) => open.pop().and_then(|node| attach(&mut open, node)),
                Event::Text(e) => {
                    if let Some(node) = open.last_mut() {
                        append_text(node, &reader.decoder().decode(&e)?);
                    }
                    None
                }
                Event::GeneralRef(e) => {
                    if let Some(node) = open.last_mut() {
                        let entity = reader.decoder().decode(&e)?;
                        append_text(node, &decode_entity(&entity));
                    }
                    None
                }
                Event::CData(e) => {
                    if let Some(node) = open.last_mut() {
                        append_text(node, &String::from_utf8_lossy(&e));
                    }
                    None
                }
                Event::Eof => {
                    return close_unfinished(open)
                        .ok_or_else(|| OdfError::MissingPart("root element".to_owned()));
                }
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => None,
            };
            if let Some(root) = finished {
                return Ok(root);
            }
            buf.clear();
        }
    }
}

/// Add a completed element to its parent, or return it when it is the root.
fn attach(open: &mut [XmlNode], node: XmlNode) -> Option<XmlNode> {
    match open.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            None
        }
        None => Some(node),
    }
}

fn close_unfinished(mut open: Vec<XmlNode>) -> Option<XmlNode> {
    let mut node = open.pop()?;
    while let Some(mut parent) = open.pop() {
        parent.children.push(node);
        node = parent;
    }
    Some(node)
}

/// Element with decoded name and attributes, namespace declarations dropped.
fn element(reader: &Reader<&[u8]>, e: &BytesStart) -> XmlNode {
    let decode = |bytes: &[u8]| {
        reader
            .decoder()
            .decode(bytes)
            .map_or_else(|_| String::from_utf8_lossy(bytes).into_owned(), Cow::into_owned)
    };
    let attrs: HashMap<String, String> = e
        .attributes()
        .flatten()
        .filter_map(|attr| {
            let key = decode(attr.key.as_ref());
            if key.starts_with("xmlns") {
                return None;
            }
            let value = attr
                .unescape_value()
                .map_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned(), Cow::into_owned);
            Some((key, value))
        })
        .collect();
    XmlNode {
        tag: decode(e.name().as_ref()),
        attrs,
        ..XmlNode::default()
    }
}

/// Append text to node's text or last child's tail.
fn append_text(node: &mut XmlNode, text: &str) {
    if let Some(last_child) = node.children.last_mut() {
        last_child.tail.push_str(text);
    } else {
        node.text.push_str(text);
    }
}

/// Decode XML entity references to their character values.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        // Unknown entity - preserve as-is
        _ => format!("&{entity};"),
    }
}
