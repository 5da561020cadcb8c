//! XML writer: a generic tree to quick-xml events.
//!
//! The tree must be a rooted document, `{root_element_name: node}`. Arrays are
//! spread into repeated sibling elements named by their key, null values are
//! omitted, and objects without entries are written as empty elements.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rev_mapper::GenericNode;

use super::utils::TEXT_KEY;
use crate::error::{Result, SerdeError};

/// Write a rooted generic tree as an XML document.
///
/// # Examples
///
/// ```
/// use rev_mapper::{GenericNode, ObjectNode};
/// use rev_serde::xml::write_xml_string;
///
/// let artist: GenericNode = ObjectNode::new().with("name", "Fleetwood Mac".into()).into();
/// let document: GenericNode = ObjectNode::new().with("artist", artist).into();
/// assert_eq!(
///     write_xml_string(&document)?,
///     r#"<?xml version="1.0" encoding="UTF-8"?><artist><name>Fleetwood Mac</name></artist>"#
/// );
/// # Ok::<(), rev_serde::SerdeError>(())
/// ```
pub fn write_xml_string(document: &GenericNode) -> Result<String> {
    crate::json::into_string(write_xml_vec(document)?)
}

/// Write a rooted generic tree as an indented XML document.
pub fn write_xml_string_pretty(document: &GenericNode) -> Result<String> {
    let mut buffer = Vec::new();
    TreeWriter::new(Writer::new_with_indent(&mut buffer, b' ', 2)).write_document(document)?;
    crate::json::into_string(buffer)
}

/// Write a rooted generic tree as XML bytes.
pub fn write_xml_vec(document: &GenericNode) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_xml_writer(&mut buffer, document)?;
    Ok(buffer)
}

/// Write a rooted generic tree to any writer.
pub fn write_xml_writer<W: Write>(writer: W, document: &GenericNode) -> Result<()> {
    TreeWriter::new(Writer::new(writer)).write_document(document)
}

struct TreeWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> TreeWriter<W> {
    fn new(writer: Writer<W>) -> Self {
        Self { writer }
    }

    fn write_document(&mut self, document: &GenericNode) -> Result<()> {
        let root = match document {
            GenericNode::Object(object) if object.len() == 1 => object.iter().next(),
            _ => None,
        };
        let Some((name, node)) = root else {
            return Err(SerdeError::Custom(format!(
                "An XML document needs exactly one root element, got {}",
                describe_root(document)
            )));
        };
        if matches!(node, GenericNode::Array(_)) {
            return Err(SerdeError::Custom(format!(
                "Root element <{}> cannot be a sequence",
                name
            )));
        }

        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_element(name, node)
    }

    fn write_element(&mut self, name: &str, node: &GenericNode) -> Result<()> {
        match node {
            GenericNode::Scalar(scalar) if scalar.is_null() => Ok(()),
            GenericNode::Scalar(scalar) => {
                let text = scalar.to_string();
                if text.is_empty() {
                    self.writer.write_event(Event::Empty(BytesStart::new(name)))?;
                } else {
                    self.writer.write_event(Event::Start(BytesStart::new(name)))?;
                    self.writer.write_event(Event::Text(BytesText::new(&text)))?;
                    self.writer.write_event(Event::End(BytesEnd::new(name)))?;
                }
                Ok(())
            }
            GenericNode::Array(items) => {
                for item in items {
                    self.write_element(name, item)?;
                }
                Ok(())
            }
            GenericNode::Object(object) => {
                if object.iter().all(|(_, value)| value.is_null()) {
                    self.writer.write_event(Event::Empty(BytesStart::new(name)))?;
                    return Ok(());
                }
                self.writer.write_event(Event::Start(BytesStart::new(name)))?;
                for (key, value) in object.iter() {
                    if key == TEXT_KEY {
                        if let Some(text) = value.as_scalar().and_then(|s| s.to_text()) {
                            self.writer.write_event(Event::Text(BytesText::new(&text)))?;
                        }
                    } else {
                        self.write_element(key, value)?;
                    }
                }
                self.writer.write_event(Event::End(BytesEnd::new(name)))?;
                Ok(())
            }
        }
    }
}

fn describe_root(document: &GenericNode) -> String {
    match document.as_object() {
        Some(object) => format!("{} top-level entries", object.len()),
        None => document.kind_name().to_string(),
    }
}
