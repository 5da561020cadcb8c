//! XML reader: quick-xml events to a generic tree.
//!
//! Elements become tree entries keyed by their name:
//!
//! - an element with neither attributes nor child elements is a text scalar
//!   holding its character data exactly as written
//!   (`<name> Fleetwood Mac</name>` → `" Fleetwood Mac"`, `<name/>` → `""`);
//! - any other element is an object holding its attributes, then its child
//!   elements in document order, then its character data under `$text`.
//!   Whitespace-only runs of character data in such an element are
//!   indentation and are dropped.
//!
//! Repeated sibling elements stay repeated entries; the reader never decides
//! whether something is a sequence.

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use rev_mapper::{GenericNode, ObjectNode};
use tracing::trace;

use super::utils::{self, TEXT_KEY};
use crate::error::{Result, SerdeError};

/// Parse an XML document into `{root_element_name: node}`.
///
/// # Examples
///
/// ```
/// use rev_serde::xml::parse_xml_str;
///
/// let tree = parse_xml_str("<artist><name>Fleetwood Mac</name></artist>")?;
/// let artist = tree.get("artist").unwrap();
/// assert_eq!(artist.get("name").and_then(|n| n.as_scalar()).map(|s| s.to_string()),
///            Some("Fleetwood Mac".to_string()));
/// # Ok::<(), rev_serde::SerdeError>(())
/// ```
pub fn parse_xml_str(xml: &str) -> Result<GenericNode> {
    parse_xml_reader(xml.as_bytes())
}

/// Parse an XML document from bytes.
pub fn parse_xml_slice(xml: &[u8]) -> Result<GenericNode> {
    parse_xml_reader(xml)
}

/// Parse an XML document from a buffered reader.
pub fn parse_xml_reader<R: BufRead>(reader: R) -> Result<GenericNode> {
    TreeBuilder::new(Reader::from_reader(reader)).build()
}

/// An element whose end tag has not been read yet.
struct OpenElement {
    name: String,
    content: ObjectNode,
    /// Character data kept from finished runs.
    text: String,
    /// Character data since the last child element started.
    run: String,
}

impl OpenElement {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let mut content = ObjectNode::new();

        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            if utils::is_namespace_attribute(&key) {
                continue;
            }
            let raw = String::from_utf8_lossy(&attr.value);
            let value = quick_xml::escape::unescape(&raw)
                .map_err(|e| SerdeError::Custom(format!("Invalid attribute `{}`: {}", key, e)))?;
            content.push(key, GenericNode::text(value.into_owned()));
        }

        Ok(Self {
            name,
            content,
            text: String::new(),
            run: String::new(),
        })
    }

    /// Ends the current text run, keeping it unless it is only whitespace.
    fn end_run(&mut self) {
        if !self.run.trim().is_empty() {
            self.text.push_str(&self.run);
        }
        self.run.clear();
    }

    fn close(mut self) -> (String, GenericNode) {
        if self.content.is_empty() {
            // No child has started, so the whole character data is one run.
            self.text.push_str(&self.run);
            return (self.name, GenericNode::text(self.text));
        }
        self.end_run();
        let mut content = self.content;
        if !self.text.is_empty() {
            content.push(TEXT_KEY, GenericNode::text(self.text));
        }
        (self.name, GenericNode::Object(content))
    }
}

struct TreeBuilder<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    /// Open elements, innermost last
    stack: Vec<OpenElement>,
    root: Option<(String, GenericNode)>,
}

impl<R: BufRead> TreeBuilder<R> {
    fn new(reader: Reader<R>) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            stack: Vec::new(),
            root: None,
        }
    }

    fn build(mut self) -> Result<GenericNode> {
        loop {
            self.buf.clear();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(|e| {
                    SerdeError::Custom(format!(
                        "XML parse error at position {}: {}",
                        self.reader.error_position(),
                        e
                    ))
                })?
                .into_owned();

            match event {
                Event::Start(start) => {
                    let element = OpenElement::open(&start)?;
                    self.end_parent_run();
                    self.stack.push(element);
                }
                Event::Empty(start) => {
                    let element = OpenElement::open(&start)?;
                    self.end_parent_run();
                    self.finish(element)?;
                }
                Event::End(_) => {
                    // quick-xml has already checked that the names match.
                    let element = self
                        .stack
                        .pop()
                        .ok_or_else(|| SerdeError::Custom("Unexpected closing tag".to_string()))?;
                    self.finish(element)?;
                }
                Event::Text(text) => {
                    let text = String::from_utf8_lossy(text.as_ref()).to_string();
                    self.append_text(&text)?;
                }
                Event::CData(cdata) => {
                    let text = String::from_utf8_lossy(cdata.as_ref()).to_string();
                    self.append_text(&text)?;
                }
                Event::GeneralRef(reference) => {
                    let name = String::from_utf8_lossy(reference.as_ref()).to_string();
                    let resolved = utils::resolve_reference(&name).ok_or_else(|| {
                        SerdeError::Custom(format!("Unknown entity reference `&{};`", name))
                    })?;
                    self.append_text(&resolved)?;
                }
                Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(open) = self.stack.last() {
            return Err(SerdeError::Custom(format!(
                "Unexpected end of document inside <{}>",
                open.name
            )));
        }
        let (name, node) = self
            .root
            .ok_or_else(|| SerdeError::Custom("XML document has no root element".to_string()))?;
        Ok(GenericNode::Object(ObjectNode::new().with(name, node)))
    }

    fn end_parent_run(&mut self) {
        if let Some(parent) = self.stack.last_mut() {
            parent.end_run();
        }
    }

    fn append_text(&mut self, text: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(open) => {
                open.run.push_str(text);
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => Err(SerdeError::Custom(
                "Character data outside the root element".to_string(),
            )),
        }
    }

    fn finish(&mut self, element: OpenElement) -> Result<()> {
        let (name, node) = element.close();
        trace!(element = %name, kind = node.kind_name(), "Closed XML element");
        match self.stack.last_mut() {
            Some(parent) => {
                parent.content.push(name, node);
                Ok(())
            }
            None if self.root.is_none() => {
                self.root = Some((name, node));
                Ok(())
            }
            None => Err(SerdeError::Custom(format!(
                "XML document has more than one root element (found <{}>)",
                name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rev_mapper::Scalar;

    fn text(node: Option<&GenericNode>) -> Option<String> {
        node.and_then(GenericNode::as_scalar).and_then(Scalar::to_text)
    }

    #[test]
    fn test_leaf_elements_are_text() -> Result<()> {
        let tree = parse_xml_str("<?xml version=\"1.0\"?>\n<artist>\n  <name>Fleetwood Mac</name>\n</artist>")?;
        let artist = tree.get("artist").unwrap();
        assert_eq!(text(artist.get("name")), Some("Fleetwood Mac".to_string()));
        Ok(())
    }

    #[test]
    fn test_repeated_siblings_stay_repeated() -> Result<()> {
        let tree = parse_xml_str(
            "<artist-list><artist><name>a</name></artist><artist><name>b</name></artist></artist-list>",
        )?;
        let list = tree.get("artist-list").and_then(GenericNode::as_object).unwrap();
        assert_eq!(list.count("artist"), 2);
        let names: Vec<_> = list
            .get_all("artist")
            .map(|artist| text(artist.get("name")).unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        Ok(())
    }

    #[test]
    fn test_attributes_and_mixed_text() -> Result<()> {
        let tree = parse_xml_str(
            r#"<artist xmlns="urn:music" id="fm">Fleetwood <!-- band -->Mac<genre>rock</genre></artist>"#,
        )?;
        let artist = tree.get("artist").and_then(GenericNode::as_object).unwrap();
        assert_eq!(artist.keys().collect::<Vec<_>>(), vec!["id", "genre", TEXT_KEY]);
        assert_eq!(text(artist.get(TEXT_KEY)), Some("Fleetwood Mac".to_string()));
        Ok(())
    }

    #[test]
    fn test_references_and_cdata() -> Result<()> {
        let tree = parse_xml_str(
            r#"<label name="Warner &amp; Reprise">Tom &#38; Jerry <![CDATA[<live>]]></label>"#,
        )?;
        let label = tree.get("label").unwrap();
        assert_eq!(text(label.get("name")), Some("Warner & Reprise".to_string()));
        assert_eq!(text(label.get(TEXT_KEY)), Some("Tom & Jerry <live>".to_string()));
        Ok(())
    }

    #[test]
    fn test_leaf_text_is_kept_verbatim() -> Result<()> {
        let tree = parse_xml_str("<album>\n  <title>  Rumours </title>\n  <note> </note>\n</album>")?;
        let album = tree.get("album").and_then(GenericNode::as_object).unwrap();
        assert_eq!(album.keys().collect::<Vec<_>>(), vec!["title", "note"]);
        assert_eq!(text(album.get("title")), Some("  Rumours ".to_string()));
        assert_eq!(text(album.get("note")), Some(" ".to_string()));
        Ok(())
    }

    #[test]
    fn test_empty_element() -> Result<()> {
        let tree = parse_xml_str("<artist-list/>")?;
        assert_eq!(tree.get("artist-list"), Some(&GenericNode::text("")));
        Ok(())
    }

    #[test]
    fn test_malformed_documents() {
        assert!(parse_xml_str("<artist><name>x</artist>").is_err());
        assert!(parse_xml_str("<artist>").is_err());
        assert!(parse_xml_str("").is_err());
        assert!(parse_xml_str("<a/><b/>").is_err());
    }
}
