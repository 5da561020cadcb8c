//! XML adapter.
//!
//! XML has no array construct: a sequence is a run of sibling elements that
//! share a name, and a one-element sequence looks exactly like a single nested
//! element. The reader therefore produces plain repeated entries and leaves it
//! to the mapper's type descriptors to decide what is a sequence; the XML
//! format always maps sequences wrapper-implicit.
//!
//! ## Mapping
//!
//! | XML | Tree |
//! |-----|------|
//! | `<name>Fleetwood Mac</name>` | `"name": "Fleetwood Mac"` |
//! | `<artist/><artist/>` | `"artist": {..}, "artist": {..}` |
//! | `<artist id="fm">..</artist>` | `"artist": {"id": "fm", ..}` |
//! | `<note lang="en">hi</note>` | `"note": {"lang": "en", "$text": "hi"}` |
//!
//! Namespace declarations are dropped on read and never written.
//!
//! ## Examples
//!
//! ```ignore
//! use rev_serde::xml::{from_xml_str, to_xml_string};
//!
//! let xml = "<artist-list><artist><name>Fleetwood Mac</name></artist></artist-list>";
//! let list: ArtistList = from_xml_str(&mapper, xml)?;
//! assert_eq!(list.artists.len(), 1);
//!
//! let xml = to_xml_string(&mapper, &list)?;
//! ```

pub mod de;
pub mod ser;
mod utils;

use rev_mapper::{Decoder, Encoder, Entity, GenericNode, Mapper, Wrapping};
use tracing::debug;

use crate::error::{Result, SerdeError};

pub use de::{parse_xml_reader, parse_xml_slice, parse_xml_str};
pub use ser::{write_xml_string, write_xml_string_pretty, write_xml_vec, write_xml_writer};
pub use utils::TEXT_KEY;

/// Deserialize an entity from an XML document whose root element is the
/// entity's root key.
pub fn from_xml_str<T: Entity>(mapper: &Mapper, xml: &str) -> Result<T> {
    mapper.read(&XmlFormat::new(), xml.as_bytes())
}

/// Deserialize an entity from XML bytes.
pub fn from_xml_slice<T: Entity>(mapper: &Mapper, xml: &[u8]) -> Result<T> {
    mapper.read(&XmlFormat::new(), xml)
}

/// Serialize an entity to an XML document.
pub fn to_xml_string<T: Entity>(mapper: &Mapper, entity: &T) -> Result<String> {
    crate::json::into_string(mapper.write(&XmlFormat::new(), entity)?)
}

/// Serialize an entity to an indented XML document.
pub fn to_xml_string_pretty<T: Entity>(mapper: &Mapper, entity: &T) -> Result<String> {
    crate::json::into_string(mapper.write(&XmlFormat::pretty(), entity)?)
}

/// The XML format, as a [`Decoder`]/[`Encoder`] pair for [`Mapper::read`]
/// and [`Mapper::write`].
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlFormat {
    pretty: bool,
}

impl XmlFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Decoder for XmlFormat {
    type Error = SerdeError;

    fn sequence_layout(&self) -> Option<Wrapping> {
        Some(Wrapping::Implicit)
    }

    fn decode_bytes(&self, bytes: &[u8]) -> Result<GenericNode> {
        debug!(bytes = bytes.len(), "Parsing XML document");
        parse_xml_slice(bytes)
    }
}

impl Encoder for XmlFormat {
    type Error = SerdeError;

    fn sequence_layout(&self) -> Option<Wrapping> {
        Some(Wrapping::Implicit)
    }

    fn encode_node(&self, node: &GenericNode) -> Result<Vec<u8>> {
        if self.pretty {
            Ok(write_xml_string_pretty(node)?.into_bytes())
        } else {
            write_xml_vec(node)
        }
    }
}
