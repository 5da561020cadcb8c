//! JSON adapter.
//!
//! Parsing goes straight from `serde_json` events to a [`GenericNode`], so
//! object keys keep their document order and a key repeated in the input is
//! kept as repeated entries (the mapper then reports it as ambiguous instead
//! of silently keeping the last one).
//!
//! JSON cannot repeat keys, so every sequence is written wrapper-explicit:
//! `{"artist": [..]}`. When a tree with repeated keys is written anyway (one
//! built for XML, say), the entries are folded into a single array.

use rev_mapper::{Decoder, Encoder, Entity, GenericNode, Mapper, ObjectNode, Scalar, Wrapping};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use tracing::debug;

use crate::error::{Result, SerdeError};

/// Parse a JSON document into a generic tree.
///
/// # Examples
///
/// ```
/// use rev_serde::json::parse_json_str;
///
/// let tree = parse_json_str(r#"{"artist-list": {"artist": {"name": "Fleetwood Mac"}}}"#)?;
/// assert!(tree.get("artist-list").is_some());
/// # Ok::<(), rev_serde::SerdeError>(())
/// ```
pub fn parse_json_str(s: &str) -> Result<GenericNode> {
    let tree: JsonTree = serde_json::from_str(s)?;
    Ok(tree.0)
}

/// Parse a JSON document from bytes.
pub fn parse_json_slice(bytes: &[u8]) -> Result<GenericNode> {
    let tree: JsonTree = serde_json::from_slice(bytes)?;
    Ok(tree.0)
}

/// Write a generic tree as compact JSON.
pub fn write_json_string(node: &GenericNode) -> Result<String> {
    Ok(serde_json::to_string(&JsonNode(node))?)
}

/// Write a generic tree as pretty-printed JSON.
pub fn write_json_string_pretty(node: &GenericNode) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonNode(node))?)
}

/// Write a generic tree as compact JSON bytes.
pub fn write_json_vec(node: &GenericNode) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&JsonNode(node))?)
}

/// Deserialize an entity from a rooted JSON document.
///
/// # Examples
///
/// ```ignore
/// use rev_serde::json::from_json_str;
///
/// let json = r#"{"artist-list": {"artist": [{"name": "Fleetwood Mac"}]}}"#;
/// let list: ArtistList = from_json_str(&mapper, json)?;
/// ```
pub fn from_json_str<T: Entity>(mapper: &Mapper, s: &str) -> Result<T> {
    mapper.read(&JsonFormat::new(), s.as_bytes())
}

/// Deserialize an entity from rooted JSON bytes.
pub fn from_json_slice<T: Entity>(mapper: &Mapper, bytes: &[u8]) -> Result<T> {
    mapper.read(&JsonFormat::new(), bytes)
}

/// Serialize an entity to a rooted JSON string.
pub fn to_json_string<T: Entity>(mapper: &Mapper, entity: &T) -> Result<String> {
    into_string(mapper.write(&JsonFormat::new(), entity)?)
}

/// Serialize an entity to a rooted, pretty-printed JSON string.
pub fn to_json_string_pretty<T: Entity>(mapper: &Mapper, entity: &T) -> Result<String> {
    into_string(mapper.write(&JsonFormat::pretty(), entity)?)
}

pub(crate) fn into_string(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| SerdeError::Custom(format!("Invalid UTF-8: {}", e)))
}

/// The JSON format, as a [`Decoder`]/[`Encoder`] pair for [`Mapper::read`]
/// and [`Mapper::write`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat {
    pretty: bool,
}

impl JsonFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Decoder for JsonFormat {
    type Error = SerdeError;

    fn sequence_layout(&self) -> Option<Wrapping> {
        Some(Wrapping::Explicit)
    }

    fn decode_bytes(&self, bytes: &[u8]) -> Result<GenericNode> {
        debug!(bytes = bytes.len(), "Parsing JSON document");
        parse_json_slice(bytes)
    }
}

impl Encoder for JsonFormat {
    type Error = SerdeError;

    fn sequence_layout(&self) -> Option<Wrapping> {
        Some(Wrapping::Explicit)
    }

    fn encode_node(&self, node: &GenericNode) -> Result<Vec<u8>> {
        if self.pretty {
            Ok(serde_json::to_vec_pretty(&JsonNode(node))?)
        } else {
            write_json_vec(node)
        }
    }
}

/// Owned tree produced by deserializing any JSON value.
struct JsonTree(GenericNode);

impl<'de> Deserialize<'de> for JsonTree {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TreeVisitor).map(JsonTree)
    }
}

struct TreeVisitor;

impl<'de> Visitor<'de> for TreeVisitor {
    type Value = GenericNode;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<GenericNode, E> {
        Ok(GenericNode::scalar(Scalar::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<GenericNode, E> {
        Ok(GenericNode::scalar(Scalar::Integer(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<GenericNode, E> {
        // Beyond i64 the exact digits are kept as text.
        Ok(match i64::try_from(v) {
            Ok(i) => GenericNode::scalar(Scalar::Integer(i)),
            Err(_) => GenericNode::text(v.to_string()),
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<GenericNode, E> {
        Ok(GenericNode::scalar(Scalar::Float(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<GenericNode, E> {
        Ok(GenericNode::text(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<GenericNode, E> {
        Ok(GenericNode::text(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<GenericNode, E> {
        Ok(GenericNode::null())
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<GenericNode, E> {
        Ok(GenericNode::null())
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<GenericNode, D::Error>
    where
        D: Deserializer<'de>,
    {
        JsonTree::deserialize(deserializer).map(|tree| tree.0)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<GenericNode, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(JsonTree(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(GenericNode::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<GenericNode, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut object = ObjectNode::new();
        while let Some((key, JsonTree(value))) = map.next_entry::<String, JsonTree>()? {
            object.push(key, value);
        }
        Ok(GenericNode::Object(object))
    }
}

/// Borrowed view that serializes a tree as JSON.
struct JsonNode<'a>(&'a GenericNode);

impl Serialize for JsonNode<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            GenericNode::Scalar(scalar) => match scalar {
                Scalar::Null => serializer.serialize_unit(),
                Scalar::Bool(b) => serializer.serialize_bool(*b),
                Scalar::Integer(i) => serializer.serialize_i64(*i),
                Scalar::Float(f) => serializer.serialize_f64(*f),
                Scalar::Text(s) => serializer.serialize_str(s),
            },
            GenericNode::Array(items) => serializer.collect_seq(items.iter().map(JsonNode)),
            GenericNode::Object(object) => {
                let mut map = serializer.serialize_map(None)?;
                let mut written: Vec<&str> = Vec::with_capacity(object.len());
                for (key, value) in object.iter() {
                    if written.contains(&key) {
                        continue;
                    }
                    written.push(key);
                    if object.count(key) > 1 {
                        map.serialize_entry(key, &FoldedEntries { object, key })?;
                    } else {
                        map.serialize_entry(key, &JsonNode(value))?;
                    }
                }
                map.end()
            }
        }
    }
}

/// All entries of a repeated key, written as one array.
struct FoldedEntries<'a> {
    object: &'a ObjectNode,
    key: &'a str,
}

impl Serialize for FoldedEntries<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let items = self.object.get_all(self.key).flat_map(|node| match node {
            GenericNode::Array(inner) => inner.iter().collect::<Vec<_>>(),
            node => vec![node],
        });
        serializer.collect_seq(items.map(JsonNode))
    }
}
