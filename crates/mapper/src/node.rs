//! The generic tree that sits between wire bytes and typed entities.
//!
//! Both format adapters translate into this model: JSON maps naturally onto
//! it, while XML produces objects whose keys may repeat (one entry per
//! sibling element). The tree itself carries no cardinality information;
//! whether a key denotes one value or a sequence is decided by the
//! [`TypeDescriptor`](crate::TypeDescriptor) during mapping.

use std::fmt;

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Short name of the scalar variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Text(_) => "text",
        }
    }

    /// Textual form of the scalar, `None` for null.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::Integer(i) => Some(i.to_string()),
            Scalar::Float(f) => Some(f.to_string()),
            Scalar::Text(s) => Some(s.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// An ordered mapping from wire key to node.
///
/// Entries keep insertion order and a key may occur more than once, which is
/// how repeated sibling elements are represented.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectNode {
    entries: Vec<(String, GenericNode)>,
}

impl ObjectNode {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry, keeping any existing entries with the same key.
    pub fn push(&mut self, key: impl Into<String>, value: GenericNode) {
        self.entries.push((key.into(), value));
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, key: impl Into<String>, value: GenericNode) -> Self {
        self.push(key, value);
        self
    }

    /// First entry stored under `key`.
    pub fn get(&self, key: &str) -> Option<&GenericNode> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Every entry stored under `key`, in insertion order.
    pub fn get_all<'a, 'k>(&'a self, key: &'k str) -> impl Iterator<Item = &'a GenericNode> {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Number of entries stored under `key`.
    pub fn count(&self, key: &str) -> usize {
        self.entries.iter().filter(|(k, _)| k == key).count()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GenericNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(String, GenericNode)> {
        self.entries
    }
}

impl<K: Into<String>> FromIterator<(K, GenericNode)> for ObjectNode {
    fn from_iter<I: IntoIterator<Item = (K, GenericNode)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A node of the generic tree.
#[derive(Debug, Clone, PartialEq)]
pub enum GenericNode {
    Scalar(Scalar),
    Array(Vec<GenericNode>),
    Object(ObjectNode),
}

impl GenericNode {
    pub fn null() -> Self {
        GenericNode::Scalar(Scalar::Null)
    }

    pub fn text(value: impl Into<String>) -> Self {
        GenericNode::Scalar(Scalar::Text(value.into()))
    }

    pub fn scalar(value: Scalar) -> Self {
        GenericNode::Scalar(value)
    }

    pub fn array(items: impl IntoIterator<Item = GenericNode>) -> Self {
        GenericNode::Array(items.into_iter().collect())
    }

    pub fn object(object: ObjectNode) -> Self {
        GenericNode::Object(object)
    }

    /// Looks up `key` when this node is an object.
    pub fn get(&self, key: &str) -> Option<&GenericNode> {
        match self {
            GenericNode::Object(object) => object.get(key),
            _ => None,
        }
    }

    /// Items of an array node; empty for any other node.
    pub fn items(&self) -> &[GenericNode] {
        match self {
            GenericNode::Array(items) => items,
            _ => &[],
        }
    }

    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            GenericNode::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            GenericNode::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, GenericNode::Scalar(Scalar::Null))
    }

    /// Short name of the node shape, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            GenericNode::Scalar(scalar) => scalar.kind_name(),
            GenericNode::Array(_) => "array",
            GenericNode::Object(_) => "object",
        }
    }
}

impl From<Scalar> for GenericNode {
    fn from(value: Scalar) -> Self {
        GenericNode::Scalar(value)
    }
}

impl From<ObjectNode> for GenericNode {
    fn from(value: ObjectNode) -> Self {
        GenericNode::Object(value)
    }
}

impl From<&str> for GenericNode {
    fn from(value: &str) -> Self {
        GenericNode::text(value)
    }
}

impl From<String> for GenericNode {
    fn from(value: String) -> Self {
        GenericNode::text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(name: &str) -> GenericNode {
        ObjectNode::new().with("name", name.into()).into()
    }

    #[test]
    fn test_object_keeps_repeated_keys_in_order() {
        let object = ObjectNode::new()
            .with("artist", artist("Fleetwood Mac"))
            .with("label", "Reprise".into())
            .with("artist", artist("Fleetwood"));

        assert_eq!(object.len(), 3);
        assert_eq!(object.count("artist"), 2);
        assert_eq!(object.get("artist"), Some(&artist("Fleetwood Mac")));

        let all: Vec<_> = object.get_all("artist").collect();
        assert_eq!(all, vec![&artist("Fleetwood Mac"), &artist("Fleetwood")]);
        assert_eq!(object.keys().collect::<Vec<_>>(), vec!["artist", "label", "artist"]);
    }

    #[test]
    fn test_lookup_on_non_object_is_none() {
        assert!(GenericNode::text("x").get("name").is_none());
        assert!(GenericNode::array(vec![artist("a")]).get("name").is_none());
    }

    #[test]
    fn test_items_only_for_arrays() {
        let array = GenericNode::array(vec![artist("a"), artist("b")]);
        assert_eq!(array.items().len(), 2);
        assert!(artist("a").items().is_empty());
    }

    #[test]
    fn test_structural_equality() {
        let a = GenericNode::array(vec![artist("a"), GenericNode::null()]);
        let b = GenericNode::array(vec![artist("a"), GenericNode::null()]);
        assert_eq!(a, b);
        assert_ne!(a, GenericNode::array(vec![artist("a")]));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(GenericNode::null().kind_name(), "null");
        assert_eq!(GenericNode::scalar(Scalar::Integer(3)).kind_name(), "integer");
        assert_eq!(GenericNode::array(vec![]).kind_name(), "array");
        assert_eq!(artist("a").kind_name(), "object");
    }

    #[test]
    fn test_scalar_text_forms() {
        assert_eq!(Scalar::Bool(true).to_text().as_deref(), Some("true"));
        assert_eq!(Scalar::Integer(-4).to_text().as_deref(), Some("-4"));
        assert_eq!(Scalar::Null.to_text(), None);
        assert_eq!(Scalar::Text("x".into()).to_string(), "x");
    }
}
