//! Decode path: a `serde::Deserializer` over a [`GenericNode`] tree, driven by
//! type descriptors.
//!
//! The deserializer never asks the tree how many values a key holds. Each
//! declared field is bound up front from its descriptor:
//!
//! - scalar and entity fields bind to the single entry under their wire key;
//! - sequence fields bind to a list of item nodes, normalized from whatever
//!   shape the adapter produced: an array node, one unwrapped node, or a run
//!   of repeated sibling entries.
//!
//! Only then is the target type's `Deserialize` impl allowed to look at the
//! values, so a one-element sequence and a many-element sequence reach it
//! through exactly the same `visit_seq` call.

use serde::de::{self, DeserializeSeed, IntoDeserializer, MapAccess, SeqAccess, Visitor};
use tracing::trace;

use crate::descriptor::{ElementKind, FieldDescriptor, FieldKind, TypeDescriptor, Wrapping};
use crate::error::DecodeError;
use crate::mapper::Mapper;
use crate::node::{GenericNode, ObjectNode, Scalar};
use crate::path::FieldPath;

type Result<T> = std::result::Result<T, DecodeError>;

/// Stands in for absent or empty entity nodes: every field takes its zero value.
static EMPTY_OBJECT: ObjectNode = ObjectNode::new();

enum Binding<'a> {
    /// A scalar or entity field, or one item of a sequence.
    Value {
        node: Option<&'a GenericNode>,
        kind: ElementKind,
    },
    /// A sequence field, already normalized to its items. `present` is
    /// false when the wire has no value for it at all, which is how an
    /// explicit `[]` stays distinct from an absent key.
    Sequence {
        items: Vec<&'a GenericNode>,
        element: ElementKind,
        present: bool,
    },
}

pub(crate) struct NodeDeserializer<'a> {
    mapper: &'a Mapper,
    binding: Binding<'a>,
    path: FieldPath,
}

impl<'a> NodeDeserializer<'a> {
    pub(crate) fn entity(mapper: &'a Mapper, node: &'a GenericNode, type_name: &'static str) -> Self {
        Self::value(mapper, Some(node), ElementKind::Entity(type_name), FieldPath::root())
    }

    fn value(
        mapper: &'a Mapper,
        node: Option<&'a GenericNode>,
        kind: ElementKind,
        path: FieldPath,
    ) -> Self {
        Self {
            mapper,
            binding: Binding::Value { node, kind },
            path,
        }
    }

    fn sequence(
        mapper: &'a Mapper,
        items: Vec<&'a GenericNode>,
        element: ElementKind,
        present: bool,
        path: FieldPath,
    ) -> Self {
        Self {
            mapper,
            binding: Binding::Sequence {
                items,
                element,
                present,
            },
            path,
        }
    }

    /// What is bound here, for error messages.
    fn found(&self) -> String {
        match &self.binding {
            Binding::Value { node: None, .. } => "nothing".to_string(),
            Binding::Value {
                node: Some(node), ..
            } => node.kind_name().to_string(),
            Binding::Sequence { .. } => "sequence field".to_string(),
        }
    }

    fn mismatch(&self, expected: &str) -> DecodeError {
        DecodeError::mismatch(&self.path, expected, self.found())
    }

    /// The Rust type asked for something the declared kind cannot provide.
    fn kind_conflict(&self, requested: &str) -> DecodeError {
        let declared = match &self.binding {
            Binding::Value { kind, .. } => kind.describe(),
            Binding::Sequence { .. } => "sequence",
        };
        DecodeError::mismatch(
            &self.path,
            requested,
            format_args!("field declared as {}", declared),
        )
    }

    /// The scalar bound to a scalar-kind value. `None` means absent or null,
    /// in which case callers produce the zero value of the requested type.
    fn scalar(&self, requested: &str) -> Result<Option<&'a Scalar>> {
        match &self.binding {
            Binding::Value {
                node,
                kind: ElementKind::Scalar,
            } => {
                let node: Option<&'a GenericNode> = *node;
                match node {
                    None => Ok(None),
                    Some(GenericNode::Scalar(Scalar::Null)) => Ok(None),
                    // An empty element, e.g. `<release-year/>`.
                    Some(GenericNode::Scalar(Scalar::Text(text))) if text.is_empty() => Ok(None),
                    Some(GenericNode::Scalar(scalar)) => Ok(Some(scalar)),
                    // Includes one-element arrays: a scalar field never binds
                    // to a sequence, whatever its length.
                    Some(_) => Err(self.mismatch(requested)),
                }
            }
            _ => Err(self.kind_conflict(requested)),
        }
    }

    /// The object bound to an entity-kind value, with its type name.
    fn object(&self) -> Result<(&'static str, &'a ObjectNode)> {
        match &self.binding {
            Binding::Value {
                node,
                kind: ElementKind::Entity(type_name),
            } => {
                let node: Option<&'a GenericNode> = *node;
                let object = match node {
                    None => &EMPTY_OBJECT,
                    Some(GenericNode::Object(object)) => object,
                    Some(GenericNode::Scalar(Scalar::Null)) => &EMPTY_OBJECT,
                    // An element with no content, e.g. `<artist/>`.
                    Some(GenericNode::Scalar(Scalar::Text(text))) if text.trim().is_empty() => {
                        &EMPTY_OBJECT
                    }
                    Some(_) => return Err(self.mismatch("entity object")),
                };
                Ok((*type_name, object))
            }
            _ => Err(self.kind_conflict("entity")),
        }
    }

    fn is_absent(&self) -> bool {
        match &self.binding {
            Binding::Value { node, .. } => node.is_none_or(GenericNode::is_null),
            Binding::Sequence { present, .. } => !present,
        }
    }

    fn text_mismatch(&self, requested: &str, text: &str) -> DecodeError {
        DecodeError::mismatch(&self.path, requested, format_args!("text \"{}\"", text))
    }
}

/// Binds one declared field of `object`, normalizing sequence cardinality.
fn bind_field<'a>(
    mapper: &'a Mapper,
    object: &'a ObjectNode,
    field: &FieldDescriptor,
    path: FieldPath,
) -> Result<NodeDeserializer<'a>> {
    let key = mapper.wire_key(field);
    let count = object.count(&key);

    if count == 0 && field.is_required() {
        return Err(DecodeError::MissingRequiredField(path));
    }

    let single_entry = |path: &FieldPath| {
        if count > 1 {
            Err(DecodeError::AmbiguousCardinality {
                path: path.clone(),
                key: key.clone(),
                count,
            })
        } else {
            Ok(object.get(&key))
        }
    };

    match field.kind() {
        FieldKind::Scalar => {
            let node = single_entry(&path)?;
            Ok(NodeDeserializer::value(mapper, node, ElementKind::Scalar, path))
        }
        FieldKind::Entity(type_name) => {
            let node = single_entry(&path)?;
            Ok(NodeDeserializer::value(
                mapper,
                node,
                ElementKind::Entity(type_name),
                path,
            ))
        }
        FieldKind::Sequence { element, wrapping } => {
            let (items, present) = match mapper.layout(wrapping) {
                Wrapping::Explicit => match single_entry(&path)? {
                    None => (Vec::new(), false),
                    Some(GenericNode::Array(items)) => (items.iter().collect(), true),
                    Some(node) if node.is_null() => (Vec::new(), false),
                    // The adapter unwrapped a one-element sequence.
                    Some(node) => (vec![node], true),
                },
                Wrapping::Implicit => {
                    let mut items = Vec::with_capacity(count);
                    for node in object.get_all(&key) {
                        match node {
                            GenericNode::Array(inner) => items.extend(inner.iter()),
                            node if node.is_null() => {}
                            node => items.push(node),
                        }
                    }
                    // An empty implicit sequence leaves nothing on the wire.
                    let present = !items.is_empty();
                    (items, present)
                }
            };
            trace!(path = %path, key = %key, items = items.len(), "Bound sequence field");
            Ok(NodeDeserializer::sequence(mapper, items, element, present, path))
        }
    }
}

/// Feeds declared fields, in descriptor order, to a struct visitor.
struct EntityAccess<'a> {
    mapper: &'a Mapper,
    object: &'a ObjectNode,
    fields: std::slice::Iter<'a, FieldDescriptor>,
    path: FieldPath,
    pending: Option<NodeDeserializer<'a>>,
}

impl<'a> EntityAccess<'a> {
    fn new(
        mapper: &'a Mapper,
        type_name: &'static str,
        object: &'a ObjectNode,
        path: FieldPath,
    ) -> Result<Self> {
        let descriptor = mapper
            .registry()
            .get(type_name)
            .ok_or_else(|| DecodeError::UnknownType(type_name.to_string()))?;
        check_unknown_keys(mapper, descriptor, object, &path)?;

        Ok(Self {
            mapper,
            object,
            fields: descriptor.fields().iter(),
            path,
            pending: None,
        })
    }
}

fn check_unknown_keys(
    mapper: &Mapper,
    descriptor: &TypeDescriptor,
    object: &ObjectNode,
    path: &FieldPath,
) -> Result<()> {
    if object.is_empty() {
        return Ok(());
    }
    let declared: Vec<String> = descriptor
        .fields()
        .iter()
        .map(|field| mapper.wire_key(field))
        .collect();

    for key in object.keys() {
        if declared.iter().any(|d| d == key) {
            continue;
        }
        if mapper.options().deny_unknown_keys {
            return Err(DecodeError::UnknownKey {
                path: path.clone(),
                key: key.to_string(),
            });
        }
        trace!(path = %path, key, type_name = descriptor.type_name(), "Ignoring unknown key");
    }
    Ok(())
}

impl<'de, 'a> MapAccess<'de> for EntityAccess<'a> {
    type Error = DecodeError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        let Some(field) = self.fields.next() else {
            return Ok(None);
        };
        let path = self.path.field(field.declared_name());
        self.pending = Some(bind_field(self.mapper, self.object, field, path)?);

        seed.deserialize(de::value::StrDeserializer::<DecodeError>::new(
            field.declared_name(),
        ))
        .map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let value = self
            .pending
            .take()
            .ok_or_else(|| DecodeError::Custom("value requested before its key".to_string()))?;
        let path = value.path.clone();
        seed.deserialize(value).map_err(|e| e.at(&path))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// Feeds normalized sequence items to a seq visitor.
struct ItemAccess<'a> {
    mapper: &'a Mapper,
    items: std::iter::Enumerate<std::vec::IntoIter<&'a GenericNode>>,
    element: ElementKind,
    path: FieldPath,
}

impl<'de, 'a> SeqAccess<'de> for ItemAccess<'a> {
    type Error = DecodeError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        let Some((index, node)) = self.items.next() else {
            return Ok(None);
        };
        let path = self.path.index(index);
        let item = NodeDeserializer::value(self.mapper, Some(node), self.element, path.clone());
        seed.deserialize(item).map(Some).map_err(|e| e.at(&path))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

macro_rules! deserialize_number {
    ($method:ident, $visit:ident, $ty:ty) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: Visitor<'de>,
        {
            match self.scalar(stringify!($ty))? {
                None => visitor.$visit(<$ty>::default()),
                Some(Scalar::Integer(i)) => visitor.visit_i64(*i),
                Some(Scalar::Float(f)) => visitor.visit_f64(*f),
                Some(Scalar::Text(text)) => match text.trim().parse::<$ty>() {
                    Ok(value) => visitor.$visit(value),
                    Err(_) => Err(self.text_mismatch(stringify!($ty), text)),
                },
                Some(other) => Err(DecodeError::mismatch(
                    &self.path,
                    stringify!($ty),
                    other.kind_name(),
                )),
            }
        }
    };
}

impl<'de, 'a> de::Deserializer<'de> for NodeDeserializer<'a> {
    type Error = DecodeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if matches!(self.binding, Binding::Sequence { .. }) {
            return self.deserialize_seq(visitor);
        }
        if matches!(
            self.binding,
            Binding::Value {
                kind: ElementKind::Entity(_),
                ..
            }
        ) {
            return self.deserialize_map(visitor);
        }
        match self.scalar("scalar")? {
            None | Some(Scalar::Null) => visitor.visit_unit(),
            Some(Scalar::Bool(b)) => visitor.visit_bool(*b),
            Some(Scalar::Integer(i)) => visitor.visit_i64(*i),
            Some(Scalar::Float(f)) => visitor.visit_f64(*f),
            Some(Scalar::Text(text)) => visitor.visit_str(text),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.scalar("bool")? {
            None => visitor.visit_bool(false),
            Some(Scalar::Bool(b)) => visitor.visit_bool(*b),
            Some(Scalar::Text(text)) => match text.trim() {
                "true" => visitor.visit_bool(true),
                "false" => visitor.visit_bool(false),
                _ => Err(self.text_mismatch("bool", text)),
            },
            Some(other) => Err(DecodeError::mismatch(&self.path, "bool", other.kind_name())),
        }
    }

    deserialize_number!(deserialize_i8, visit_i8, i8);
    deserialize_number!(deserialize_i16, visit_i16, i16);
    deserialize_number!(deserialize_i32, visit_i32, i32);
    deserialize_number!(deserialize_i64, visit_i64, i64);
    deserialize_number!(deserialize_i128, visit_i128, i128);
    deserialize_number!(deserialize_u8, visit_u8, u8);
    deserialize_number!(deserialize_u16, visit_u16, u16);
    deserialize_number!(deserialize_u32, visit_u32, u32);
    deserialize_number!(deserialize_u64, visit_u64, u64);
    deserialize_number!(deserialize_u128, visit_u128, u128);
    deserialize_number!(deserialize_f32, visit_f32, f32);
    deserialize_number!(deserialize_f64, visit_f64, f64);

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.scalar("char")? {
            None => visitor.visit_char('\0'),
            Some(Scalar::Text(text)) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(self.text_mismatch("char", text)),
                }
            }
            Some(other) => Err(DecodeError::mismatch(&self.path, "char", other.kind_name())),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.scalar("string")? {
            None => visitor.visit_str(""),
            Some(Scalar::Text(text)) => visitor.visit_str(text),
            // Numbers and booleans coerce to their textual form.
            Some(other) => visitor.visit_string(other.to_string()),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.scalar("bytes")? {
            None => visitor.visit_bytes(&[]),
            Some(Scalar::Text(text)) => visitor.visit_bytes(text.as_bytes()),
            Some(other) => Err(DecodeError::mismatch(&self.path, "bytes", other.kind_name())),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.is_absent() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.binding {
            Binding::Sequence { items, element, .. } => visitor.visit_seq(ItemAccess {
                mapper: self.mapper,
                items: items.into_iter().enumerate(),
                element,
                path: self.path,
            }),
            Binding::Value { .. } => Err(self.kind_conflict("sequence")),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let (type_name, object) = self.object()?;
        visitor.visit_map(EntityAccess::new(self.mapper, type_name, object, self.path)?)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.scalar("enum variant")? {
            Some(Scalar::Text(text)) => visitor.visit_enum(text.as_str().into_deserializer()),
            _ => Err(self.mismatch("enum variant name")),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}
