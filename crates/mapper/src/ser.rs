//! Encode path: `serde::Serializer`s that build a [`GenericNode`] tree from an
//! entity, laying sequences out as their descriptors (or the mapper's layout
//! override) say.
//!
//! Explicit sequences always become one key bound to an array, including the
//! empty and one-element cases. Implicit sequences become one sibling entry
//! per item and vanish entirely when empty.

use serde::Serialize;
use serde::ser::{self, Impossible, SerializeSeq, SerializeStruct, SerializeTuple, SerializeTupleStruct};

use crate::descriptor::{ElementKind, FieldKind, TypeDescriptor, Wrapping};
use crate::error::EncodeError;
use crate::mapper::Mapper;
use crate::node::{GenericNode, ObjectNode, Scalar};
use crate::path::FieldPath;

type Result<T> = std::result::Result<T, EncodeError>;

/// Serializes one value of a known element kind.
pub(crate) struct NodeSerializer<'a> {
    mapper: &'a Mapper,
    kind: ElementKind,
    path: FieldPath,
}

impl<'a> NodeSerializer<'a> {
    pub(crate) fn new(mapper: &'a Mapper, kind: ElementKind, path: FieldPath) -> Self {
        Self { mapper, kind, path }
    }

    fn mismatch(&self, found: &'static str) -> EncodeError {
        EncodeError::KindMismatch {
            path: self.path.clone(),
            expected: self.kind.describe(),
            found,
        }
    }

    fn scalar(self, value: Scalar) -> Result<GenericNode> {
        match self.kind {
            ElementKind::Scalar => Ok(GenericNode::Scalar(value)),
            ElementKind::Entity(_) => Err(self.mismatch("scalar")),
        }
    }
}

macro_rules! serialize_scalar {
    ($method:ident, $ty:ty, $value:ident => $scalar:expr) => {
        fn $method(self, $value: $ty) -> Result<GenericNode> {
            self.scalar($scalar)
        }
    };
}

impl<'a> ser::Serializer for NodeSerializer<'a> {
    type Ok = GenericNode;
    type Error = EncodeError;
    type SerializeSeq = Impossible<GenericNode, EncodeError>;
    type SerializeTuple = Impossible<GenericNode, EncodeError>;
    type SerializeTupleStruct = Impossible<GenericNode, EncodeError>;
    type SerializeTupleVariant = Impossible<GenericNode, EncodeError>;
    type SerializeMap = Impossible<GenericNode, EncodeError>;
    type SerializeStruct = EntitySerializer<'a>;
    type SerializeStructVariant = Impossible<GenericNode, EncodeError>;

    serialize_scalar!(serialize_bool, bool, v => Scalar::Bool(v));
    serialize_scalar!(serialize_i8, i8, v => Scalar::Integer(v.into()));
    serialize_scalar!(serialize_i16, i16, v => Scalar::Integer(v.into()));
    serialize_scalar!(serialize_i32, i32, v => Scalar::Integer(v.into()));
    serialize_scalar!(serialize_i64, i64, v => Scalar::Integer(v));
    serialize_scalar!(serialize_i128, i128, v => match i64::try_from(v) {
        Ok(i) => Scalar::Integer(i),
        Err(_) => Scalar::Text(v.to_string()),
    });
    serialize_scalar!(serialize_u8, u8, v => Scalar::Integer(v.into()));
    serialize_scalar!(serialize_u16, u16, v => Scalar::Integer(v.into()));
    serialize_scalar!(serialize_u32, u32, v => Scalar::Integer(v.into()));
    serialize_scalar!(serialize_u64, u64, v => match i64::try_from(v) {
        Ok(i) => Scalar::Integer(i),
        Err(_) => Scalar::Text(v.to_string()),
    });
    serialize_scalar!(serialize_u128, u128, v => match i64::try_from(v) {
        Ok(i) => Scalar::Integer(i),
        Err(_) => Scalar::Text(v.to_string()),
    });
    serialize_scalar!(serialize_f32, f32, v => Scalar::Float(v.into()));
    serialize_scalar!(serialize_f64, f64, v => Scalar::Float(v));
    serialize_scalar!(serialize_char, char, v => Scalar::Text(v.to_string()));
    serialize_scalar!(serialize_str, &str, v => Scalar::Text(v.to_string()));
    serialize_scalar!(serialize_bytes, &[u8], v => Scalar::Text(String::from_utf8_lossy(v).into_owned()));

    fn serialize_none(self) -> Result<GenericNode> {
        Ok(GenericNode::null())
    }

    fn serialize_some<T>(self, value: &T) -> Result<GenericNode>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<GenericNode> {
        Ok(GenericNode::null())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<GenericNode> {
        Ok(GenericNode::null())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<GenericNode> {
        self.scalar(Scalar::Text(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<GenericNode>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<GenericNode>
    where
        T: ?Sized + Serialize,
    {
        Err(self.mismatch("enum variant with data"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.mismatch("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(self.mismatch("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.mismatch("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.mismatch("enum variant with data"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.mismatch("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        match self.kind {
            ElementKind::Entity(type_name) => EntitySerializer::new(self.mapper, type_name, self.path),
            ElementKind::Scalar => Err(self.mismatch("struct")),
        }
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.mismatch("enum variant with data"))
    }
}

enum FieldOutput {
    Single(GenericNode),
    Items(Vec<GenericNode>, Wrapping),
}

/// Collects declared fields and emits them in descriptor order.
pub(crate) struct EntitySerializer<'a> {
    mapper: &'a Mapper,
    descriptor: &'a TypeDescriptor,
    slots: Vec<Option<FieldOutput>>,
    path: FieldPath,
}

impl<'a> EntitySerializer<'a> {
    fn new(mapper: &'a Mapper, type_name: &'static str, path: FieldPath) -> Result<Self> {
        let descriptor = mapper
            .registry()
            .get(type_name)
            .ok_or_else(|| EncodeError::UnknownType(type_name.to_string()))?;
        let slots = descriptor.fields().iter().map(|_| None).collect();
        Ok(Self {
            mapper,
            descriptor,
            slots,
            path,
        })
    }
}

impl<'a> SerializeStruct for EntitySerializer<'a> {
    type Ok = GenericNode;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let descriptor = self.descriptor;
        let (index, field) =
            descriptor
                .find_field(key)
                .ok_or_else(|| EncodeError::UndeclaredField {
                    type_name: descriptor.type_name(),
                    field: key.to_string(),
                })?;
        let path = self.path.field(field.declared_name());

        let output = match field.kind() {
            FieldKind::Scalar => FieldOutput::Single(value.serialize(NodeSerializer::new(
                self.mapper,
                ElementKind::Scalar,
                path,
            ))?),
            FieldKind::Entity(type_name) => FieldOutput::Single(value.serialize(
                NodeSerializer::new(self.mapper, ElementKind::Entity(type_name), path),
            )?),
            FieldKind::Sequence { element, wrapping } => {
                let items = value.serialize(SequenceSerializer {
                    mapper: self.mapper,
                    element,
                    path,
                })?;
                match items {
                    Some(items) => FieldOutput::Items(items, self.mapper.layout(wrapping)),
                    None => return Ok(()),
                }
            }
        };
        self.slots[index] = Some(output);
        Ok(())
    }

    fn skip_field(&mut self, _key: &'static str) -> Result<()> {
        Ok(())
    }

    fn end(self) -> Result<GenericNode> {
        let mut object = ObjectNode::new();
        for (field, slot) in self.descriptor.fields().iter().zip(self.slots) {
            let Some(output) = slot else {
                continue;
            };
            let key = self.mapper.wire_key(field);
            match output {
                FieldOutput::Single(node) if node.is_null() => {}
                FieldOutput::Single(node) => object.push(key, node),
                FieldOutput::Items(items, Wrapping::Explicit) => {
                    object.push(key, GenericNode::Array(items))
                }
                FieldOutput::Items(items, Wrapping::Implicit) => {
                    for item in items {
                        object.push(key.clone(), item);
                    }
                }
            }
        }
        Ok(GenericNode::Object(object))
    }
}

/// Item nodes of a sequence field; `None` for an optional sequence that is
/// not set, so that it can be left off the wire.
type SequenceItems = Option<Vec<GenericNode>>;

/// Serializes the value of a sequence field into its item nodes.
struct SequenceSerializer<'a> {
    mapper: &'a Mapper,
    element: ElementKind,
    path: FieldPath,
}

impl<'a> SequenceSerializer<'a> {
    fn mismatch(&self, found: &'static str) -> EncodeError {
        EncodeError::KindMismatch {
            path: self.path.clone(),
            expected: "sequence",
            found,
        }
    }

    fn collector(self, len: Option<usize>) -> ItemCollector<'a> {
        ItemCollector {
            mapper: self.mapper,
            element: self.element,
            path: self.path,
            items: Vec::with_capacity(len.unwrap_or(0)),
        }
    }
}

macro_rules! reject_scalar {
    ($($method:ident($ty:ty);)*) => {
        $(
            fn $method(self, _value: $ty) -> Result<SequenceItems> {
                Err(self.mismatch("scalar"))
            }
        )*
    };
}

impl<'a> ser::Serializer for SequenceSerializer<'a> {
    type Ok = SequenceItems;
    type Error = EncodeError;
    type SerializeSeq = ItemCollector<'a>;
    type SerializeTuple = ItemCollector<'a>;
    type SerializeTupleStruct = ItemCollector<'a>;
    type SerializeTupleVariant = Impossible<SequenceItems, EncodeError>;
    type SerializeMap = Impossible<SequenceItems, EncodeError>;
    type SerializeStruct = Impossible<SequenceItems, EncodeError>;
    type SerializeStructVariant = Impossible<SequenceItems, EncodeError>;

    reject_scalar! {
        serialize_bool(bool);
        serialize_i8(i8);
        serialize_i16(i16);
        serialize_i32(i32);
        serialize_i64(i64);
        serialize_i128(i128);
        serialize_u8(u8);
        serialize_u16(u16);
        serialize_u32(u32);
        serialize_u64(u64);
        serialize_u128(u128);
        serialize_f32(f32);
        serialize_f64(f64);
        serialize_char(char);
        serialize_str(&str);
        serialize_bytes(&[u8]);
    }

    fn serialize_none(self) -> Result<SequenceItems> {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<SequenceItems>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<SequenceItems> {
        Ok(Some(Vec::new()))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<SequenceItems> {
        Ok(Some(Vec::new()))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<SequenceItems> {
        Err(self.mismatch("enum variant"))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<SequenceItems>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<SequenceItems>
    where
        T: ?Sized + Serialize,
    {
        Err(self.mismatch("enum variant with data"))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(self.collector(len))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        Ok(self.collector(Some(len)))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(self.collector(Some(len)))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.mismatch("enum variant with data"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.mismatch("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(self.mismatch("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.mismatch("enum variant with data"))
    }
}

/// Serializes sequence items one by one with the element kind.
pub(crate) struct ItemCollector<'a> {
    mapper: &'a Mapper,
    element: ElementKind,
    path: FieldPath,
    items: Vec<GenericNode>,
}

impl<'a> ItemCollector<'a> {
    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let path = self.path.index(self.items.len());
        let node = value.serialize(NodeSerializer::new(self.mapper, self.element, path))?;
        self.items.push(node);
        Ok(())
    }
}

impl<'a> SerializeSeq for ItemCollector<'a> {
    type Ok = SequenceItems;
    type Error = EncodeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<SequenceItems> {
        Ok(Some(self.items))
    }
}

impl<'a> SerializeTuple for ItemCollector<'a> {
    type Ok = SequenceItems;
    type Error = EncodeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<SequenceItems> {
        Ok(Some(self.items))
    }
}

impl<'a> SerializeTupleStruct for ItemCollector<'a> {
    type Ok = SequenceItems;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<SequenceItems> {
        Ok(Some(self.items))
    }
}
