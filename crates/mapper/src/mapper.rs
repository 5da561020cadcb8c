//! The mapper: the entry point tying registry, naming strategy and options
//! together for decode and encode calls.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapter::{Decoder, Encoder};
use crate::de::NodeDeserializer;
use crate::descriptor::{ElementKind, FieldDescriptor, TypeDescriptor, Wrapping};
use crate::entity::Entity;
use crate::error::{DecodeError, EncodeError};
use crate::naming::NamingStrategy;
use crate::node::{GenericNode, ObjectNode};
use crate::options::MapperOptions;
use crate::path::FieldPath;
use crate::registry::Registry;
use crate::ser::NodeSerializer;

/// Converts between typed entities and [`GenericNode`] trees.
///
/// A mapper only reads shared state (the frozen registry and a stateless
/// naming strategy), so one instance can serve any number of threads; cloning
/// it is cheap.
///
/// ```ignore
/// let registry = Arc::new(Registry::builder().register::<ArtistList>().build()?);
/// let mapper = Mapper::new(registry);
/// let list: ArtistList = mapper.decode_rooted(&tree)?;
/// ```
#[derive(Debug, Clone)]
pub struct Mapper {
    registry: Arc<Registry>,
    naming: Arc<dyn NamingStrategy>,
    options: MapperOptions,
}

impl Mapper {
    /// Creates a mapper with default options (kebab-case naming).
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_options(registry, MapperOptions::default())
    }

    pub fn with_options(registry: Arc<Registry>, options: MapperOptions) -> Self {
        Self {
            registry,
            naming: Arc::new(options.naming),
            options,
        }
    }

    /// Replaces the naming strategy with a custom implementation.
    pub fn with_naming_strategy(mut self, naming: Arc<dyn NamingStrategy>) -> Self {
        self.naming = naming;
        self
    }

    /// A copy of this mapper that lays out every sequence as `layout`.
    pub fn with_sequence_layout(&self, layout: Wrapping) -> Self {
        let mut mapper = self.clone();
        mapper.options.sequence_layout = Some(layout);
        mapper
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn naming(&self) -> &dyn NamingStrategy {
        self.naming.as_ref()
    }

    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    /// Wire key of `field`: its override if declared, otherwise the naming
    /// strategy applied to its declared name.
    pub fn wire_key(&self, field: &FieldDescriptor) -> String {
        match field.wire_key_override() {
            Some(key) => key.to_string(),
            None => self.naming.to_wire_key(field.declared_name()),
        }
    }

    /// Document root key of `descriptor`'s type.
    pub fn root_key(&self, descriptor: &TypeDescriptor) -> String {
        match descriptor.root_key_override() {
            Some(key) => key.to_string(),
            None => self.naming.to_wire_key(descriptor.type_name()),
        }
    }

    pub(crate) fn layout(&self, declared: Wrapping) -> Wrapping {
        self.options.sequence_layout.unwrap_or(declared)
    }

    /// Decodes an entity from its object node.
    pub fn decode<T: Entity>(&self, node: &GenericNode) -> Result<T, DecodeError> {
        debug!(type_name = T::TYPE_NAME, "Decoding entity");
        T::deserialize(NodeDeserializer::entity(self, node, T::TYPE_NAME))
    }

    /// Decodes an entity from a document of the form `{root_key: entity}`.
    pub fn decode_rooted<T: Entity>(&self, document: &GenericNode) -> Result<T, DecodeError> {
        let descriptor = self
            .registry
            .get(T::TYPE_NAME)
            .ok_or_else(|| DecodeError::UnknownType(T::TYPE_NAME.to_string()))?;
        let expected = self.root_key(descriptor);

        let unexpected = |found: String| DecodeError::UnexpectedRoot {
            expected: expected.clone(),
            found,
        };
        let object = document
            .as_object()
            .ok_or_else(|| unexpected(document.kind_name().to_string()))?;

        match object.iter().next() {
            Some((key, entity)) if object.len() == 1 && key == expected => self.decode(entity),
            _ => {
                let keys: Vec<_> = object.keys().map(|k| format!("`{}`", k)).collect();
                Err(unexpected(if keys.is_empty() {
                    "an empty object".to_string()
                } else {
                    keys.join(", ")
                }))
            }
        }
    }

    /// Encodes an entity into its object node.
    pub fn encode<T: Entity>(&self, entity: &T) -> Result<GenericNode, EncodeError> {
        debug!(type_name = T::TYPE_NAME, "Encoding entity");
        entity.serialize(NodeSerializer::new(
            self,
            ElementKind::Entity(T::TYPE_NAME),
            FieldPath::root(),
        ))
    }

    /// Encodes an entity as a document of the form `{root_key: entity}`.
    pub fn encode_rooted<T: Entity>(&self, entity: &T) -> Result<GenericNode, EncodeError> {
        let descriptor = self
            .registry
            .get(T::TYPE_NAME)
            .ok_or_else(|| EncodeError::UnknownType(T::TYPE_NAME.to_string()))?;
        let root = self.root_key(descriptor);
        let node = self.encode(entity)?;
        Ok(GenericNode::Object(ObjectNode::new().with(root, node)))
    }

    /// Parses `bytes` with `decoder` and decodes the rooted document.
    ///
    /// The decoder's preferred sequence layout, if any, overrides the one
    /// configured on this mapper for the duration of the call.
    pub fn read<T: Entity, D: Decoder>(&self, decoder: &D, bytes: &[u8]) -> Result<T, D::Error> {
        let document = decoder.decode_bytes(bytes)?;
        let entity = match decoder.sequence_layout() {
            Some(layout) => self.with_sequence_layout(layout).decode_rooted(&document)?,
            None => self.decode_rooted(&document)?,
        };
        Ok(entity)
    }

    /// Encodes the rooted document for `entity` and writes it with `encoder`.
    pub fn write<T: Entity, E: Encoder>(&self, encoder: &E, entity: &T) -> Result<Vec<u8>, E::Error> {
        let document = match encoder.sequence_layout() {
            Some(layout) => self.with_sequence_layout(layout).encode_rooted(entity)?,
            None => self.encode_rooted(entity)?,
        };
        encoder.encode_node(&document)
    }
}
