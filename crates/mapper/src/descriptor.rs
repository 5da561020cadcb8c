//! Per-entity metadata: which fields exist, what kind of value each holds,
//! and how sequences are laid out in the tree.
//!
//! Descriptors are normally produced by `#[derive(Entity)]`, but they are
//! plain data and can be written by hand:
//!
//! ```
//! use rev_mapper::{ElementKind, FieldDescriptor, TypeDescriptor, Wrapping};
//!
//! let artist_list = TypeDescriptor::new("ArtistList").field(FieldDescriptor::sequence(
//!     "artist",
//!     ElementKind::Entity("Artist"),
//!     Wrapping::Implicit,
//! ));
//! assert_eq!(artist_list.fields().len(), 1);
//! ```

use serde::Deserialize;

/// Kind of a single value: a primitive, or a nested entity named by its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Scalar,
    Entity(&'static str),
}

impl ElementKind {
    pub fn entity_name(&self) -> Option<&'static str> {
        match self {
            ElementKind::Scalar => None,
            ElementKind::Entity(name) => Some(name),
        }
    }

    pub(crate) fn describe(&self) -> &'static str {
        match self {
            ElementKind::Scalar => "scalar",
            ElementKind::Entity(_) => "entity",
        }
    }
}

/// How a sequence is laid out under its parent object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Wrapping {
    /// One key bound to an array node (`{"artist": [..]}`).
    #[default]
    Explicit,
    /// Repeated sibling entries sharing the key (`<artist/><artist/>`).
    Implicit,
}

/// Declared kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Scalar,
    Entity(&'static str),
    Sequence {
        element: ElementKind,
        wrapping: Wrapping,
    },
}

impl FieldKind {
    /// The entity type this field refers to, directly or as sequence element.
    pub fn entity_name(&self) -> Option<&'static str> {
        match self {
            FieldKind::Scalar => None,
            FieldKind::Entity(name) => Some(name),
            FieldKind::Sequence { element, .. } => element.entity_name(),
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, FieldKind::Sequence { .. })
    }
}

/// Metadata for one declared field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    declared_name: &'static str,
    wire_key_override: Option<&'static str>,
    kind: FieldKind,
    required: bool,
}

impl FieldDescriptor {
    pub fn new(declared_name: &'static str, kind: FieldKind) -> Self {
        Self {
            declared_name,
            wire_key_override: None,
            kind,
            required: false,
        }
    }

    pub fn scalar(declared_name: &'static str) -> Self {
        Self::new(declared_name, FieldKind::Scalar)
    }

    pub fn entity(declared_name: &'static str, type_name: &'static str) -> Self {
        Self::new(declared_name, FieldKind::Entity(type_name))
    }

    pub fn sequence(declared_name: &'static str, element: ElementKind, wrapping: Wrapping) -> Self {
        Self::new(declared_name, FieldKind::Sequence { element, wrapping })
    }

    /// Uses `wire_key` verbatim instead of applying the naming strategy.
    pub fn rename(mut self, wire_key: &'static str) -> Self {
        self.wire_key_override = Some(wire_key);
        self
    }

    /// Marks the field as mandatory: decoding fails when its key is absent.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn declared_name(&self) -> &'static str {
        self.declared_name
    }

    pub fn wire_key_override(&self) -> Option<&'static str> {
        self.wire_key_override
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Metadata for one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    type_name: &'static str,
    root_key: Option<&'static str>,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            root_key: None,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Uses `root_key` verbatim as the document root key for this type.
    pub fn root_key(mut self, root_key: &'static str) -> Self {
        self.root_key = Some(root_key);
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn root_key_override(&self) -> Option<&'static str> {
        self.root_key
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Position and descriptor of the field declared as `declared_name`.
    pub fn find_field(&self, declared_name: &str) -> Option<(usize, &FieldDescriptor)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.declared_name == declared_name)
    }

    /// Entity types referenced by this descriptor's fields.
    pub fn referenced_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter_map(|field| field.kind.entity_name())
    }
}
