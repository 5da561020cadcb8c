//! The immutable descriptor registry.
//!
//! A [`Registry`] is assembled once during startup through a
//! [`RegistryBuilder`], validated, and then only ever read. There is no
//! registration after [`RegistryBuilder::build`] and no lazy population on
//! first use; share it behind an `Arc` (the [`Mapper`](crate::Mapper) does).

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use crate::descriptor::TypeDescriptor;
use crate::entity::Entity;
use crate::error::RegistryError;

/// Collects descriptors before the registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    descriptors: HashMap<&'static str, TypeDescriptor>,
    conflicts: Vec<&'static str>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` together with the entity types it references.
    pub fn register<T: Entity>(mut self) -> Self {
        T::register(&mut self);
        self
    }

    /// Adds a single descriptor.
    ///
    /// Adding an identical descriptor twice is a no-op, so shared nested
    /// types may be registered from several parents. A different descriptor
    /// under an existing name is reported by [`build`](Self::build).
    pub fn add(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        match self.descriptors.entry(descriptor.type_name()) {
            Entry::Vacant(slot) => {
                slot.insert(descriptor);
            }
            Entry::Occupied(existing) => {
                if existing.get() != &descriptor {
                    self.conflicts.push(descriptor.type_name());
                }
            }
        }
        self
    }

    /// Whether a descriptor for `type_name` has been added.
    pub fn contains(&self, type_name: &str) -> bool {
        self.descriptors.contains_key(type_name)
    }

    /// Validates and freezes the registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        if let Some(name) = self.conflicts.first() {
            return Err(RegistryError::DuplicateType(name));
        }

        for descriptor in self.descriptors.values() {
            for field in descriptor.fields() {
                if let Some(target) = field.kind().entity_name() {
                    if !self.descriptors.contains_key(target) {
                        return Err(RegistryError::UnresolvedEntity {
                            owner: descriptor.type_name(),
                            field: field.declared_name(),
                            target,
                        });
                    }
                }
            }
        }

        debug!(types = self.descriptors.len(), "Type registry built");
        Ok(Registry {
            descriptors: self.descriptors,
        })
    }
}

/// Read-only lookup of type descriptors by type name.
#[derive(Debug, Default)]
pub struct Registry {
    descriptors: HashMap<&'static str, TypeDescriptor>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeDescriptor> {
        self.descriptors.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.descriptors.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
