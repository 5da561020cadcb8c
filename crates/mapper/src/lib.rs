//! # Rev Mapper
//!
//! Format-agnostic object mapping between typed entities and a generic tree
//! that JSON and XML adapters both produce and consume.
//!
//! ## Why a generic tree
//!
//! The two formats disagree on how a sequence looks on the wire:
//!
//! | Items | JSON | XML |
//! |-------|------|-----|
//! | many  | `{"artist": [{..}, {..}]}` | `<artist/><artist/>` |
//! | one   | `{"artist": [{..}]}` | `<artist/>` |
//! | none  | `{"artist": []}` | *(nothing)* |
//!
//! A one-element XML sequence is indistinguishable from a single nested
//! value, so the tree alone cannot say whether a key holds one value or a
//! list. The mapper resolves this from each type's [`TypeDescriptor`]: a
//! field declared as a sequence always binds to a sequence, whatever shape the
//! adapter produced.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use rev_mapper::{Entity, Mapper, Registry};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize, Entity)]
//! struct Artist {
//!     name: String,
//! }
//!
//! #[derive(Debug, Default, Serialize, Deserialize, Entity)]
//! struct ArtistList {
//!     #[entity(implicit)]
//!     artist: Vec<Artist>,
//! }
//!
//! let registry = Arc::new(Registry::builder().register::<ArtistList>().build()?);
//! let mapper = Mapper::new(registry);
//! let list: ArtistList = mapper.decode_rooted(&tree)?;
//! ```
//!
//! Wire bytes are handled elsewhere: implement [`Decoder`]/[`Encoder`] (the
//! `rev-serde` crate does, for JSON and XML) and use [`Mapper::read`] /
//! [`Mapper::write`].

// Lets the derive macro's `::rev_mapper::..` paths resolve inside this crate's
// own tests.
extern crate self as rev_mapper;

pub mod adapter;
mod de;
pub mod descriptor;
pub mod entity;
pub mod error;
pub mod mapper;
pub mod naming;
pub mod node;
pub mod options;
pub mod path;
pub mod registry;
mod ser;

pub use adapter::{Decoder, Encoder};
pub use descriptor::{ElementKind, FieldDescriptor, FieldKind, TypeDescriptor, Wrapping};
pub use entity::Entity;
pub use error::{DecodeError, EncodeError, RegistryError};
pub use mapper::Mapper;
pub use naming::{NamingConvention, NamingStrategy};
pub use node::{GenericNode, ObjectNode, Scalar};
pub use options::MapperOptions;
pub use path::FieldPath;
pub use registry::{Registry, RegistryBuilder};

#[cfg(feature = "derive")]
pub use rev_mapper_macro::Entity;
