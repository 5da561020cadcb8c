//! Derive macro for `rev_mapper::Entity`.
//!
//! ```ignore
//! #[derive(Serialize, Deserialize, Entity)]
//! #[entity(root = "artist-list")]
//! struct ArtistList {
//!     #[entity(rename = "record-label")]
//!     label: Option<String>,
//!     #[entity(implicit)]
//!     artist: Vec<Artist>,
//! }
//! ```
//!
//! Field kinds are inferred from the field type:
//!
//! - `Vec<T>` and `Option<Vec<T>>` are sequences of `T` (explicitly wrapped
//!   unless marked `implicit`);
//! - `Option<T>` has the kind of `T`;
//! - primitives and `String` are scalars;
//! - any other type is a nested entity and must itself implement `Entity`.
//!
//! Use `#[entity(scalar)]` for custom types that serialize as a primitive,
//! such as unit-only enums or newtypes.
//!
//! Container attributes: `name = ".."` (registry key, defaults to the struct
//! name), `root = ".."` (document root key override).
//!
//! Field attributes: `rename = ".."`, `required`, `implicit`, `explicit`,
//! `scalar`, `skip`. A `skip` field is left out of the descriptor and must
//! also carry `#[serde(skip)]` (the derive rejects it otherwise), since the
//! mapper refuses fields its descriptor does not declare.

use proc_macro::TokenStream;

mod entity;

#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive_entity(input.into()).into()
}
