//! The contract a domain type fulfils to be mapped.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::descriptor::TypeDescriptor;
use crate::registry::RegistryBuilder;

/// A typed entity the mapper can decode and encode.
///
/// `Serialize`/`Deserialize` provide the field plumbing; the descriptor
/// supplies everything the wire shape cannot: the kind of each field and,
/// for sequences, their cardinality and layout. Declared field names in the
/// descriptor must match the serde field names of the type.
///
/// Usually derived:
///
/// ```ignore
/// #[derive(Debug, Default, PartialEq, Serialize, Deserialize, Entity)]
/// struct ArtistList {
///     #[entity(implicit)]
///     artist: Vec<Artist>,
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned {
    /// Registry key of this type.
    const TYPE_NAME: &'static str;

    fn descriptor() -> TypeDescriptor;

    /// Registers this type and every entity type it references.
    fn register(builder: &mut RegistryBuilder) {
        builder.add(Self::descriptor());
    }
}
