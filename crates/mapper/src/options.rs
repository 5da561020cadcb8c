//! Mapper configuration.

use serde::Deserialize;

use crate::descriptor::Wrapping;
use crate::naming::NamingConvention;

/// Options that shape how a [`Mapper`](crate::Mapper) reads and writes trees.
///
/// Deserializable so it can live in a configuration document:
///
/// ```json
/// { "naming": "snake-case", "sequence-layout": "implicit", "deny-unknown-keys": true }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MapperOptions {
    /// Naming convention applied to declared field and type names.
    pub naming: NamingConvention,

    /// Forces every sequence field into one layout, regardless of what its
    /// descriptor declares. Format adapters set this: JSON cannot repeat
    /// keys, XML has no array node.
    pub sequence_layout: Option<Wrapping>,

    /// Fail on wire keys that no declared field maps to.
    pub deny_unknown_keys: bool,
}

impl MapperOptions {
    pub fn with_naming(mut self, naming: NamingConvention) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_sequence_layout(mut self, layout: Wrapping) -> Self {
        self.sequence_layout = Some(layout);
        self
    }

    pub fn deny_unknown_keys(mut self, deny: bool) -> Self {
        self.deny_unknown_keys = deny;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = MapperOptions::default();
        assert_eq!(options.naming, NamingConvention::KebabCase);
        assert_eq!(options.sequence_layout, None);
        assert!(!options.deny_unknown_keys);
    }

    #[test]
    fn test_deserialize_partial_document() {
        let options: MapperOptions =
            serde_json::from_str(r#"{"sequence-layout": "implicit"}"#).unwrap();
        assert_eq!(options.naming, NamingConvention::KebabCase);
        assert_eq!(options.sequence_layout, Some(Wrapping::Implicit));
    }

    #[test]
    fn test_deserialize_full_document() {
        let options: MapperOptions = serde_json::from_str(
            r#"{"naming": "identity", "sequence-layout": "explicit", "deny-unknown-keys": true}"#,
        )
        .unwrap();
        assert_eq!(
            options,
            MapperOptions::default()
                .with_naming(NamingConvention::Identity)
                .with_sequence_layout(Wrapping::Explicit)
                .deny_unknown_keys(true)
        );
    }
}
