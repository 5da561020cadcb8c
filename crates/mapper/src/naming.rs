//! Naming strategies: the transform from declared field identifiers to wire keys.
//!
//! A strategy is a pure function. It must be deterministic and total over any
//! identifier, but it does not have to be invertible: lookups during decoding
//! always go from declared name to wire key, never the other way around.

use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Maps a declared identifier (`artistList`, `artist_list`) to its wire key.
pub trait NamingStrategy: fmt::Debug + Send + Sync {
    fn to_wire_key(&self, declared_name: &str) -> String;
}

/// The built-in naming conventions.
///
/// | Convention | `artistList` |
/// |------------|--------------|
/// | `Identity` | `artistList` |
/// | `KebabCase` | `artist-list` |
/// | `SnakeCase` | `artist_list` |
/// | `UpperSnakeCase` | `ARTIST_LIST` |
/// | `LowerCamelCase` | `artistList` |
/// | `UpperCamelCase` | `ArtistList` |
/// | `LowerCase` | `artistlist` |
/// | `LowerDotCase` | `artist.list` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingConvention {
    Identity,
    #[default]
    KebabCase,
    SnakeCase,
    UpperSnakeCase,
    LowerCamelCase,
    UpperCamelCase,
    LowerCase,
    LowerDotCase,
}

impl NamingConvention {
    pub const ALL: [NamingConvention; 8] = [
        NamingConvention::Identity,
        NamingConvention::KebabCase,
        NamingConvention::SnakeCase,
        NamingConvention::UpperSnakeCase,
        NamingConvention::LowerCamelCase,
        NamingConvention::UpperCamelCase,
        NamingConvention::LowerCase,
        NamingConvention::LowerDotCase,
    ];

    /// The kebab-case name used in configuration and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            NamingConvention::Identity => "identity",
            NamingConvention::KebabCase => "kebab-case",
            NamingConvention::SnakeCase => "snake-case",
            NamingConvention::UpperSnakeCase => "upper-snake-case",
            NamingConvention::LowerCamelCase => "lower-camel-case",
            NamingConvention::UpperCamelCase => "upper-camel-case",
            NamingConvention::LowerCase => "lower-case",
            NamingConvention::LowerDotCase => "lower-dot-case",
        }
    }
}

impl NamingStrategy for NamingConvention {
    fn to_wire_key(&self, declared_name: &str) -> String {
        match self {
            NamingConvention::Identity => declared_name.to_string(),
            NamingConvention::KebabCase => declared_name.to_kebab_case(),
            NamingConvention::SnakeCase => declared_name.to_snake_case(),
            NamingConvention::UpperSnakeCase => declared_name.to_shouty_snake_case(),
            NamingConvention::LowerCamelCase => declared_name.to_lower_camel_case(),
            NamingConvention::UpperCamelCase => declared_name.to_upper_camel_case(),
            NamingConvention::LowerCase => declared_name
                .chars()
                .filter(|c| *c != '_')
                .flat_map(char::to_lowercase)
                .collect(),
            NamingConvention::LowerDotCase => declared_name.to_snake_case().replace('_', "."),
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamingConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NamingConvention::ALL
            .into_iter()
            .find(|convention| convention.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<_> = NamingConvention::ALL.iter().map(|c| c.as_str()).collect();
                format!(
                    "unknown naming convention '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                )
            })
    }
}
