//! Runtime format selection.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use rev_mapper::{Entity, Mapper};

use crate::error::{Result, SerdeError};
use crate::json::JsonFormat;

/// A supported wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Xml,
}

impl Format {
    pub const ALL: [Format; 2] = [Format::Json, Format::Xml];

    /// Format for a file extension, compared case-insensitively.
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }

    /// Format for a path, from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
        }
    }

    /// Reads a rooted document in this format into an entity.
    pub fn decode_as<T: Entity>(&self, mapper: &Mapper, bytes: &[u8]) -> Result<T> {
        match self {
            Format::Json => mapper.read(&JsonFormat::new(), bytes),
            #[cfg(feature = "xml")]
            Format::Xml => mapper.read(&crate::xml::XmlFormat::new(), bytes),
            #[cfg(not(feature = "xml"))]
            Format::Xml => Err(xml_disabled()),
        }
    }

    /// Writes an entity as a rooted document in this format.
    pub fn encode_as<T: Entity>(&self, mapper: &Mapper, entity: &T, pretty: bool) -> Result<Vec<u8>> {
        match self {
            Format::Json if pretty => mapper.write(&JsonFormat::pretty(), entity),
            Format::Json => mapper.write(&JsonFormat::new(), entity),
            #[cfg(feature = "xml")]
            Format::Xml if pretty => mapper.write(&crate::xml::XmlFormat::pretty(), entity),
            #[cfg(feature = "xml")]
            Format::Xml => mapper.write(&crate::xml::XmlFormat::new(), entity),
            #[cfg(not(feature = "xml"))]
            Format::Xml => Err(xml_disabled()),
        }
    }
}

#[cfg(not(feature = "xml"))]
fn xml_disabled() -> SerdeError {
    SerdeError::Custom("XML support requires the `xml` feature".to_string())
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = SerdeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s).ok_or_else(|| {
            SerdeError::Custom(format!("Unknown format `{}` (expected json or xml)", s))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Format::from_extension("json"), Some(Format::Json));
        assert_eq!(Format::from_extension("XML"), Some(Format::Xml));
        assert_eq!(Format::from_extension("yaml"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Format::from_path(Path::new("tests/data/artist.xml")), Some(Format::Xml));
        assert_eq!(Format::from_path(Path::new("artist_list.JSON")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert!("toml".parse::<Format>().is_err());
        assert_eq!(Format::Xml.to_string(), "xml");
    }
}
