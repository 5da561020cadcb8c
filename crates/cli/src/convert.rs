//! Conversion between formats through the typed model.

use std::sync::Arc;

use rev_mapper::{Mapper, MapperOptions, NamingConvention, Registry, RegistryError};
use rev_serde::Format;
use tracing::{debug, info};

use crate::model::ArtistList;

/// Builds the mapper for the artist model.
pub fn artist_mapper(naming: NamingConvention) -> Result<Mapper, RegistryError> {
    let registry = Registry::builder().register::<ArtistList>().build()?;
    debug!(types = ?registry.type_names(), naming = %naming, "Registry ready");
    Ok(Mapper::with_options(
        Arc::new(registry),
        MapperOptions::default().with_naming(naming),
    ))
}

/// Decodes `input` as `from` and re-encodes it as `to`.
pub fn convert(
    mapper: &Mapper,
    input: &[u8],
    from: Format,
    to: Format,
    pretty: bool,
) -> rev_serde::Result<Vec<u8>> {
    let list: ArtistList = from.decode_as(mapper, input)?;
    info!(from = %from, to = %to, artists = list.artists.len(), "Converting artist list");
    to.encode_as(mapper, &list, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> Mapper {
        artist_mapper(NamingConvention::KebabCase).unwrap()
    }

    #[test]
    fn test_xml_to_json() {
        let xml = b"<artist-list><artist><name>Fleetwood Mac</name></artist></artist-list>";
        let json = convert(&mapper(), xml, Format::Xml, Format::Json, false).unwrap();
        assert_eq!(
            String::from_utf8(json).unwrap(),
            r#"{"artist-list":{"artist":[{"name":"Fleetwood Mac"}]}}"#
        );
    }

    #[test]
    fn test_json_to_xml() {
        let json = br#"{"artist-list":{"artist":[{"name":"a"},{"name":"b"}]}}"#;
        let xml = convert(&mapper(), json, Format::Json, Format::Xml, false).unwrap();
        assert_eq!(
            String::from_utf8(xml).unwrap(),
            r#"<?xml version="1.0" encoding="UTF-8"?><artist-list><artist><name>a</name></artist><artist><name>b</name></artist></artist-list>"#
        );
    }

    #[test]
    fn test_naming_changes_root_key() {
        let mapper = artist_mapper(NamingConvention::SnakeCase).unwrap();
        let json = br#"{"artist_list":{"artist":[]}}"#;
        let xml = convert(&mapper, json, Format::Json, Format::Xml, false).unwrap();
        assert!(String::from_utf8(xml).unwrap().ends_with("<artist_list/>"));
    }

    #[test]
    fn test_decode_failure_is_reported() {
        let result = convert(&mapper(), b"<artists/>", Format::Xml, Format::Json, false);
        assert!(matches!(result, Err(rev_serde::SerdeError::Decode(_))));
    }
}
