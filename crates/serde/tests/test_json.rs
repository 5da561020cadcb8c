mod common;

use common::{Album, Artist, ArtistList, artist, expected_artist_list, fixture, mapper};
use rev_mapper::{DecodeError, GenericNode};
use rev_serde::{
    Result, SerdeError, from_json_str, parse_json_str, to_json_string, to_json_string_pretty,
};

#[test]
fn test_json_parse_single_artist() -> Result<()> {
    let actual: Artist = from_json_str(&mapper(), &fixture("artist.json"))?;
    assert_eq!(actual, artist("Fleetwood Mac"));
    Ok(())
}

#[test]
fn test_json_parse_artist_list() -> Result<()> {
    let actual: ArtistList = from_json_str(&mapper(), &fixture("artist_list.json"))?;
    assert_eq!(actual, expected_artist_list());
    Ok(())
}

#[test]
fn test_json_single_object_reads_as_one_element_list() -> Result<()> {
    let mapper = mapper();
    let unwrapped: ArtistList = from_json_str(&mapper, &fixture("artist_list_single.json"))?;
    let wrapped: ArtistList = from_json_str(
        &mapper,
        r#"{"artist-list": {"artist": [{"name": "Fleetwood Mac"}]}}"#,
    )?;

    assert_eq!(unwrapped, wrapped);
    assert_eq!(unwrapped.artists, vec![artist("Fleetwood Mac")]);
    Ok(())
}

#[test]
fn test_json_writes_explicit_arrays() -> Result<()> {
    let mapper = mapper();
    let single = ArtistList {
        artists: vec![artist("Fleetwood Mac")],
    };

    assert_eq!(
        to_json_string(&mapper, &single)?,
        r#"{"artist-list":{"artist":[{"name":"Fleetwood Mac"}]}}"#
    );
    assert_eq!(
        to_json_string(&mapper, &ArtistList::default())?,
        r#"{"artist-list":{"artist":[]}}"#
    );
    Ok(())
}

#[test]
fn test_json_empty_optional_sequence_is_not_unset() -> Result<()> {
    let mapper = mapper();
    let tagged = Album {
        title: "Rumours".to_string(),
        tag: Some(vec![]),
        artist: vec![],
    };
    let json = to_json_string(&mapper, &tagged)?;
    assert_eq!(json, r#"{"album":{"title":"Rumours","tag":[],"artist":[]}}"#);
    assert_eq!(from_json_str::<Album>(&mapper, &json)?, tagged);

    let untagged = Album {
        tag: None,
        ..tagged
    };
    let json = to_json_string(&mapper, &untagged)?;
    assert_eq!(json, r#"{"album":{"title":"Rumours","artist":[]}}"#);
    assert_eq!(from_json_str::<Album>(&mapper, &json)?, untagged);

    let null: Album = from_json_str(&mapper, r#"{"album":{"title":"Rumours","tag":null}}"#)?;
    assert_eq!(null.tag, None);
    Ok(())
}

#[test]
fn test_json_round_trip() -> Result<()> {
    let mapper = mapper();
    for list in [expected_artist_list(), ArtistList::default()] {
        let json = to_json_string_pretty(&mapper, &list)?;
        let back: ArtistList = from_json_str(&mapper, &json)?;
        assert_eq!(back, list);
    }
    Ok(())
}

#[test]
fn test_json_round_trip_preserves_tree() -> Result<()> {
    let text = fixture("artist_list.json");
    let tree = parse_json_str(&text)?;
    let written = rev_serde::write_json_string(&tree)?;
    assert_eq!(parse_json_str(&written)?, tree);
    Ok(())
}

#[test]
fn test_json_wrong_root_is_reported() {
    let err = from_json_str::<ArtistList>(&mapper(), &fixture("artist.json")).unwrap_err();
    match err {
        SerdeError::Decode(DecodeError::UnexpectedRoot { expected, found }) => {
            assert_eq!(expected, "artist-list");
            assert_eq!(found, "`artist`");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_json_scalar_where_entity_expected() {
    let err = from_json_str::<ArtistList>(&mapper(), r#"{"artist-list": {"artist": ["x"]}}"#)
        .unwrap_err();
    assert!(matches!(
        err,
        SerdeError::Decode(DecodeError::TypeMismatch { ref path, .. })
            if path.to_string() == "artists[0]"
    ));
}

#[test]
fn test_json_syntax_error() {
    let err = from_json_str::<ArtistList>(&mapper(), "{\"artist-list\": ").unwrap_err();
    assert!(matches!(err, SerdeError::Json(_)));
}

#[test]
fn test_json_null_sequence_is_empty() -> Result<()> {
    let list: ArtistList = from_json_str(&mapper(), r#"{"artist-list": {"artist": null}}"#)?;
    assert!(list.artists.is_empty());
    assert_eq!(
        parse_json_str("null")?,
        GenericNode::null()
    );
    Ok(())
}
