use std::sync::Arc;

use rev_mapper::{
    DecodeError, Entity, FieldPath, GenericNode, Mapper, MapperOptions, ObjectNode, Registry,
    Scalar, Wrapping,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Entity)]
struct Artist {
    name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Entity)]
struct ArtistList {
    #[entity(rename = "artist", implicit)]
    artists: Vec<Artist>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Entity)]
struct Album {
    #[entity(required)]
    title: String,
    release_year: u32,
    explicit_lyrics: bool,
    producer: Option<String>,
    headliner: Option<Artist>,
    track: Vec<String>,
}

fn mapper() -> Mapper {
    let registry = Registry::builder()
        .register::<ArtistList>()
        .register::<Album>()
        .build()
        .unwrap();
    Mapper::new(Arc::new(registry))
}

fn artist(name: &str) -> GenericNode {
    ObjectNode::new().with("name", name.into()).into()
}

fn fleetwood_mac() -> ArtistList {
    ArtistList {
        artists: vec![Artist {
            name: "Fleetwood Mac".to_string(),
        }],
    }
}

#[test]
fn test_single_node_and_one_element_array_decode_identically() -> Result<(), DecodeError> {
    let mapper = mapper();

    let unwrapped: GenericNode = ObjectNode::new()
        .with("artist-list", ObjectNode::new().with("artist", artist("Fleetwood Mac")).into())
        .into();
    let wrapped: GenericNode = ObjectNode::new()
        .with(
            "artist-list",
            ObjectNode::new()
                .with("artist", GenericNode::array(vec![artist("Fleetwood Mac")]))
                .into(),
        )
        .into();

    let from_unwrapped: ArtistList = mapper.decode_rooted(&unwrapped)?;
    let from_wrapped: ArtistList = mapper.decode_rooted(&wrapped)?;

    assert_eq!(from_unwrapped, fleetwood_mac());
    assert_eq!(from_wrapped, fleetwood_mac());
    Ok(())
}

#[test]
fn test_cardinality_invariance_under_both_layouts() -> Result<(), DecodeError> {
    let single: GenericNode = ObjectNode::new().with("artist", artist("Fleetwood Mac")).into();
    let array: GenericNode = ObjectNode::new()
        .with("artist", GenericNode::array(vec![artist("Fleetwood Mac")]))
        .into();

    for layout in [Wrapping::Explicit, Wrapping::Implicit] {
        let mapper = mapper().with_sequence_layout(layout);
        assert_eq!(mapper.decode::<ArtistList>(&single)?, fleetwood_mac());
        assert_eq!(mapper.decode::<ArtistList>(&array)?, fleetwood_mac());
    }
    Ok(())
}

#[test]
fn test_repeated_siblings_keep_document_order() -> Result<(), DecodeError> {
    let names = ["Fleetwood Mac", "Fleetwood", "Mick Fleetwood"];
    let node: GenericNode = names
        .iter()
        .map(|name| ("artist", artist(name)))
        .collect::<ObjectNode>()
        .into();

    let list: ArtistList = mapper().decode(&node)?;
    let decoded: Vec<_> = list.artists.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(decoded, names);
    Ok(())
}

#[test]
fn test_array_siblings_are_spread_for_implicit_sequences() -> Result<(), DecodeError> {
    let node: GenericNode = ObjectNode::new()
        .with("artist", artist("a"))
        .with("artist", GenericNode::array(vec![artist("b"), artist("c")]))
        .into();

    let list: ArtistList = mapper().decode(&node)?;
    assert_eq!(list.artists.len(), 3);
    assert_eq!(list.artists[2].name, "c");
    Ok(())
}

#[test]
fn test_empty_sequence_forms() -> Result<(), DecodeError> {
    let mapper = mapper();
    let empty_forms: Vec<GenericNode> = vec![
        ObjectNode::new().into(),
        ObjectNode::new().with("artist", GenericNode::array(vec![])).into(),
        ObjectNode::new().with("artist", GenericNode::null()).into(),
        // `<artist-list/>` comes out of the XML adapter as empty text.
        GenericNode::text(""),
    ];

    for node in &empty_forms {
        let list: ArtistList = mapper.decode(node)?;
        assert!(list.artists.is_empty(), "{:?}", node);
    }
    Ok(())
}

#[test]
fn test_scalars_are_coerced_from_text() -> Result<(), DecodeError> {
    let node: GenericNode = ObjectNode::new()
        .with("title", "Rumours".into())
        .with("release-year", "1977".into())
        .with("explicit-lyrics", "false".into())
        .with("producer", "Ken Caillat".into())
        .with("track", "Dreams".into())
        .into();

    let album: Album = mapper().decode(&node)?;
    assert_eq!(
        album,
        Album {
            title: "Rumours".to_string(),
            release_year: 1977,
            explicit_lyrics: false,
            producer: Some("Ken Caillat".to_string()),
            headliner: None,
            track: vec!["Dreams".to_string()],
        }
    );
    Ok(())
}

#[test]
fn test_absent_optional_fields_take_zero_values() -> Result<(), DecodeError> {
    let node: GenericNode = ObjectNode::new().with("title", "Tusk".into()).into();

    let album: Album = mapper().decode(&node)?;
    assert_eq!(album.release_year, 0);
    assert!(!album.explicit_lyrics);
    assert_eq!(album.producer, None);
    assert_eq!(album.headliner, None);
    assert!(album.track.is_empty());
    Ok(())
}

#[test]
fn test_missing_required_field() {
    let node: GenericNode = ObjectNode::new()
        .with("release-year", GenericNode::scalar(Scalar::Integer(1975)))
        .into();

    let err = mapper().decode::<Album>(&node).unwrap_err();
    assert_eq!(
        err,
        DecodeError::MissingRequiredField(FieldPath::root().field("title"))
    );
}

#[test]
fn test_array_bound_to_scalar_field_is_a_mismatch() {
    let node: GenericNode = ObjectNode::new()
        .with("title", GenericNode::array(vec!["Rumours".into()]))
        .into();

    match mapper().decode::<Album>(&node).unwrap_err() {
        DecodeError::TypeMismatch { path, found, .. } => {
            assert_eq!(path.to_string(), "title");
            assert_eq!(found, "array");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unparsable_number_is_a_mismatch() {
    let node: GenericNode = ObjectNode::new()
        .with("title", "Rumours".into())
        .with("release-year", "nineteen".into())
        .into();

    let err = mapper().decode::<Album>(&node).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::TypeMismatch { ref expected, .. } if expected == "u32"
    ));
}

#[test]
fn test_repeated_key_for_single_valued_field_is_ambiguous() {
    let node: GenericNode = ObjectNode::new()
        .with(
            "artist",
            ObjectNode::new()
                .with("name", "Fleetwood Mac".into())
                .with("name", "Fleetwood".into())
                .into(),
        )
        .into();

    let err = mapper().decode::<ArtistList>(&node).unwrap_err();
    assert_eq!(
        err,
        DecodeError::AmbiguousCardinality {
            path: FieldPath::root().field("artists").index(0).field("name"),
            key: "name".to_string(),
            count: 2,
        }
    );
}

#[test]
fn test_repeated_key_for_explicit_sequence_is_ambiguous() {
    let node: GenericNode = ObjectNode::new()
        .with("artist", artist("a"))
        .with("artist", artist("b"))
        .into();

    let err = mapper()
        .with_sequence_layout(Wrapping::Explicit)
        .decode::<ArtistList>(&node)
        .unwrap_err();
    assert!(matches!(err, DecodeError::AmbiguousCardinality { count: 2, .. }));
}

#[test]
fn test_unknown_keys() -> Result<(), DecodeError> {
    let node: GenericNode = ObjectNode::new()
        .with("name", "Fleetwood Mac".into())
        .with("formed", "1967".into())
        .into();
    let registry = Arc::new(Registry::builder().register::<Artist>().build().unwrap());

    let lenient = Mapper::new(registry.clone());
    assert_eq!(lenient.decode::<Artist>(&node)?.name, "Fleetwood Mac");

    let strict = Mapper::with_options(registry, MapperOptions::default().deny_unknown_keys(true));
    assert_eq!(
        strict.decode::<Artist>(&node).unwrap_err(),
        DecodeError::UnknownKey {
            path: FieldPath::root(),
            key: "formed".to_string(),
        }
    );
    Ok(())
}

#[test]
fn test_rooted_decode_checks_root_key() {
    let mapper = mapper();
    let wrong: GenericNode = ObjectNode::new()
        .with("artists", ObjectNode::new().into())
        .into();

    assert_eq!(
        mapper.decode_rooted::<ArtistList>(&wrong).unwrap_err(),
        DecodeError::UnexpectedRoot {
            expected: "artist-list".to_string(),
            found: "`artists`".to_string(),
        }
    );
    assert!(matches!(
        mapper.decode_rooted::<ArtistList>(&GenericNode::text("x")),
        Err(DecodeError::UnexpectedRoot { .. })
    ));
}

#[test]
fn test_unregistered_type() {
    let registry = Arc::new(Registry::builder().register::<Artist>().build().unwrap());
    let mapper = Mapper::new(registry);

    let err = mapper
        .decode::<Album>(&ObjectNode::new().into())
        .unwrap_err();
    assert_eq!(err, DecodeError::UnknownType("Album".to_string()));
}

#[test]
fn test_parallel_decoding_shares_one_mapper() {
    let mapper = mapper();
    let node: GenericNode = ObjectNode::new()
        .with("artist", artist("Fleetwood Mac"))
        .with("artist", artist("Fleetwood"))
        .into();
    let expected: ArtistList = mapper.decode(&node).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| mapper.decode::<ArtistList>(&node)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), expected);
        }
    });
}
