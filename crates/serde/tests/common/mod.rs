#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use rev_mapper::{Entity, Mapper, Registry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Entity)]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Entity)]
pub struct ArtistList {
    #[entity(rename = "artist", implicit)]
    pub artists: Vec<Artist>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Entity)]
pub struct Album {
    pub title: String,
    pub tag: Option<Vec<String>>,
    #[entity(implicit)]
    pub artist: Vec<Artist>,
}

pub fn artist(name: &str) -> Artist {
    Artist {
        name: name.to_string(),
    }
}

pub fn expected_artist_list() -> ArtistList {
    ArtistList {
        artists: vec![
            artist("Fleetwood Mac"),
            artist("Fleetwood"),
            artist("Mick Fleetwood"),
        ],
    }
}

pub fn mapper() -> Mapper {
    let registry = Registry::builder()
        .register::<Artist>()
        .register::<ArtistList>()
        .register::<Album>()
        .build()
        .expect("artist registry");
    Mapper::new(Arc::new(registry))
}

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e))
}
