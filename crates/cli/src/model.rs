//! The artist documents `revmap` converts.

use rev_mapper::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Entity)]
pub struct Artist {
    pub name: String,
}

/// `<artist-list>` with one `<artist>` element per entry.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Entity)]
pub struct ArtistList {
    #[entity(rename = "artist", implicit)]
    pub artists: Vec<Artist>,
}
