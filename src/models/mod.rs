//! Data models for dexcache.
//!
//! Wire types mirror the remote API's JSON and keep only the fields the
//! fetch layer reads; unknown fields are ignored. Domain types are what the
//! rest of the crate hands out.

mod ability;
mod evolution;
mod item;
mod list;
mod moves;
mod pokemon;
mod region;
mod species;

pub use ability::{Ability, EffectEntry};
pub use evolution::{ChainLink, EvolutionChain, EvolutionDetail};
pub use item::{Item, ItemSprites};
pub use list::{ListItem, PokemonList, id_from_url};
pub use moves::{Move, MoveFlavorText};
pub use pokemon::{AbilityRef, BaseStat, MoveLearn, Pokemon, PokemonApi, Sprites};
pub use region::{
    REGIONS, Region, get_region_by_id, get_region_by_pokemon_id, region_offset,
    region_pokemon_count,
};
pub use species::{FlavorTextEntry, ResourceUrl, Species};

use serde::{Deserialize, Serialize};

/// A named reference to another API resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    /// Resource name (slug).
    pub name: String,
    /// Absolute URL of the resource.
    pub url: String,
}

impl NamedResource {
    /// Returns true if this reference names the English language.
    #[must_use]
    pub fn is_english(&self) -> bool {
        self.name == "en"
    }
}

/// Collapses the control characters the API embeds in flavor text.
pub(crate) fn clean_flavor_text(text: &str) -> String {
    text.split(['\u{000c}', '\n', '\r'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
