//! Pokémon record: wire shape and normalized domain shape.

use super::NamedResource;
use serde::{Deserialize, Serialize};

/// Normalized creature record.
///
/// Built once per fetch from [`PokemonApi`] and never mutated afterwards.
/// Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    /// National dex number (1-based).
    pub id: u32,
    /// Lowercase slug.
    pub name: String,
    /// Image references.
    pub sprites: Sprites,
    /// Type names ordered by slot; the first is the primary type.
    pub types: Vec<String>,
    /// Height in decimetres.
    pub height: u32,
    /// Weight in hectograms.
    pub weight: u32,
    /// Base experience yield, when known.
    pub base_experience: Option<u32>,
    /// Base stats in API order (hp, attack, defense, special-attack, special-defense, speed).
    pub stats: Vec<BaseStat>,
    /// Abilities with references for enrichment.
    pub abilities: Vec<AbilityRef>,
    /// Learnable moves.
    pub moves: Vec<MoveLearn>,
}

/// Image references for a record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sprites {
    /// Small front sprite.
    pub front_default: Option<String>,
    /// Official artwork.
    pub official_artwork: Option<String>,
}

/// One base stat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStat {
    /// Stat name, e.g. `special-attack`.
    pub name: String,
    /// Base value.
    pub value: u32,
}

/// An ability reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRef {
    /// Ability name.
    pub name: String,
    /// Ability resource URL.
    pub url: String,
    /// Whether this is a hidden ability.
    pub is_hidden: bool,
}

/// How a move is learned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLearn {
    /// Move name.
    pub name: String,
    /// Move resource URL.
    pub url: String,
    /// Learn method, e.g. `level-up`, `machine`, `egg`.
    pub method: String,
    /// Level for level-up moves; `None` when the API reports 0.
    pub level: Option<u32>,
}

impl Pokemon {
    /// The primary (first-slot) type.
    #[must_use]
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    /// Best image for display: official artwork, else the front sprite.
    #[must_use]
    pub fn artwork_url(&self) -> Option<&str> {
        self.sprites
            .official_artwork
            .as_deref()
            .or(self.sprites.front_default.as_deref())
    }

    /// Looks up a base stat by name.
    #[must_use]
    pub fn stat(&self, name: &str) -> Option<u32> {
        self.stats.iter().find(|s| s.name == name).map(|s| s.value)
    }

    /// Sum of all base stats.
    #[must_use]
    pub fn total_base_stats(&self) -> u32 {
        self.stats.iter().map(|s| s.value).sum()
    }
}

/// `GET {base}/pokemon/{id}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonApi {
    /// Dex number.
    pub id: u32,
    /// Slug.
    pub name: String,
    /// Base experience (null for some forms).
    #[serde(default)]
    pub base_experience: Option<u32>,
    /// Height.
    #[serde(default)]
    pub height: u32,
    /// Weight.
    #[serde(default)]
    pub weight: u32,
    /// Sprites.
    #[serde(default)]
    pub sprites: WireSprites,
    /// Type slots.
    #[serde(default)]
    pub types: Vec<WireTypeSlot>,
    /// Stats.
    #[serde(default)]
    pub stats: Vec<WireStat>,
    /// Ability slots.
    #[serde(default)]
    pub abilities: Vec<WireAbilitySlot>,
    /// Move entries.
    #[serde(default)]
    pub moves: Vec<WireMoveSlot>,
}

/// Wire sprites.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireSprites {
    /// Front sprite.
    #[serde(default)]
    pub front_default: Option<String>,
    /// Nested artwork sets.
    #[serde(default)]
    pub other: Option<WireOtherSprites>,
}

/// Wire `sprites.other`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireOtherSprites {
    /// Official artwork set.
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<WireArtwork>,
}

/// Wire artwork set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireArtwork {
    /// Front artwork.
    #[serde(default)]
    pub front_default: Option<String>,
}

/// Wire type slot.
#[derive(Debug, Clone, Deserialize)]
pub struct WireTypeSlot {
    /// Slot number (1 = primary).
    pub slot: u8,
    /// Type reference.
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// Wire stat.
#[derive(Debug, Clone, Deserialize)]
pub struct WireStat {
    /// Base value.
    pub base_stat: u32,
    /// Stat reference.
    pub stat: NamedResource,
}

/// Wire ability slot.
#[derive(Debug, Clone, Deserialize)]
pub struct WireAbilitySlot {
    /// Hidden flag.
    #[serde(default)]
    pub is_hidden: bool,
    /// Ability reference.
    pub ability: NamedResource,
}

/// Wire move entry.
#[derive(Debug, Clone, Deserialize)]
pub struct WireMoveSlot {
    /// Move reference.
    #[serde(rename = "move")]
    pub move_ref: NamedResource,
    /// Per-version learn details.
    #[serde(default)]
    pub version_group_details: Vec<WireVersionGroupDetail>,
}

/// Wire learn detail.
#[derive(Debug, Clone, Deserialize)]
pub struct WireVersionGroupDetail {
    /// Level (0 when not level-up).
    #[serde(default)]
    pub level_learned_at: u32,
    /// Learn method reference.
    pub move_learn_method: NamedResource,
}

impl From<PokemonApi> for Pokemon {
    fn from(api: PokemonApi) -> Self {
        let mut type_slots = api.types;
        type_slots.sort_by_key(|t| t.slot);

        let official_artwork = api
            .sprites
            .other
            .and_then(|o| o.official_artwork)
            .and_then(|a| a.front_default);

        let moves = api
            .moves
            .into_iter()
            .map(|m| {
                // The first version group decides the displayed learn method.
                let first = m.version_group_details.into_iter().next();
                let (method, level) = first.map_or_else(
                    || ("unknown".to_string(), None),
                    |d| {
                        let level = (d.level_learned_at > 0).then_some(d.level_learned_at);
                        (d.move_learn_method.name, level)
                    },
                );
                MoveLearn {
                    name: m.move_ref.name,
                    url: m.move_ref.url,
                    method,
                    level,
                }
            })
            .collect();

        Self {
            id: api.id,
            name: api.name,
            sprites: Sprites {
                front_default: api.sprites.front_default,
                official_artwork,
            },
            types: type_slots.into_iter().map(|t| t.kind.name).collect(),
            height: api.height,
            weight: api.weight,
            base_experience: api.base_experience,
            stats: api
                .stats
                .into_iter()
                .map(|s| BaseStat {
                    name: s.stat.name,
                    value: s.base_stat,
                })
                .collect(),
            abilities: api
                .abilities
                .into_iter()
                .map(|a| AbilityRef {
                    name: a.ability.name,
                    url: a.ability.url,
                    is_hidden: a.is_hidden,
                })
                .collect(),
            moves,
        }
    }
}
