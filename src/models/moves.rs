//! Move data.

use super::{EffectEntry, NamedResource, clean_flavor_text};
use serde::{Deserialize, Serialize};

/// `GET {base}/move/{id}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Move id.
    pub id: u32,
    /// Move name.
    pub name: String,
    /// Accuracy percentage; `None` for moves that never miss.
    #[serde(default)]
    pub accuracy: Option<u32>,
    /// Base power; `None` for status moves.
    #[serde(default)]
    pub power: Option<u32>,
    /// Power points.
    #[serde(default)]
    pub pp: Option<u32>,
    /// Elemental type.
    #[serde(rename = "type")]
    pub kind: NamedResource,
    /// Physical, special or status.
    #[serde(default)]
    pub damage_class: Option<NamedResource>,
    /// Effect descriptions per language.
    #[serde(default)]
    pub effect_entries: Vec<EffectEntry>,
    /// Flavor text per language and version group.
    #[serde(default)]
    pub flavor_text_entries: Vec<MoveFlavorText>,
}

/// Move flavor text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFlavorText {
    /// Raw text.
    pub flavor_text: String,
    /// Language of the entry.
    pub language: NamedResource,
}

impl Move {
    /// Damage category, defaulting to `status`.
    #[must_use]
    pub fn category(&self) -> &str {
        self.damage_class.as_ref().map_or("status", |c| c.name.as_str())
    }

    /// English short effect, falling back to English flavor text.
    #[must_use]
    pub fn english_description(&self) -> Option<String> {
        self.effect_entries
            .iter()
            .find(|e| e.language.is_english())
            .map(|e| e.short_effect.clone())
            .or_else(|| {
                self.flavor_text_entries
                    .iter()
                    .find(|e| e.language.is_english())
                    .map(|e| clean_flavor_text(&e.flavor_text))
            })
    }
}
