//! Ability data.

use super::NamedResource;
use serde::{Deserialize, Serialize};

/// `GET {base}/ability/{id}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    /// Ability id.
    pub id: u32,
    /// Ability name.
    pub name: String,
    /// Effect descriptions per language.
    #[serde(default)]
    pub effect_entries: Vec<EffectEntry>,
}

/// An effect description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectEntry {
    /// Long description.
    #[serde(default)]
    pub effect: String,
    /// Short description.
    #[serde(default)]
    pub short_effect: String,
    /// Language of the entry.
    pub language: NamedResource,
}

impl Ability {
    /// English long-form effect text.
    #[must_use]
    pub fn english_effect(&self) -> Option<&str> {
        self.effect_entries
            .iter()
            .find(|e| e.language.is_english())
            .map(|e| e.effect.as_str())
    }
}
