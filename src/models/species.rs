//! Species data: flavor text and the evolution-chain reference.

use super::{NamedResource, clean_flavor_text};
use serde::{Deserialize, Serialize};

/// `GET {base}/pokemon-species/{name}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    /// Species id.
    pub id: u32,
    /// Species name.
    pub name: String,
    /// Legendary flag.
    #[serde(default)]
    pub is_legendary: bool,
    /// Mythical flag.
    #[serde(default)]
    pub is_mythical: bool,
    /// Species this one evolves from.
    #[serde(default)]
    pub evolves_from_species: Option<NamedResource>,
    /// Reference to the evolution chain (URL only).
    #[serde(default)]
    pub evolution_chain: Option<ResourceUrl>,
    /// Pokédex entries across games and languages.
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorTextEntry>,
}

/// An unnamed resource reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUrl {
    /// Absolute URL.
    pub url: String,
}

/// One Pokédex entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorTextEntry {
    /// Raw text, may contain form feeds and newlines.
    pub flavor_text: String,
    /// Language of the entry.
    pub language: NamedResource,
    /// Game version of the entry.
    #[serde(default)]
    pub version: Option<NamedResource>,
}

impl Species {
    /// First English entry with control characters collapsed.
    #[must_use]
    pub fn english_flavor_text(&self) -> Option<String> {
        self.flavor_text_entries
            .iter()
            .find(|entry| entry.language.is_english())
            .map(|entry| clean_flavor_text(&entry.flavor_text))
    }

    /// English entries, one per game version, in API order.
    #[must_use]
    pub fn english_entries_by_version(&self) -> Vec<(String, String)> {
        let mut seen = std::collections::HashSet::new();
        self.flavor_text_entries
            .iter()
            .filter(|entry| entry.language.is_english())
            .filter_map(|entry| {
                let version = entry.version.as_ref()?.name.clone();
                seen.insert(version.clone())
                    .then(|| (version, clean_flavor_text(&entry.flavor_text)))
            })
            .collect()
    }

    /// URL of the evolution chain, if any.
    #[must_use]
    pub fn evolution_chain_url(&self) -> Option<&str> {
        self.evolution_chain.as_ref().map(|r| r.url.as_str())
    }
}
