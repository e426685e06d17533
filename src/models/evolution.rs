//! Evolution chains.

use super::NamedResource;
use serde::{Deserialize, Serialize};

/// Evolution chain resource (reached through species data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionChain {
    /// Chain id.
    pub id: u32,
    /// Root link (the base form).
    pub chain: ChainLink,
}

/// One stage in the chain and the stages that follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    /// Species at this stage.
    pub species: NamedResource,
    /// How this stage is reached from its parent.
    #[serde(default)]
    pub evolution_details: Vec<EvolutionDetail>,
    /// Next stages.
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

/// Conditions for one evolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionDetail {
    /// Trigger, e.g. `level-up`, `use-item`, `trade`.
    #[serde(default)]
    pub trigger: Option<NamedResource>,
    /// Minimum level.
    #[serde(default)]
    pub min_level: Option<u32>,
    /// Item used.
    #[serde(default)]
    pub item: Option<NamedResource>,
}

impl EvolutionChain {
    /// Species names in depth-first order, root first.
    #[must_use]
    pub fn species_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect_names(&self.chain, &mut names);
        names
    }

    /// Distinct item URLs referenced by any evolution in the chain.
    #[must_use]
    pub fn item_urls(&self) -> Vec<String> {
        let mut urls = Vec::new();
        collect_item_urls(&self.chain, &mut urls);
        urls
    }
}

fn collect_names(link: &ChainLink, out: &mut Vec<String>) {
    out.push(link.species.name.clone());
    for next in &link.evolves_to {
        collect_names(next, out);
    }
}

fn collect_item_urls(link: &ChainLink, out: &mut Vec<String>) {
    for detail in &link.evolution_details {
        if let Some(item) = &detail.item {
            if !out.contains(&item.url) {
                out.push(item.url.clone());
            }
        }
    }
    for next in &link.evolves_to {
        collect_item_urls(next, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branching_chain() {
        let chain: EvolutionChain = serde_json::from_str(
            r#"{
                "id": 67,
                "chain": {
                    "species": {"name": "eevee", "url": "u"},
                    "evolution_details": [],
                    "evolves_to": [
                        {"species": {"name": "vaporeon", "url": "u"},
                         "evolution_details": [{"trigger": {"name": "use-item", "url": "u"}, "item": {"name": "water-stone", "url": "https://pokeapi.co/api/v2/item/84/"}}],
                         "evolves_to": []},
                        {"species": {"name": "jolteon", "url": "u"},
                         "evolution_details": [{"trigger": {"name": "use-item", "url": "u"}, "item": {"name": "thunder-stone", "url": "https://pokeapi.co/api/v2/item/83/"}}],
                         "evolves_to": []},
                        {"species": {"name": "umbreon", "url": "u"},
                         "evolution_details": [{"trigger": {"name": "level-up", "url": "u"}, "min_level": null, "item": null}],
                         "evolves_to": []}
                    ]
                }
            }"#,
        )
        .expect("valid chain");

        assert_eq!(
            chain.species_names(),
            vec!["eevee", "vaporeon", "jolteon", "umbreon"]
        );
        assert_eq!(
            chain.item_urls(),
            vec![
                "https://pokeapi.co/api/v2/item/84/",
                "https://pokeapi.co/api/v2/item/83/"
            ]
        );
    }
}
