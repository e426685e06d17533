//! Process-local caches.
//!
//! [`MemoryCache`] is the building block. [`DexCaches`] bundles one cache
//! per entity kind so a single handle can be shared by every fetcher.

mod memory;

pub use memory::MemoryCache;

use crate::config::{CacheConfig, DebugFlags};
use crate::models::{Ability, EvolutionChain, Item, Move, Pokemon, PokemonList, Species};

/// One cache per entity kind.
///
/// Entity caches use the memory TTL. The region cache holds assembled
/// region results and uses the longer region TTL.
#[derive(Debug)]
pub struct DexCaches {
    /// Records keyed `pokemon-{id}`.
    pub pokemon: MemoryCache<Pokemon>,
    /// List pages keyed `pokemon-list-{limit}-{offset}`.
    pub lists: MemoryCache<PokemonList>,
    /// Species keyed `species-{name}`.
    pub species: MemoryCache<Species>,
    /// Abilities keyed by URL.
    pub abilities: MemoryCache<Ability>,
    /// Moves keyed by URL.
    pub moves: MemoryCache<Move>,
    /// Items keyed by URL.
    pub items: MemoryCache<Item>,
    /// Evolution chains keyed by URL.
    pub evolution_chains: MemoryCache<EvolutionChain>,
    /// Assembled ranges keyed `region-{start}-{end}`.
    pub regions: MemoryCache<Vec<Pokemon>>,
}

impl DexCaches {
    /// Builds the caches from configuration.
    #[must_use]
    pub fn from_config(config: &CacheConfig, debug: DebugFlags) -> Self {
        let ttl = config.memory_ttl();
        Self {
            pokemon: MemoryCache::new("pokemon", ttl).with_debug(debug),
            lists: MemoryCache::new("pokemon_list", ttl).with_debug(debug),
            species: MemoryCache::new("species", ttl).with_debug(debug),
            abilities: MemoryCache::new("ability", ttl).with_debug(debug),
            moves: MemoryCache::new("move", ttl).with_debug(debug),
            items: MemoryCache::new("item", ttl).with_debug(debug),
            evolution_chains: MemoryCache::new("evolution_chain", ttl).with_debug(debug),
            regions: MemoryCache::new("region", config.region_ttl()).with_debug(debug),
        }
    }

    /// Empties every cache.
    pub fn clear_all(&self) {
        self.pokemon.clear();
        self.lists.clear();
        self.species.clear();
        self.abilities.clear();
        self.moves.clear();
        self.items.clear();
        self.evolution_chains.clear();
        self.regions.clear();
        tracing::info!("all caches cleared");
    }

    /// Total entries across every cache.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.pokemon.size()
            + self.lists.size()
            + self.species.size()
            + self.abilities.size()
            + self.moves.size()
            + self.items.size()
            + self.evolution_chains.size()
            + self.regions.size()
    }
}

impl Default for DexCaches {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default(), DebugFlags::none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_ttls_follow_config() {
        let config = CacheConfig {
            ttl_minutes: 60,
            memory_ttl_minutes: 5,
        };
        let caches = DexCaches::from_config(&config, DebugFlags::none());
        assert_eq!(caches.pokemon.ttl(), Duration::from_secs(300));
        assert_eq!(caches.evolution_chains.ttl(), Duration::from_secs(300));
        assert_eq!(caches.regions.ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_clear_all() {
        let caches = DexCaches::default();
        caches.lists.set("pokemon-list-1-0", PokemonList {
            count: 1,
            next: None,
            previous: None,
            results: Vec::new(),
        });
        caches.regions.set("region-1-1", Vec::new());
        assert_eq!(caches.total_entries(), 2);

        caches.clear_all();
        assert_eq!(caches.total_entries(), 0);
    }
}
