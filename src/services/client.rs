//! Cached single-resource fetchers.
//!
//! Every fetch follows the same pattern: look up the entity cache, call the
//! [`RequestExecutor`] on a miss, decode, store, return. Each operation comes
//! in two flavours:
//!
//! - `try_*` returns a [`Result`] so callers can see why a fetch failed
//! - the plain variant never fails: it logs the cause and returns `None`

use crate::cache::{DexCaches, MemoryCache};
use crate::config::DexConfig;
use crate::http::{RequestExecutor, ReqwestTransport, Transport};
use crate::models::{
    Ability, EvolutionChain, Item, ListItem, Move, Pokemon, PokemonApi, PokemonList, Species,
};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::instrument;

/// Default page size for [`PokeApiClient::fetch_all_list_items`].
pub const DEFAULT_LIST_LIMIT: u32 = 1000;

/// Client for the remote Pokémon API.
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    executor: RequestExecutor,
    caches: Arc<DexCaches>,
    base_url: String,
}

impl PokeApiClient {
    /// Creates a client from its parts.
    #[must_use]
    pub fn new(executor: RequestExecutor, caches: Arc<DexCaches>, base_url: impl Into<String>) -> Self {
        Self {
            executor,
            caches,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a client that talks to the configured base URL over HTTPS.
    #[must_use]
    pub fn from_config(config: &DexConfig) -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()), config)
    }

    /// Creates a client over an arbitrary transport with fresh caches.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>, config: &DexConfig) -> Self {
        let executor = RequestExecutor::new(transport, &config.api, config.debug);
        let caches = Arc::new(DexCaches::from_config(&config.cache, config.debug));
        Self::new(executor, caches, &config.api.base_url)
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Shared caches.
    #[must_use]
    pub const fn caches(&self) -> &Arc<DexCaches> {
        &self.caches
    }

    /// Empties every cache.
    pub fn clear_all(&self) {
        self.caches.clear_all();
    }

    /// Fetches a record by dex number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for id 0, [`Error::Request`] if every
    /// attempt failed and [`Error::Decode`] if the payload is malformed.
    #[instrument(skip(self), fields(operation = "fetch_pokemon"))]
    pub async fn try_fetch_pokemon(&self, id: u32) -> Result<Pokemon> {
        if id == 0 {
            return Err(Error::InvalidInput("pokemon ids start at 1".to_string()));
        }
        let url = format!("{}/pokemon/{id}", self.base_url);
        self.fetch_cached::<PokemonApi, _>(&self.caches.pokemon, &format!("pokemon-{id}"), &url)
            .await
    }

    /// Fetches a record by dex number, or `None` on any failure.
    pub async fn fetch_pokemon(&self, id: u32) -> Option<Pokemon> {
        self.try_fetch_pokemon(id)
            .await
            .inspect_err(|e| tracing::warn!(id, error = %e, "failed to fetch pokemon"))
            .ok()
    }

    /// Fetches one page of the directory listing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] if every attempt failed and
    /// [`Error::Decode`] if the payload is malformed.
    #[instrument(skip(self), fields(operation = "fetch_pokemon_list"))]
    pub async fn try_fetch_pokemon_list(&self, limit: u32, offset: u32) -> Result<PokemonList> {
        let url = format!("{}/pokemon?limit={limit}&offset={offset}", self.base_url);
        let key = format!("pokemon-list-{limit}-{offset}");
        self.fetch_cached::<PokemonList, _>(&self.caches.lists, &key, &url)
            .await
    }

    /// Fetches one page of the directory listing, or `None` on any failure.
    pub async fn fetch_pokemon_list(&self, limit: u32, offset: u32) -> Option<PokemonList> {
        self.try_fetch_pokemon_list(limit, offset)
            .await
            .inspect_err(|e| {
                tracing::warn!(limit, offset, error = %e, "failed to fetch pokemon list");
            })
            .ok()
    }

    /// Entries of one listing page; empty on failure.
    pub async fn fetch_list_items(&self, limit: u32, offset: u32) -> Vec<ListItem> {
        self.fetch_pokemon_list(limit, offset)
            .await
            .map(|list| list.results)
            .unwrap_or_default()
    }

    /// Entries of the first [`DEFAULT_LIST_LIMIT`] records; empty on failure.
    pub async fn fetch_all_list_items(&self) -> Vec<ListItem> {
        self.fetch_list_items(DEFAULT_LIST_LIMIT, 0).await
    }

    /// Fetches species data by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a blank name, otherwise the same
    /// errors as [`Self::try_fetch_pokemon`].
    #[instrument(skip(self), fields(operation = "fetch_species"))]
    pub async fn try_fetch_species(&self, name: &str) -> Result<Species> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Err(Error::InvalidInput("species name is empty".to_string()));
        }
        let url = format!("{}/pokemon-species/{name}", self.base_url);
        self.fetch_cached::<Species, _>(&self.caches.species, &format!("species-{name}"), &url)
            .await
    }

    /// Fetches species data by name, or `None` on any failure.
    pub async fn fetch_species(&self, name: &str) -> Option<Species> {
        self.try_fetch_species(name)
            .await
            .inspect_err(|e| tracing::warn!(name, error = %e, "failed to fetch species"))
            .ok()
    }

    /// Fetches an ability from the URL embedded in a record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] or [`Error::Decode`].
    pub async fn try_fetch_ability(&self, url: &str) -> Result<Ability> {
        self.fetch_cached::<Ability, _>(&self.caches.abilities, url, url)
            .await
    }

    /// Fetches an ability, or `None` on any failure.
    pub async fn fetch_ability(&self, url: &str) -> Option<Ability> {
        log_failure(self.try_fetch_ability(url).await, "ability", url)
    }

    /// Fetches a move from the URL embedded in a record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] or [`Error::Decode`].
    pub async fn try_fetch_move(&self, url: &str) -> Result<Move> {
        self.fetch_cached::<Move, _>(&self.caches.moves, url, url).await
    }

    /// Fetches a move, or `None` on any failure.
    pub async fn fetch_move(&self, url: &str) -> Option<Move> {
        log_failure(self.try_fetch_move(url).await, "move", url)
    }

    /// Fetches an item from a URL embedded in an evolution chain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] or [`Error::Decode`].
    pub async fn try_fetch_item(&self, url: &str) -> Result<Item> {
        self.fetch_cached::<Item, _>(&self.caches.items, url, url).await
    }

    /// Fetches an item, or `None` on any failure.
    pub async fn fetch_item(&self, url: &str) -> Option<Item> {
        log_failure(self.try_fetch_item(url).await, "item", url)
    }

    /// Fetches an evolution chain from the URL embedded in species data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] or [`Error::Decode`].
    pub async fn try_fetch_evolution_chain(&self, url: &str) -> Result<EvolutionChain> {
        self.fetch_cached::<EvolutionChain, _>(&self.caches.evolution_chains, url, url)
            .await
    }

    /// Fetches an evolution chain, or `None` on any failure.
    pub async fn fetch_evolution_chain(&self, url: &str) -> Option<EvolutionChain> {
        log_failure(self.try_fetch_evolution_chain(url).await, "evolution chain", url)
    }

    /// Cache-then-network lookup shared by every fetcher.
    ///
    /// The body is decoded as `W` and converted into the cached type `T`.
    async fn fetch_cached<W, T>(&self, cache: &MemoryCache<T>, key: &str, url: &str) -> Result<T>
    where
        W: DeserializeOwned,
        T: From<W> + Clone,
    {
        if let Some(hit) = cache.get(key) {
            return Ok(hit);
        }

        let response = self.executor.execute(url).await?;
        let value = T::from(response.json::<W>(url)?);
        cache.set(key, value.clone());
        Ok(value)
    }
}

fn log_failure<T>(result: Result<T>, resource: &'static str, url: &str) -> Option<T> {
    result
        .inspect_err(|e| tracing::warn!(resource, url, error = %e, "fetch failed"))
        .ok()
}
