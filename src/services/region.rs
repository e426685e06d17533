//! Region bulk orchestrator.
//!
//! A range is loaded in one of two ways:
//!
//! 1. **List**: one listing call returns every entry in the range, and the
//!    ids parsed from the entry URLs are resolved record by record.
//! 2. **Id fallback**: if the listing call fails or comes back empty, the
//!    raw id range is resolved directly.
//!
//! Either way ids are resolved in fixed-size batches. Requests inside a
//! batch run concurrently; batches run strictly one after another with a
//! fixed delay between them. Records that fail to resolve are dropped.

use super::client::PokeApiClient;
use super::progress::ProgressSink;
use crate::config::BatchConfig;
use crate::models::{ListItem, Pokemon, Region};
use crate::observability::REGION_FETCH_TOTAL;
use futures_util::future::join_all;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::instrument;

/// How a range was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStrategy {
    /// Ids came from one listing call.
    List,
    /// The listing call failed and ids were taken from the range itself.
    IdFallback,
}

impl FetchStrategy {
    /// Returns the strategy as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::IdFallback => "id_fallback",
        }
    }
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a range load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RangeReport {
    /// Resolved records, ascending by id.
    pub pokemon: Vec<Pokemon>,
    /// Path taken; `None` when the range was invalid and nothing ran.
    pub strategy: Option<FetchStrategy>,
    /// Number of ids in the requested range.
    pub requested: usize,
    /// Ids that were attempted and could not be resolved, ascending.
    pub failed_ids: Vec<u32>,
}

impl RangeReport {
    /// Whether every requested record was resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pokemon.len() == self.requested
    }
}

/// Cache key for an assembled range.
#[must_use]
pub fn region_cache_key(start_id: u32, end_id: u32) -> String {
    format!("region-{start_id}-{end_id}")
}

/// Loads whole regions (or arbitrary id ranges) in rate-limited batches.
#[derive(Debug, Clone)]
pub struct RegionFetcher {
    client: Arc<PokeApiClient>,
    batch: BatchConfig,
}

impl RegionFetcher {
    /// Creates a fetcher.
    #[must_use]
    pub fn new(client: Arc<PokeApiClient>, batch: BatchConfig) -> Self {
        Self { client, batch }
    }

    /// Underlying client.
    #[must_use]
    pub const fn client(&self) -> &Arc<PokeApiClient> {
        &self.client
    }

    /// Loads the inclusive range `[start_id, end_id]`, ascending by id.
    ///
    /// Never fails. Unresolvable records are left out, so a short (or empty)
    /// result is a degraded outcome rather than an error.
    pub async fn fetch_range(
        &self,
        start_id: u32,
        end_id: u32,
        on_progress: Option<&dyn ProgressSink>,
    ) -> Vec<Pokemon> {
        self.fetch_range_report(start_id, end_id, on_progress)
            .await
            .pokemon
    }

    /// Like [`Self::fetch_range`], also reporting the path taken and the ids
    /// that failed.
    #[instrument(skip(self, on_progress), fields(operation = "fetch_range"))]
    pub async fn fetch_range_report(
        &self,
        start_id: u32,
        end_id: u32,
        on_progress: Option<&dyn ProgressSink>,
    ) -> RangeReport {
        if start_id == 0 || end_id < start_id {
            tracing::warn!(start_id, end_id, "invalid id range");
            return RangeReport::default();
        }

        let total = usize::try_from(end_id - start_id + 1).unwrap_or(usize::MAX);
        let limit = end_id - start_id + 1;
        let offset = start_id - 1;

        let listed = self
            .client
            .fetch_pokemon_list(limit, offset)
            .await
            .map(|list| list.results)
            .filter(|items| !items.is_empty());

        let (strategy, (mut pokemon, mut failed_ids)) = if let Some(items) = listed {
            if let Some(sink) = on_progress {
                sink.report(0, total);
            }
            let ids = ids_from_items(&items);
            let batches = ids.chunks(self.batch_size()).map(<[u32]>::to_vec);
            let outcome = self.resolve_in_batches(batches, total, on_progress).await;
            (FetchStrategy::List, outcome)
        } else {
            tracing::info!(start_id, end_id, "list fetch failed, falling back to id range");
            let batches = id_batches(start_id, end_id, self.batch_size());
            let outcome = self.resolve_in_batches(batches, total, on_progress).await;
            (FetchStrategy::IdFallback, outcome)
        };

        pokemon.sort_by_key(|p| p.id);
        failed_ids.sort_unstable();

        metrics::counter!(REGION_FETCH_TOTAL, "strategy" => strategy.as_str())
            .increment(1);
        tracing::info!(
            start_id,
            end_id,
            strategy = %strategy,
            resolved = pokemon.len(),
            failed = failed_ids.len(),
            "range fetched"
        );

        self.client
            .caches()
            .regions
            .set(region_cache_key(start_id, end_id), pokemon.clone());

        RangeReport {
            pokemon,
            strategy: Some(strategy),
            requested: total,
            failed_ids,
        }
    }

    /// Loads a region, reusing a cached result for the same range.
    pub async fn fetch_region(
        &self,
        region: &Region,
        on_progress: Option<&dyn ProgressSink>,
    ) -> Vec<Pokemon> {
        let key = region_cache_key(region.start_id, region.end_id);
        if let Some(cached) = self.client.caches().regions.get(&key) {
            tracing::debug!(region = region.id, count = cached.len(), "region served from cache");
            if let Some(sink) = on_progress {
                sink.report(
                    cached.len(),
                    usize::try_from(region.count()).unwrap_or(usize::MAX),
                );
            }
            return cached;
        }
        self.fetch_range(region.start_id, region.end_id, on_progress)
            .await
    }

    /// Resolves every id in `[start_id, end_id]` in a single concurrent join,
    /// without batching or delay. Failures are dropped.
    #[instrument(skip(self), fields(operation = "fetch_batch"))]
    pub async fn fetch_batch(&self, start_id: u32, end_id: u32) -> Vec<Pokemon> {
        if start_id == 0 || end_id < start_id {
            return Vec::new();
        }
        let fetches = (start_id..=end_id).map(|id| self.client.fetch_pokemon(id));
        join_all(fetches).await.into_iter().flatten().collect()
    }

    fn batch_size(&self) -> usize {
        self.batch.batch_size.max(1)
    }

    async fn resolve_in_batches<I>(
        &self,
        batches: I,
        total: usize,
        on_progress: Option<&dyn ProgressSink>,
    ) -> (Vec<Pokemon>, Vec<u32>)
    where
        I: Iterator<Item = Vec<u32>> + Send,
    {
        let mut batches = batches.enumerate().peekable();
        let mut resolved = Vec::new();
        let mut failed = Vec::new();

        while let Some((index, chunk)) = batches.next() {
            let results = join_all(chunk.iter().map(|&id| self.client.fetch_pokemon(id))).await;
            for (&id, result) in chunk.iter().zip(results) {
                match result {
                    Some(pokemon) => resolved.push(pokemon),
                    None => failed.push(id),
                }
            }

            tracing::debug!(batch = index + 1, resolved = resolved.len(), "batch done");
            if let Some(sink) = on_progress {
                sink.report(resolved.len(), total);
            }

            if batches.peek().is_some() && !self.batch.delay().is_zero() {
                tokio::time::sleep(self.batch.delay()).await;
            }
        }

        (resolved, failed)
    }
}

/// Consecutive id batches covering `[start_id, end_id]`, built lazily.
fn id_batches(
    start_id: u32,
    end_id: u32,
    batch_size: usize,
) -> impl Iterator<Item = Vec<u32>> + Send {
    let span = u32::try_from(batch_size.saturating_sub(1)).unwrap_or(u32::MAX);
    (start_id..=end_id)
        .step_by(batch_size.max(1))
        .map(move |first| (first..=first.saturating_add(span).min(end_id)).collect())
}

/// Ids encoded in listing entries. Entries without a numeric id are skipped.
fn ids_from_items(items: &[ListItem]) -> Vec<u32> {
    items
        .iter()
        .filter_map(|item| {
            let id = item.id();
            if id.is_none() {
                tracing::warn!(name = %item.name, url = %item.url, "list entry without numeric id");
            }
            id
        })
        .collect()
}
