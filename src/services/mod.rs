//! Fetch services.
//!
//! [`PokeApiClient`] resolves single resources through the caches and the
//! request executor. [`RegionFetcher`] builds whole regions on top of it.

mod client;
mod progress;
mod region;

pub use client::{DEFAULT_LIST_LIMIT, PokeApiClient};
pub use progress::{ProgressSink, ProgressState, SharedProgress};
pub use region::{FetchStrategy, RangeReport, RegionFetcher, region_cache_key};
