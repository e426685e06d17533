//! # Dexcache
//!
//! Data acquisition and caching for a Pokédex client.
//!
//! Dexcache retrieves creature records from a public REST API, organised by
//! game region, and keeps repeated views from hitting the network twice.
//!
//! ## Features
//!
//! - Time-expiring in-memory caches, one per entity kind
//! - Timeout plus capped exponential-backoff retry on every request
//! - Batched, rate-limited bulk fetching with a list-driven primary path
//!   and an id-driven fallback
//! - Incremental progress reporting for long-running region loads
//!
//! ## Example
//!
//! ```rust,ignore
//! use dexcache::{DexConfig, PokeApiClient, RegionFetcher};
//! use std::sync::Arc;
//!
//! let config = DexConfig::load_default().with_env_overrides();
//! let client = Arc::new(PokeApiClient::from_config(&config));
//! let fetcher = RegionFetcher::new(client, config.batch.clone());
//! let kanto = fetcher
//!     .fetch_range(1, 151, Some(&|current: usize, total: usize| {
//!         eprintln!("{current}/{total}");
//!     }))
//!     .await;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cache;
pub mod config;
pub mod http;
pub mod models;
pub mod observability;
pub mod services;

// Re-exports for convenience
pub use cache::{DexCaches, MemoryCache};
pub use config::{ApiConfig, BatchConfig, CacheConfig, DebugFlags, DexConfig};
pub use http::{HttpResponse, RequestError, RequestExecutor, ReqwestTransport, Transport};
pub use models::{ListItem, Pokemon, PokemonList, REGIONS, Region};
pub use services::{
    FetchStrategy, PokeApiClient, ProgressSink, ProgressState, RangeReport, RegionFetcher,
    SharedProgress,
};

/// Error type for dexcache operations.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed ids, URLs or CLI arguments |
/// | `Request` | A request failed after all retry attempts |
/// | `Decode` | A response body did not match the expected wire shape |
/// | `OperationFailed` | Config files, log files, logging init, output serialization |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A network request failed after exhausting its attempts.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// A response body could not be decoded.
    #[error("failed to decode {resource}: {cause}")]
    Decode {
        /// The resource being decoded (usually the URL).
        resource: String,
        /// The underlying cause.
        cause: String,
    },

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for dexcache operations.
pub type Result<T> = std::result::Result<T, Error>;
