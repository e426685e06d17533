//! Configuration management.
//!
//! Settings are resolved once at startup and passed explicitly to the
//! executor, caches and fetchers. Precedence, lowest first: built-in
//! defaults, the TOML config file, environment variables.

mod debug;

pub use debug::DebugFlags;

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
/// Default per-attempt request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Default number of attempts per request.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
/// Default number of records resolved concurrently.
pub const DEFAULT_BATCH_SIZE: usize = 10;
/// Default pause between batches in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 150;
/// Default TTL of the coarse region-result cache in minutes.
pub const DEFAULT_CACHE_TTL_MINUTES: u64 = 60;
/// Default TTL of the per-entity memory caches in minutes.
pub const DEFAULT_MEMORY_CACHE_TTL_MINUTES: u64 = 30;
/// Default page size for listing output.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Main configuration for dexcache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DexConfig {
    /// Remote API settings.
    pub api: ApiConfig,
    /// Bulk fetch batching settings.
    pub batch: BatchConfig,
    /// Cache lifetimes.
    pub cache: CacheConfig,
    /// Page size used when listing records.
    pub items_per_page: usize,
    /// Logging toggles.
    pub debug: DebugFlags,
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            batch: BatchConfig::default(),
            cache: CacheConfig::default(),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            debug: DebugFlags::default(),
        }
    }
}

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Deadline for a single attempt in milliseconds.
    pub timeout_ms: u64,
    /// Attempts per request (at least 1).
    pub retry_attempts: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        }
    }
}

impl ApiConfig {
    /// Per-attempt deadline.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Bulk fetch batching settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Records resolved concurrently per batch (at least 1).
    pub batch_size: usize,
    /// Pause between consecutive batches in milliseconds.
    pub delay_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl BatchConfig {
    /// Inter-batch delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Cache lifetimes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL for assembled region results, in minutes.
    pub ttl_minutes: u64,
    /// TTL for per-entity caches (records, list pages, species...), in minutes.
    pub memory_ttl_minutes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_CACHE_TTL_MINUTES,
            memory_ttl_minutes: DEFAULT_MEMORY_CACHE_TTL_MINUTES,
        }
    }
}

impl CacheConfig {
    /// TTL for assembled region results.
    #[must_use]
    pub const fn region_ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes.saturating_mul(60))
    }

    /// TTL for per-entity caches.
    #[must_use]
    pub const fn memory_ttl(&self) -> Duration {
        Duration::from_secs(self.memory_ttl_minutes.saturating_mul(60))
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// API section.
    pub api: Option<ConfigFileApi>,
    /// Batch section.
    pub batch: Option<ConfigFileBatch>,
    /// Cache section.
    pub cache: Option<ConfigFileCache>,
    /// Page size.
    pub items_per_page: Option<usize>,
    /// Debug section.
    pub debug: Option<ConfigFileDebug>,
}

/// API section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileApi {
    /// Base URL.
    pub base_url: Option<String>,
    /// Timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Attempts per request.
    pub retry_attempts: Option<u32>,
}

/// Batch section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileBatch {
    /// Batch size.
    pub batch_size: Option<usize>,
    /// Delay between batches in milliseconds.
    pub delay_ms: Option<u64>,
}

/// Cache section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileCache {
    /// Region-result TTL in minutes.
    pub ttl_minutes: Option<u64>,
    /// Per-entity TTL in minutes.
    pub memory_ttl_minutes: Option<u64>,
}

/// Debug section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileDebug {
    /// Per-attempt and cache logging.
    pub debug_api_calls: Option<bool>,
    /// Per-URL logging.
    pub enable_api_logging: Option<bool>,
}

impl DexConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from defaults plus environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new().with_env_overrides()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for [`ConfigFile`].
    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Looks for `dexcache/config.toml` in the platform config directory.
    /// Returns default configuration if no readable file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::new();
        };

        let platform_config = base_dirs.config_dir().join("dexcache").join("config.toml");
        if platform_config.exists() {
            match Self::load_from_file(&platform_config) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(
                    path = %platform_config.display(),
                    error = %e,
                    "Ignoring unreadable config file"
                ),
            }
        }

        Self::new()
    }

    /// Converts a `ConfigFile` to `DexConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::new();

        if let Some(api) = file.api {
            if let Some(base_url) = api.base_url {
                config.api.base_url = normalize_base_url(&base_url);
            }
            if let Some(timeout_ms) = api.timeout_ms.filter(|ms| *ms > 0) {
                config.api.timeout_ms = timeout_ms;
            }
            if let Some(attempts) = api.retry_attempts {
                config.api.retry_attempts = attempts.max(1);
            }
        }
        if let Some(batch) = file.batch {
            if let Some(size) = batch.batch_size {
                config.batch.batch_size = size.max(1);
            }
            if let Some(delay_ms) = batch.delay_ms {
                config.batch.delay_ms = delay_ms;
            }
        }
        if let Some(cache) = file.cache {
            if let Some(ttl) = cache.ttl_minutes {
                config.cache.ttl_minutes = ttl;
            }
            if let Some(ttl) = cache.memory_ttl_minutes {
                config.cache.memory_ttl_minutes = ttl;
            }
        }
        if let Some(per_page) = file.items_per_page {
            config.items_per_page = per_page.max(1);
        }
        if let Some(debug) = file.debug {
            if let Some(v) = debug.debug_api_calls {
                config.debug.debug_api_calls = v;
            }
            if let Some(v) = debug.enable_api_logging {
                config.debug.enable_api_logging = v;
            }
        }

        config
    }

    /// Applies overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    ///
    /// Numeric values that fail to parse, or parse to zero, are ignored and
    /// the current value is kept.
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("API_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.api.base_url = normalize_base_url(&url);
        }
        if let Some(v) = parse_nonzero(&lookup, "API_TIMEOUT_MS") {
            self.api.timeout_ms = v;
        }
        if let Some(v) = parse_nonzero(&lookup, "RETRY_ATTEMPTS") {
            self.api.retry_attempts = v;
        }
        if let Some(v) = parse_nonzero(&lookup, "BATCH_SIZE") {
            self.batch.batch_size = v;
        }
        if let Some(v) = parse_nonzero(&lookup, "DELAY_MS") {
            self.batch.delay_ms = v;
        }
        if let Some(v) = parse_nonzero(&lookup, "CACHE_TTL_MINUTES") {
            self.cache.ttl_minutes = v;
        }
        if let Some(v) = parse_nonzero(&lookup, "MEMORY_CACHE_TTL_MINUTES") {
            self.cache.memory_ttl_minutes = v;
        }
        if let Some(v) = parse_nonzero(&lookup, "ITEMS_PER_PAGE") {
            self.items_per_page = v;
        }
        if let Some(v) = lookup("DEBUG_API_CALLS") {
            self.debug.debug_api_calls = parse_flag(&v);
        }
        if let Some(v) = lookup("ENABLE_API_LOGGING") {
            self.debug.enable_api_logging = parse_flag(&v);
        }

        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl AsRef<str>) -> Self {
        self.api.base_url = normalize_base_url(url.as_ref());
        self
    }
}

fn parse_nonzero<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr + Default + PartialEq,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v != T::default())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
