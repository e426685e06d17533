//! Time-expiring in-memory cache.
//!
//! Entries are stamped on write and stay visible while their age is below
//! the cache's TTL. Expired entries are removed lazily on lookup; there is
//! no background sweeper and no size bound.

use crate::config::DebugFlags;
use crate::observability::CACHE_LOOKUPS_TOTAL;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tokio::time::Instant;
use tracing::instrument;

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

/// String-keyed cache whose entries expire after a fixed TTL.
///
/// # Thread Safety
///
/// Uses `RwLock` for interior mutability so one instance can be shared
/// across tasks. A poisoned lock is recovered rather than propagated; the
/// map holds plain values and stays consistent across a panic.
///
/// # Example
///
/// ```rust
/// use dexcache::MemoryCache;
/// use std::time::Duration;
///
/// let cache = MemoryCache::new("pokemon", Duration::from_secs(60));
/// cache.set("pokemon-25", "pikachu".to_string());
/// assert_eq!(cache.get("pokemon-25").as_deref(), Some("pikachu"));
/// assert!(cache.get("pokemon-26").is_none());
/// ```
#[derive(Debug)]
pub struct MemoryCache<T> {
    name: &'static str,
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
    debug: DebugFlags,
}

impl<T: Clone> MemoryCache<T> {
    /// Creates an empty cache. `name` labels log lines and metrics.
    #[must_use]
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
            ttl,
            debug: DebugFlags::none(),
        }
    }

    /// Enables per-operation debug logging.
    #[must_use]
    pub const fn with_debug(mut self, debug: DebugFlags) -> Self {
        self.debug = debug;
        self
    }

    /// Cache label.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Entry lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stores `value` under `key`, replacing any previous entry and
    /// restarting its lifetime.
    pub fn set(&self, key: impl Into<String>, value: T) {
        let key = key.into();
        if self.debug.debug_api_calls {
            tracing::debug!(cache = self.name, key = %key, "cache set");
        }
        let entry = CacheEntry {
            value,
            stored_at: Instant::now(),
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);
    }

    /// Returns a copy of the value under `key` if present and not expired.
    ///
    /// An expired entry is removed as a side effect.
    #[instrument(level = "trace", skip(self), fields(cache = self.name))]
    pub fn get(&self, key: &str) -> Option<T> {
        let lookup = {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            entries
                .get(key)
                .map(|entry| (entry.stored_at.elapsed() < self.ttl, entry.value.clone()))
        };

        match lookup {
            Some((true, value)) => {
                self.record("hit", key);
                Some(value)
            },
            Some((false, _)) => {
                self.evict_expired(key);
                self.record("expired", key);
                None
            },
            None => {
                self.record("miss", key);
                None
            },
        }
    }

    /// Whether a live entry exists under `key`.
    ///
    /// Same expiry rule as [`Self::get`] without copying the value. Not
    /// counted in the lookup metrics.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        let live = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map(|entry| entry.stored_at.elapsed() < self.ttl);

        match live {
            Some(true) => true,
            Some(false) => {
                self.evict_expired(key);
                false
            },
            None => false,
        }
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        if self.debug.debug_api_calls {
            tracing::debug!(cache = self.name, "cache cleared");
        }
    }

    /// Number of stored entries, including expired ones not yet evicted.
    #[must_use]
    pub fn size(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn evict_expired(&self, key: &str) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // A concurrent set may have refreshed the entry since the read.
        if entries
            .get(key)
            .is_some_and(|entry| entry.stored_at.elapsed() >= self.ttl)
        {
            entries.remove(key);
        }
    }

    fn record(&self, result: &'static str, key: &str) {
        metrics::counter!(
            CACHE_LOOKUPS_TOTAL,
            "cache" => self.name,
            "result" => result
        )
        .increment(1);
        if self.debug.debug_api_calls {
            tracing::debug!(cache = self.name, key = %key, result, "cache lookup");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache(ttl_secs: u64) -> MemoryCache<u32> {
        MemoryCache::new("test", Duration::from_secs(ttl_secs)).with_debug(DebugFlags::all())
    }

    #[test]
    fn test_set_then_get() {
        let cache = cache(60);
        cache.set("a", 1);
        assert_eq!(cache.get("a"), Some(1));
        assert!(cache.has("a"));
        assert!(!cache.has("b"));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_set_replaces_value() {
        let cache = cache(60);
        cache.set("a", 1);
        cache.set("a", 2);
        assert_eq!(cache.get("a"), Some(2));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_clear_removes_everything() {
        let cache = cache(60);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.clear();
        assert_eq!(cache.size(), 0);
        assert!(cache.get("a").is_none());
        // Idempotent.
        cache.clear();
        assert_eq!(cache.size(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = cache(10);
        cache.set("a", 1);

        tokio::time::advance(Duration::from_millis(9_999)).await;
        assert_eq!(cache.get("a"), Some(1));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(cache.get("a").is_none());
        assert_eq!(cache.size(), 0, "expired entry is evicted on lookup");
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_stays_until_looked_up() {
        let cache = cache(1);
        cache.set("a", 1);
        cache.set("b", 2);
        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(cache.size(), 2);
        assert!(!cache.has("a"));
        assert_eq!(cache.size(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_restarts_lifetime() {
        let cache = cache(10);
        cache.set("a", 1);
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.set("a", 2);
        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(cache.get("a"), Some(2));
    }

    /// Value that counts how often it is cloned.
    #[derive(Debug)]
    struct CloneCounter(Arc<AtomicUsize>);

    impl Clone for CloneCounter {
        fn clone(&self) -> Self {
            self.0.fetch_add(1, Ordering::SeqCst);
            Self(Arc::clone(&self.0))
        }
    }

    #[test]
    fn test_has_does_not_clone_value() {
        let clones = Arc::new(AtomicUsize::new(0));
        let cache = MemoryCache::new("clone_counter", Duration::from_secs(60));
        cache.set("k", CloneCounter(Arc::clone(&clones)));

        assert!(cache.has("k"));
        assert!(!cache.has("missing"));
        assert_eq!(clones.load(Ordering::SeqCst), 0);

        assert!(cache.get("k").is_some());
        assert_eq!(clones.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_has_evicts_expired_entry() {
        let cache = cache(5);
        cache.set("a", 1);
        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(cache.size(), 1);
        assert!(!cache.has("a"));
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let cache = cache(0);
        cache.set("a", 1);
        assert!(cache.get("a").is_none());
    }

    proptest! {
        #[test]
        fn prop_last_write_wins(writes in prop::collection::vec(("[a-c]", any::<u32>()), 1..20)) {
            let cache = MemoryCache::new("prop", Duration::from_secs(3600));
            let mut expected = HashMap::new();
            for (key, value) in &writes {
                cache.set(key.clone(), *value);
                expected.insert(key.clone(), *value);
            }
            prop_assert_eq!(cache.size(), expected.len());
            for (key, value) in expected {
                prop_assert_eq!(cache.get(&key), Some(value));
            }
        }
    }
}
