//! Metric names.
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! embedding application installs a recorder.

/// Cache lookups, labelled `cache` and `result` (`hit`, `miss`, `expired`).
pub const CACHE_LOOKUPS_TOTAL: &str = "dexcache_cache_lookups_total";
/// Request attempts, labelled `outcome` (`success`, `failure`).
pub const HTTP_ATTEMPTS_TOTAL: &str = "dexcache_http_attempts_total";
/// Duration of each request attempt in milliseconds.
pub const HTTP_REQUEST_DURATION_MS: &str = "dexcache_http_request_duration_ms";
/// Range loads, labelled `strategy` (`list`, `id_fallback`).
pub const REGION_FETCH_TOTAL: &str = "dexcache_region_fetch_total";

/// Registers descriptions for every metric with the installed recorder.
pub fn describe() {
    metrics::describe_counter!(CACHE_LOOKUPS_TOTAL, "Cache lookups by cache and result");
    metrics::describe_counter!(HTTP_ATTEMPTS_TOTAL, "HTTP request attempts by outcome");
    metrics::describe_histogram!(
        HTTP_REQUEST_DURATION_MS,
        metrics::Unit::Milliseconds,
        "Duration of each HTTP request attempt"
    );
    metrics::describe_counter!(REGION_FETCH_TOTAL, "Range loads by strategy");
}
