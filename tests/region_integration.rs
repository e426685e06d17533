//! End-to-end range loading against a scripted transport.
//!
//! Covers both load paths, partial failure, progress reporting and cache
//! reuse without touching the network.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use dexcache::http::{Scripted, ScriptedTransport};
use dexcache::models::get_region_by_id;
use dexcache::{
    BatchConfig, DexConfig, FetchStrategy, PokeApiClient, Pokemon, ProgressState, RegionFetcher,
    SharedProgress,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const BASE: &str = "https://pokeapi.test/api/v2";

// ============================================================================
// Helpers
// ============================================================================

fn config(retry_attempts: u32, batch_size: usize, delay_ms: u64) -> DexConfig {
    let mut config = DexConfig::default().with_base_url(BASE);
    config.api.retry_attempts = retry_attempts;
    config.api.timeout_ms = 2_000;
    config.batch = BatchConfig {
        batch_size,
        delay_ms,
    };
    config
}

fn fetcher(transport: &Arc<ScriptedTransport>, config: &DexConfig) -> RegionFetcher {
    let client = PokeApiClient::with_transport(transport.clone(), config);
    RegionFetcher::new(Arc::new(client), config.batch.clone())
}

fn record_url(id: u32) -> String {
    format!("{BASE}/pokemon/{id}")
}

fn list_url(limit: u32, offset: u32) -> String {
    format!("{BASE}/pokemon?limit={limit}&offset={offset}")
}

fn record_body(id: u32) -> String {
    format!(
        r#"{{
            "id": {id},
            "name": "mon-{id}",
            "height": 10,
            "weight": 100,
            "types": [
                {{"slot": 2, "type": {{"name": "poison", "url": ""}}}},
                {{"slot": 1, "type": {{"name": "grass", "url": ""}}}}
            ],
            "stats": [{{"base_stat": 45, "stat": {{"name": "hp", "url": ""}}}}]
        }}"#
    )
}

fn serve_records(transport: &ScriptedTransport, ids: impl IntoIterator<Item = u32>) {
    for id in ids {
        transport.respond(&record_url(id), 200, record_body(id));
    }
}

fn serve_list(transport: &ScriptedTransport, start: u32, end: u32) {
    let results: Vec<String> = (start..=end)
        .rev()
        .map(|id| format!(r#"{{"name":"mon-{id}","url":"{BASE}/pokemon/{id}/"}}"#))
        .collect();
    transport.respond(
        &list_url(end - start + 1, start - 1),
        200,
        format!(r#"{{"count":1025,"results":[{}]}}"#, results.join(",")),
    );
}

fn ids(pokemon: &[Pokemon]) -> Vec<u32> {
    pokemon.iter().map(|p| p.id).collect()
}

#[derive(Default)]
struct Recorder(Mutex<Vec<(usize, usize)>>);

impl Recorder {
    fn sink(&self) -> impl Fn(usize, usize) + Send + Sync + '_ {
        |current, total| self.0.lock().unwrap().push((current, total))
    }

    fn calls(&self) -> Vec<(usize, usize)> {
        self.0.lock().unwrap().clone()
    }
}

// ============================================================================
// Primary path
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_primary_path_returns_sorted_records() {
    let transport = Arc::new(ScriptedTransport::new());
    serve_list(&transport, 1, 12);
    serve_records(&transport, 1..=12);
    let fetcher = fetcher(&transport, &config(3, 5, 150));

    let recorder = Recorder::default();
    let sink = recorder.sink();
    let report = fetcher.fetch_range_report(1, 12, Some(&sink)).await;

    assert_eq!(report.strategy, Some(FetchStrategy::List));
    assert_eq!(ids(&report.pokemon), (1..=12).collect::<Vec<_>>());
    assert_eq!(report.pokemon[0].types, vec!["grass", "poison"]);
    assert_eq!(transport.calls(&list_url(12, 0)), 1);

    let progress = recorder.calls();
    assert_eq!(progress.first(), Some(&(0, 12)));
    assert_eq!(progress.last(), Some(&(12, 12)));
    assert_eq!(progress.len(), 4, "initial report plus one per batch");
}

#[tokio::test(start_paused = true)]
async fn test_batches_bound_concurrency() {
    let transport = Arc::new(ScriptedTransport::new().with_latency(Duration::from_millis(20)));
    serve_list(&transport, 1, 25);
    serve_records(&transport, 1..=25);
    let fetcher = fetcher(&transport, &config(3, 10, 150));

    let pokemon = fetcher.fetch_range(1, 25, None).await;

    assert_eq!(pokemon.len(), 25);
    assert_eq!(transport.max_in_flight(), 10);
}

// ============================================================================
// Fallback path
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_fallback_when_list_endpoint_fails() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.respond(&list_url(6, 0), 500, "");
    serve_records(&transport, 1..=6);
    let fetcher = fetcher(&transport, &config(2, 4, 150));

    let recorder = Recorder::default();
    let sink = recorder.sink();
    let report = fetcher.fetch_range_report(1, 6, Some(&sink)).await;

    assert_eq!(report.strategy, Some(FetchStrategy::IdFallback));
    assert_eq!(ids(&report.pokemon), vec![1, 2, 3, 4, 5, 6]);
    // The list call is retried by the executor but never re-attempted by the fetcher.
    assert_eq!(transport.calls(&list_url(6, 0)), 2);
    assert_eq!(recorder.calls(), vec![(4, 6), (6, 6)]);
}

#[tokio::test(start_paused = true)]
async fn test_fallback_when_list_is_malformed() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.respond(&list_url(3, 150), 200, "<html>maintenance</html>");
    serve_records(&transport, 151..=153);
    let fetcher = fetcher(&transport, &config(1, 10, 0));

    let report = fetcher.fetch_range_report(151, 153, None).await;
    assert_eq!(report.strategy, Some(FetchStrategy::IdFallback));
    assert_eq!(ids(&report.pokemon), vec![151, 152, 153]);
}

// ============================================================================
// Partial failure
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_permanently_failing_record_is_dropped() {
    let transport = Arc::new(ScriptedTransport::new());
    serve_list(&transport, 1, 3);
    serve_records(&transport, [1, 3]);
    transport.respond(&record_url(2), 503, "");
    let fetcher = fetcher(&transport, &config(3, 10, 150));

    let recorder = Recorder::default();
    let sink = recorder.sink();
    let report = fetcher.fetch_range_report(1, 3, Some(&sink)).await;

    assert_eq!(ids(&report.pokemon), vec![1, 3]);
    assert_eq!(report.failed_ids, vec![2]);
    assert!(!report.is_complete());
    assert_eq!(transport.calls(&record_url(2)), 3);
    assert_eq!(recorder.calls().last(), Some(&(2, 3)));
}

#[tokio::test(start_paused = true)]
async fn test_hanging_record_times_out_and_is_dropped() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.respond(&list_url(3, 0), 404, "");
    serve_records(&transport, [1, 2]);
    transport.hang(&record_url(3));
    let fetcher = fetcher(&transport, &config(1, 10, 0));

    let start = tokio::time::Instant::now();
    let pokemon = fetcher.fetch_range(1, 3, None).await;

    assert_eq!(ids(&pokemon), vec![1, 2]);
    assert_eq!(start.elapsed(), Duration::from_millis(2_000));
    assert_eq!(transport.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_everything_failing_yields_empty_result() {
    let transport = Arc::new(ScriptedTransport::new());
    let fetcher = fetcher(&transport, &config(1, 10, 0));

    let report = fetcher.fetch_range_report(1, 4, None).await;
    assert!(report.pokemon.is_empty());
    assert_eq!(report.failed_ids, vec![1, 2, 3, 4]);
    assert_eq!(report.requested, 4);
}

#[tokio::test(start_paused = true)]
async fn test_transient_record_failure_recovers_within_retries() {
    let transport = Arc::new(ScriptedTransport::new());
    serve_list(&transport, 1, 2);
    serve_records(&transport, 1..=2);
    transport.push(&record_url(2), Scripted::Fail("reset".to_string()));
    let fetcher = fetcher(&transport, &config(3, 10, 0));

    let pokemon = fetcher.fetch_range(1, 2, None).await;
    assert_eq!(ids(&pokemon), vec![1, 2]);
    assert_eq!(transport.calls(&record_url(2)), 2);
}

// ============================================================================
// Caching and progress state
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_overlapping_ranges_reuse_record_cache() {
    let transport = Arc::new(ScriptedTransport::new());
    serve_list(&transport, 1, 4);
    serve_list(&transport, 3, 6);
    serve_records(&transport, 1..=6);
    let fetcher = fetcher(&transport, &config(1, 10, 0));

    fetcher.fetch_range(1, 4, None).await;
    fetcher.fetch_range(3, 6, None).await;

    for id in 1..=6 {
        assert_eq!(transport.calls(&record_url(id)), 1, "id {id}");
    }
    let caches = fetcher.client().caches();
    assert!(caches.regions.has("region-1-4"));
    assert!(caches.regions.has("region-3-6"));
}

#[tokio::test(start_paused = true)]
async fn test_region_cache_expires_with_configured_ttl() {
    let transport = Arc::new(ScriptedTransport::new());
    let region = get_region_by_id("kanto").unwrap();
    serve_list(&transport, region.start_id, region.end_id);
    serve_records(&transport, region.start_id..=region.end_id);

    let mut config = config(1, 50, 0);
    config.cache.ttl_minutes = 60;
    config.cache.memory_ttl_minutes = 30;
    let fetcher = fetcher(&transport, &config);

    let progress = SharedProgress::new();
    let kanto = fetcher.fetch_region(region, Some(&progress)).await;
    assert_eq!(kanto.len(), 151);
    assert_eq!(progress.snapshot(), ProgressState { current: 151, total: 151 });
    progress.reset();

    tokio::time::advance(Duration::from_secs(45 * 60)).await;
    let calls = transport.total_calls();
    assert_eq!(fetcher.fetch_region(region, Some(&progress)).await.len(), 151);
    assert_eq!(transport.total_calls(), calls, "region result still cached");
    assert!(progress.snapshot().is_complete());

    tokio::time::advance(Duration::from_secs(16 * 60)).await;
    assert_eq!(fetcher.fetch_region(region, None).await.len(), 151);
    assert!(transport.total_calls() > calls, "expired region result refetched");
}
