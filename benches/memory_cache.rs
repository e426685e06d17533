//! Benchmarks for the memory cache and model decoding.
//!
//! Benchmark targets:
//! - Cache hit: <1us
//! - Cache miss: <1us
//! - Record decode + normalize: <50us

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use dexcache::MemoryCache;
use dexcache::models::{Pokemon, PokemonApi};
use std::hint::black_box;
use std::time::Duration;

const RECORD: &str = r#"{
    "id": 6,
    "name": "charizard",
    "height": 17,
    "weight": 905,
    "types": [
        {"slot": 1, "type": {"name": "fire", "url": ""}},
        {"slot": 2, "type": {"name": "flying", "url": ""}}
    ],
    "stats": [
        {"base_stat": 78, "stat": {"name": "hp", "url": ""}},
        {"base_stat": 84, "stat": {"name": "attack", "url": ""}},
        {"base_stat": 78, "stat": {"name": "defense", "url": ""}},
        {"base_stat": 109, "stat": {"name": "special-attack", "url": ""}},
        {"base_stat": 85, "stat": {"name": "special-defense", "url": ""}},
        {"base_stat": 100, "stat": {"name": "speed", "url": ""}}
    ]
}"#;

fn bench_cache_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory_cache");
    group.measurement_time(Duration::from_secs(5));

    for size in [100_usize, 1_000, 10_000] {
        let cache = MemoryCache::new("bench", Duration::from_secs(3600));
        for id in 0..size {
            cache.set(format!("pokemon-{id}"), id);
        }
        group.throughput(Throughput::Elements(1));

        group.bench_with_input(BenchmarkId::new("hit", size), &size, |b, &size| {
            let key = format!("pokemon-{}", size / 2);
            b.iter(|| cache.get(black_box(&key)));
        });

        group.bench_with_input(BenchmarkId::new("miss", size), &size, |b, _| {
            b.iter(|| cache.get(black_box("pokemon-missing")));
        });
    }

    group.bench_function("set", |b| {
        let cache = MemoryCache::new("bench", Duration::from_secs(3600));
        let mut id = 0_u64;
        b.iter(|| {
            id = (id + 1) % 1_000;
            cache.set(format!("pokemon-{id}"), black_box(id));
        });
    });

    group.finish();
}

fn bench_record_decode(c: &mut Criterion) {
    c.bench_function("decode_record", |b| {
        b.iter(|| {
            let api: PokemonApi =
                serde_json::from_str(black_box(RECORD)).expect("decode failed");
            Pokemon::from(api)
        });
    });
}

criterion_group!(benches, bench_cache_lookups, bench_record_decode);
criterion_main!(benches);
