//! Benchmarks for PriorityCore and PriorityCache.
//!
//! Run with: `cargo bench --bench priority`

use std::hint::black_box;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use heapcache::policy::priority::{PriorityCache, PriorityCore};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const CAPACITY: usize = 4096;

fn random_priorities(n: usize, seed: u64) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..1_000_000)).collect()
}

fn filled_core(priorities: &[u64]) -> PriorityCore<u64, u64, u64> {
    let mut cache = PriorityCore::new(CAPACITY);
    for (key, &priority) in priorities.iter().enumerate().take(CAPACITY) {
        cache.add(key as u64, Arc::new(key as u64), priority);
    }
    cache
}

// ============================================================================
// Eviction churn (every add past capacity evicts one entry)
// ============================================================================

fn bench_add_eviction_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("priority_cache");
    let priorities = random_priorities(CAPACITY * 2, 7);
    group.throughput(Throughput::Elements(CAPACITY as u64));

    group.bench_function("add_eviction_churn", |b| {
        b.iter_batched(
            || filled_core(&priorities),
            |mut cache| {
                for (i, &priority) in priorities[CAPACITY..].iter().enumerate() {
                    let key = (CAPACITY + i) as u64;
                    cache.add(black_box(key), Arc::new(key), priority);
                }
                cache
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

// ============================================================================
// Batched vs one-by-one inserts
// ============================================================================

fn bench_add_many_vs_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("priority_batch");

    for batch in [64usize, 1024, CAPACITY] {
        let priorities = random_priorities(batch, 11);
        group.throughput(Throughput::Elements(batch as u64));

        group.bench_with_input(BenchmarkId::new("add_many", batch), &priorities, |b, priorities| {
            b.iter_batched(
                || PriorityCore::<u64, u64, u64>::new(CAPACITY),
                |mut cache| {
                    cache.add_many(
                        priorities
                            .iter()
                            .enumerate()
                            .map(|(k, &p)| (k as u64, Arc::new(k as u64), p)),
                    );
                    cache
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("add_loop", batch), &priorities, |b, priorities| {
            b.iter_batched(
                || PriorityCore::<u64, u64, u64>::new(CAPACITY),
                |mut cache| {
                    for (k, &p) in priorities.iter().enumerate() {
                        cache.add(k as u64, Arc::new(k as u64), p);
                    }
                    cache
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

// ============================================================================
// Reprioritization (update existing keys with new priorities)
// ============================================================================

fn bench_reprioritize(c: &mut Criterion) {
    let mut group = c.benchmark_group("priority_cache");
    let priorities = random_priorities(CAPACITY, 3);
    let updates = random_priorities(CAPACITY, 5);
    group.throughput(Throughput::Elements(CAPACITY as u64));

    group.bench_function("reprioritize", |b| {
        b.iter_batched(
            || filled_core(&priorities),
            |mut cache| {
                for (key, &priority) in updates.iter().enumerate() {
                    cache.add(key as u64, Arc::new(key as u64), black_box(priority));
                }
                cache
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

// ============================================================================
// Get hit latency (read lock only)
// ============================================================================

fn bench_get_hit_ns(c: &mut Criterion) {
    let priorities = random_priorities(CAPACITY, 13);
    let cache: PriorityCache<u64, u64, u64> = PriorityCache::new(CAPACITY);
    for (key, &priority) in priorities.iter().enumerate() {
        cache.add(key as u64, key as u64, priority);
    }

    c.bench_function("priority_get_hit_ns", |b| {
        b.iter(|| {
            for key in 0..CAPACITY as u64 {
                black_box(cache.get(&black_box(key)));
            }
        })
    });
}

// ============================================================================
// Concurrent readers with one writer
// ============================================================================

fn bench_concurrent_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("priority_concurrent");
    let readers = 4usize;
    let reads_per_thread = 10_000u64;
    group.throughput(Throughput::Elements(readers as u64 * reads_per_thread));

    group.bench_function("readers_with_writer", |b| {
        b.iter_custom(|iters| {
            let cache: PriorityCache<u64, u64, u64> = PriorityCache::new(CAPACITY);
            for key in 0..CAPACITY as u64 {
                cache.add(key, key, key);
            }

            let start = Instant::now();
            for _ in 0..iters {
                let writer = {
                    let cache = cache.clone();
                    thread::spawn(move || {
                        for i in 0..1_000u64 {
                            cache.add(CAPACITY as u64 + i, i, i);
                        }
                    })
                };
                let handles: Vec<_> = (0..readers)
                    .map(|_| {
                        let cache = cache.clone();
                        thread::spawn(move || {
                            for i in 0..reads_per_thread {
                                black_box(cache.get(&(i % CAPACITY as u64)));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    let _ = handle.join();
                }
                let _ = writer.join();
            }
            start.elapsed()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_add_eviction_churn,
    bench_add_many_vs_add,
    bench_reprioritize,
    bench_get_hit_ns,
    bench_concurrent_reads
);
criterion_main!(benches);
