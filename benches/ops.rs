//! Micro-operation benchmarks for IndexedHeap.
//!
//! Run with: `cargo bench --bench ops`
//!
//! Measures per-operation cost of the heap primitives the caches are built
//! on: push, pop, fix after an in-place change, arbitrary removal, and
//! bulk append + rebuild.

use std::hint::black_box;
use std::time::Instant;

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use heapcache::ds::{IndexedHeap, SlotId};
use heapcache::traits::Ascending;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const N: usize = 16_384;

fn random_values(seed: u64) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..N).map(|_| rng.r#gen()).collect()
}

fn filled(values: &[u64]) -> (IndexedHeap<u64, Ascending>, Vec<SlotId>) {
    let mut heap = IndexedHeap::with_capacity(values.len(), Ascending);
    let ids = values.iter().map(|&v| heap.push(v)).collect();
    (heap, ids)
}

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexed_heap");
    let values = random_values(1);
    group.throughput(Throughput::Elements(N as u64));

    group.bench_function("push", |b| {
        b.iter_batched(
            || IndexedHeap::with_capacity(N, Ascending),
            |mut heap| {
                for &v in &values {
                    heap.push(black_box(v));
                }
                heap
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("pop", |b| {
        b.iter_batched(
            || filled(&values).0,
            |mut heap| {
                while let Some(v) = heap.pop() {
                    black_box(v);
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_fix_and_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexed_heap");
    let values = random_values(2);
    let updates = random_values(3);
    group.throughput(Throughput::Elements(N as u64));

    group.bench_function("fix", |b| {
        b.iter_batched(
            || filled(&values),
            |(mut heap, ids)| {
                for (&id, &v) in ids.iter().zip(&updates) {
                    if let Some(slot) = heap.get_mut(id) {
                        *slot = v;
                    }
                    heap.fix(id);
                }
                heap
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("remove_arbitrary", |b| {
        b.iter_batched(
            || filled(&values),
            |(mut heap, ids)| {
                for &id in ids.iter().rev() {
                    black_box(heap.remove(id));
                }
                heap
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_rebuild_ns(c: &mut Criterion) {
    let values = random_values(4);

    c.bench_function("indexed_heap_rebuild_ns", |b| {
        b.iter_custom(|iters| {
            let mut total = std::time::Duration::ZERO;
            for _ in 0..iters {
                let mut heap = IndexedHeap::with_capacity(N, Ascending);
                for &v in &values {
                    heap.push_unordered(v);
                }
                let start = Instant::now();
                heap.rebuild();
                total += start.elapsed();
                black_box(heap.peek());
            }
            total
        })
    });
}

criterion_group!(benches, bench_push_pop, bench_fix_and_remove, bench_rebuild_ns);
criterion_main!(benches);
