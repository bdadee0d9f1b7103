//! Throughput benchmarks across minimum degrees.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use blocktree::BTree;

const KEY_COUNT: usize = 1_000;
const DEGREES: [usize; 4] = [2, 4, 8, 16];

/// Deterministic permutation of `0..KEY_COUNT`.
///
/// 7919 is prime and coprime to the key count, so multiplication
/// modulo the count visits every key exactly once.
fn permuted_keys() -> Vec<usize> {
    (0..KEY_COUNT).map(|i| (i * 7919) % KEY_COUNT).collect()
}

fn full_tree(t: usize) -> BTree<usize> {
    let mut tree = BTree::new(t);
    for key in permuted_keys() {
        tree.insert(key);
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for t in DEGREES {
        group.bench_with_input(BenchmarkId::new("sequential", t), &t, |b, &t| {
            b.iter(|| {
                let mut tree: BTree<usize> = BTree::new(t);
                for key in 0..KEY_COUNT {
                    tree.insert(black_box(key));
                }
                tree
            });
        });

        group.bench_with_input(BenchmarkId::new("shuffled", t), &t, |b, &t| {
            let keys = permuted_keys();
            b.iter(|| {
                let mut tree: BTree<usize> = BTree::new(t);
                for &key in &keys {
                    tree.insert(black_box(key));
                }
                tree
            });
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for t in DEGREES {
        let tree = full_tree(t);
        group.bench_with_input(BenchmarkId::new("hit", t), &tree, |b, tree| {
            b.iter(|| {
                let mut found = 0usize;
                for key in 0..KEY_COUNT {
                    if tree.contains(black_box(&key)) {
                        found += 1;
                    }
                }
                found
            });
        });
    }

    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete");

    for t in DEGREES {
        let full = full_tree(t);
        group.bench_with_input(BenchmarkId::new("drain", t), &full, |b, full| {
            b.iter_batched(
                || full.clone(),
                |mut tree| {
                    for key in 0..KEY_COUNT {
                        tree.delete(black_box(&key)).unwrap();
                    }
                    tree
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_search, bench_delete);
criterion_main!(benches);
