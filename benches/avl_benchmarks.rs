use std::hint::black_box;

use avldb::{AvlTree, IndexedDatabase, Record};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn shuffled_values(
    n: usize,
    seed: u64,
) -> Vec<i64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut values: Vec<i64> = (0..n as i64).collect();
    values.shuffle(&mut rng);
    values
}

fn build_tree(values: &[i64]) -> AvlTree {
    values.iter().map(|v| Record::new("", *v)).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("avl_insert");

    for &n in &SIZES {
        group.throughput(Throughput::Elements(n as u64));

        let random = shuffled_values(n, 42);
        group.bench_with_input(BenchmarkId::new("random", n), &random, |b, values| {
            b.iter(|| black_box(build_tree(values)))
        });

        let ascending: Vec<i64> = (0..n as i64).collect();
        group.bench_with_input(BenchmarkId::new("ascending", n), &ascending, |b, values| {
            b.iter(|| black_box(build_tree(values)))
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("avl_search");

    for &n in &SIZES {
        let values = shuffled_values(n, 7);
        let tree = build_tree(&values);

        group.bench_function(BenchmarkId::new("hit", n), |b| {
            let mut i = 0;
            b.iter(|| {
                i = (i + 1) % values.len();
                black_box(tree.search(values[i]))
            })
        });

        group.bench_function(BenchmarkId::new("miss", n), |b| {
            b.iter(|| black_box(tree.search(-1)))
        });
    }

    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("avl_delete");

    for &n in &SIZES[..2] {
        let values = shuffled_values(n, 11);
        let tree = build_tree(&values);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::new("drain", n), |b| {
            b.iter_batched(
                || tree.clone(),
                |mut tree| {
                    for v in &values {
                        black_box(tree.delete(*v));
                    }
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_range_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_query");
    let mut db = IndexedDatabase::new();
    db.extend(
        shuffled_values(100_000, 3)
            .into_iter()
            .map(|v| Record::new("", v)),
    );

    for &width in &[10i64, 1_000, 50_000] {
        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &w| {
            b.iter(|| black_box(db.range_query(25_000, 25_000 + w - 1).len()))
        });
    }

    group.finish();
}

fn bench_height_check(c: &mut Criterion) {
    let db = {
        let mut db = IndexedDatabase::new();
        db.extend((0..100_000).map(|v| Record::new("", v)));
        db
    };

    c.bench_function("tree_height full traversal 100k", |b| {
        b.iter(|| black_box(db.tree_height()))
    });
    c.bench_function("cached height 100k", |b| {
        b.iter(|| black_box(db.index().height()))
    });
}

criterion_group!(
    benches,
    bench_insert,
    bench_search,
    bench_delete,
    bench_range_query,
    bench_height_check
);

criterion_main!(benches);
