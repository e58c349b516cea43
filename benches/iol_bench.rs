//! Hot-path benchmarks for the indexed ordered list.
//!
//! Run with: `cargo bench --bench iol_bench`
//!
//! Grounded on the teacher's `benches/hot_paths.rs` structure
//! (`criterion_group!`/`criterion_main!`, `black_box`, per-size
//! `bench_function` loops) applied to this crate's hot paths: insert,
//! rank lookup, and rank-ordered positional access.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use ezset::config::IolConfig;
use ezset::iol::IndexedOrderedList;
use ezset::member::Member;
use ezset::rng::SeededLevelRng;
use ezset::score::Score;

fn populated(size: usize) -> IndexedOrderedList {
    let mut list = IndexedOrderedList::with_rng(
        IolConfig::default(),
        Box::new(SeededLevelRng::new(1)),
    );
    for i in 0..size {
        list.insert(Member::from_str(&format!("member-{i:08}")), Score::from_i64(i as i64));
    }
    list
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    group.throughput(Throughput::Elements(1));

    for size in [1_000usize, 10_000, 100_000] {
        group.bench_function(format!("into_{size}"), |b| {
            b.iter_batched(
                || populated(size),
                |mut list| {
                    list.insert(black_box(Member::from_str("bench-member")), black_box(Score::from_i64(42)));
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_get_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_rank");
    group.throughput(Throughput::Elements(1));

    for size in [1_000usize, 10_000, 100_000] {
        let list = populated(size);
        let mid = (size / 2) as i64;
        let member = Member::from_str(&format!("member-{:08}", size / 2));
        let score = Score::from_i64(mid);
        group.bench_function(format!("in_{size}"), |b| {
            b.iter(|| list.get_rank(black_box(&member), black_box(&score)))
        });
    }
    group.finish();
}

fn bench_get_by_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_by_rank");
    group.throughput(Throughput::Elements(1));

    for size in [1_000usize, 10_000, 100_000] {
        let list = populated(size);
        let rank = size / 2;
        group.bench_function(format!("in_{size}"), |b| {
            b.iter(|| list.get_by_rank(black_box(rank)))
        });
    }
    group.finish();
}

fn bench_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("range");
    group.throughput(Throughput::Elements(100));

    for size in [1_000usize, 10_000, 100_000] {
        let list = populated(size);
        let start = (size / 2) as i64;
        group.bench_function(format!("100_from_mid_of_{size}"), |b| {
            b.iter(|| list.range(black_box(start), black_box(start + 99), false))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert, bench_get_rank, bench_get_by_rank, bench_range);
criterion_main!(benches);
