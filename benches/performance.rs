//! Performance benchmarks for bangs.
//!
//! Run with: cargo bench
//!
//! Target performance:
//! - Resolution: < 10µs for typical queries
//! - Worst case (2000+ character query): < 1ms

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use bangs::core::{encode_component, BangTable};

/// Benchmark resolution across the different rules.
fn bench_resolve(c: &mut Criterion) {
    let table = BangTable::builtin();

    let queries = [
        ("prefix", "!g javascript tutorial"),
        ("suffix", "machine learning w!"),
        ("unknown_bang", "!unknown search term"),
        ("plain", "regular search query"),
        ("path", "!ghr rust-lang/rust"),
    ];

    let mut group = c.benchmark_group("resolve");

    for (name, query) in queries {
        group.bench_with_input(BenchmarkId::from_parameter(name), &query, |b, query| {
            b.iter(|| black_box(table.resolve(black_box(query), None)))
        });
    }

    group.finish();
}

/// Benchmark the length guard with oversized input.
fn bench_long_queries(c: &mut Criterion) {
    let table = BangTable::builtin();
    let plain = "a".repeat(2500);
    let suffix = format!("{} w!", "word ".repeat(400));

    let mut group = c.benchmark_group("long_query");

    group.bench_function("plain_2500", |b| {
        b.iter(|| black_box(table.resolve(black_box(&plain), None)))
    });

    group.bench_function("suffix_2000", |b| {
        b.iter(|| black_box(table.resolve(black_box(&suffix), None)))
    });

    group.finish();
}

/// Benchmark percent-encoding.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    let inputs = [
        ("ascii", "hello world"),
        ("reserved", "a&b=c/d?e!f(g)"),
        ("unicode", "smörgåsbord 寿司 🦀"),
    ];

    for (name, input) in inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, input| {
            b.iter(|| black_box(encode_component(black_box(input))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_long_queries, bench_encode);

criterion_main!(benches);
