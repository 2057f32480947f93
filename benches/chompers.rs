//! Chomper Benchmarks
//!
//! Measures the main parsing paths:
//!
//! | Group | Exercises |
//! |-------|-----------|
//! | csv | sequences, separators and line chunks |
//! | nested | balanced delimiter scanning |
//! | lists | `tie` recursion through alternation |
//! | batch | sequential vs. batch parsing of many inputs |
//!
//! Run with: cargo bench --bench chompers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fro::engine::parallel::parse_batch_parallel;
use fro::prelude::*;

// ============================================================================
// Test Data
// ============================================================================

mod data {
    pub fn csv(rows: usize) -> String {
        (0..rows)
            .map(|r| {
                let cells: Vec<String> = (0..8).map(|c| (r * 8 + c).to_string()).collect();
                format!("{}\n", cells.join(","))
            })
            .collect()
    }

    pub fn parens(depth: usize) -> String {
        format!("({}x{})", "(".repeat(depth), ")".repeat(depth))
    }

    pub fn nested_list(depth: usize) -> String {
        let mut out = String::from("1");
        for i in 0..depth {
            out = format!("[{},{},{}]", i, out, i);
        }
        out
    }
}

// ============================================================================
// Grammars
// ============================================================================

mod grammars {
    use fro::prelude::*;

    pub fn csv() -> Parser {
        let row = seq(natp()).separator("~,").build().append(r"\n");
        seq(row).build()
    }

    pub fn list() -> Parser {
        tie(|list| {
            let item = alt([intp(), list]);
            compose([
                regex(r"~\["),
                seq(item).separator("~,").build(),
                regex(r"~\]"),
            ])
            .get()
        })
    }
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv");
    let parser = grammars::csv();

    for rows in [10, 100, 1000] {
        let input = data::csv(rows);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("lines", rows), &input, |b, input| {
            b.iter(|| parser.parse_str(black_box(input)))
        });
    }

    group.finish();
}

fn bench_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested");
    let parser = nested(r"\(", r"\)");

    for depth in [10, 1000] {
        let input = data::parens(depth);
        group.bench_with_input(BenchmarkId::new("parens", depth), &input, |b, input| {
            b.iter(|| parser.parse_one(black_box(input)))
        });
    }

    group.finish();
}

fn bench_lists(c: &mut Criterion) {
    let mut group = c.benchmark_group("lists");
    let parser = grammars::list();

    for depth in [1, 10, 50] {
        let input = data::nested_list(depth);
        group.bench_with_input(BenchmarkId::new("tie", depth), &input, |b, input| {
            b.iter(|| parser.parse_one(black_box(input)))
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let parser = grammars::csv();
    let inputs: Vec<String> = (0..64).map(|_| data::csv(50)).collect();
    let borrowed: Vec<&str> = inputs.iter().map(String::as_str).collect();

    group.bench_function("sequential", |b| {
        b.iter(|| {
            borrowed
                .iter()
                .map(|input| parser.parse_str(black_box(input)))
                .collect::<Vec<_>>()
        })
    });

    group.bench_function("batch", |b| {
        b.iter(|| parse_batch_parallel(&parser, black_box(&borrowed)))
    });

    group.finish();
}

criterion_group!(benches, bench_csv, bench_nested, bench_lists, bench_batch);
criterion_main!(benches);
