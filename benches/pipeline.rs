//! Benchmarks for the format cycle hot paths
//!
//! Run with: cargo bench pipeline

use playground::codec;
use playground::formatter::{self, reindent, Formatter};
use playground::session::DEFAULT_SOURCE;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

/// `lines` lines of nested Ruby-like source
fn sample_source(lines: usize) -> String {
    let mut source = String::with_capacity(lines * 16);
    let mut written = 0;
    while written < lines {
        source.push_str("class Foo\ndef bar(x)\nif x\nputs x\nelse\nnil\nend\nend\nend\n");
        written += 9;
    }
    source
}

// ============================================================================
// Codec
// ============================================================================

#[divan::bench(args = [100, 1_000, 10_000])]
fn encode(bencher: divan::Bencher, lines: usize) {
    let source = sample_source(lines);
    bencher.bench(|| codec::encode(divan::black_box(&source)));
}

#[divan::bench(args = [100, 1_000, 10_000])]
fn decode(bencher: divan::Bencher, lines: usize) {
    let token = codec::encode(&sample_source(lines));
    bencher.bench(|| codec::decode(divan::black_box(&token)));
}

// ============================================================================
// Formatter
// ============================================================================

#[divan::bench(args = [100, 1_000, 10_000])]
fn reindent_source(bencher: divan::Bencher, lines: usize) {
    let source = sample_source(lines);
    bencher.bench(|| reindent::reindent(divan::black_box(&source)));
}

#[divan::bench]
fn builtin_engine_through_ffi(bencher: divan::Bencher) {
    let formatter = formatter::from_config(&Default::default());
    bencher.bench_local(|| formatter.format(divan::black_box(DEFAULT_SOURCE)));
}
