//! Benchmarks for galaxy generation and parameter handling.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

use galaxy::{generate, GalaxyParams, ParameterSet};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group.sample_size(20);

    for count in [1_000u32, 100_000, 1_000_000] {
        let params = GalaxyParams {
            count,
            ..GalaxyParams::default()
        };
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("particles", count), &params, |b, params| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| black_box(generate(params, &mut rng)))
        });
    }

    group.finish();
}

fn bench_branches(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_branches");

    for branches in [1u32, 3, 10] {
        let params = GalaxyParams {
            branches,
            ..GalaxyParams::default()
        };
        group.bench_with_input(BenchmarkId::new("branches", branches), &params, |b, params| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| black_box(generate(params, &mut rng)))
        });
    }

    group.finish();
}

fn bench_clamp(c: &mut Criterion) {
    c.bench_function("clamp_to_ranges", |b| {
        let params = GalaxyParams {
            count: 123_456_789,
            size: 0.01234,
            randomness: 5.0,
            ..GalaxyParams::default()
        };
        b.iter(|| {
            let mut p = black_box(params);
            p.clamp_to_ranges();
            black_box(p)
        })
    });
}

criterion_group!(benches, bench_generate, bench_branches, bench_clamp);
criterion_main!(benches);
