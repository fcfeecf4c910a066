//! Criterion benchmarks for the seating search.
//!
//! Uses synthetic familiarity matrices so timings reflect the annealing
//! loop rather than input handling.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use u_seating::matrix::FamiliarityMatrix;
use u_seating::sa::{total_familiarity, AnnealConfig, AnnealRunner, MultiRunConfig, MultiRunner};

fn synthetic_matrix(n: usize) -> FamiliarityMatrix {
    let guests = (0..n).map(|i| format!("guest{i}")).collect();
    FamiliarityMatrix::from_fn(guests, |i, j| ((i * 31 + j * 17) % 5 + 1) as f64)
        .expect("synthetic matrix is valid")
}

fn bench_objective(c: &mut Criterion) {
    let mut group = c.benchmark_group("total_familiarity");

    for &n in &[15usize, 100, 1000] {
        let matrix = synthetic_matrix(n);
        let arrangement = matrix.identity_arrangement();
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(matrix, arrangement),
            |b, (m, a)| b.iter(|| black_box(total_familiarity(black_box(m), black_box(a)))),
        );
    }
    group.finish();
}

fn bench_single_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("anneal_single_run");

    for &n in &[15usize, 50, 200] {
        let matrix = synthetic_matrix(n);
        let start = matrix.identity_arrangement();
        let config = AnnealConfig::default().with_alpha(0.99);
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(matrix, start, config),
            |b, (m, s, cfg)| {
                let mut rng = StdRng::seed_from_u64(42);
                b.iter(|| {
                    let out = AnnealRunner::run(black_box(m), black_box(s), cfg, &mut rng)
                        .expect("valid inputs");
                    black_box(out)
                })
            },
        );
    }
    group.finish();
}

fn bench_multi_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_run");
    group.sample_size(10);

    let matrix = synthetic_matrix(15);
    let start = matrix.identity_arrangement();
    let anneal = AnnealConfig::default();
    for &trials in &[100usize, 1000] {
        let multi = MultiRunConfig::default().with_trials(trials).with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(trials), &multi, |b, multi| {
            b.iter(|| {
                let result = MultiRunner::run(black_box(&matrix), &start, &anneal, multi)
                    .expect("valid inputs");
                black_box(result)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_objective, bench_single_run, bench_multi_run);
criterion_main!(benches);
