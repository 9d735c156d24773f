//! Benchmarks for the assigners.
//!
//! Measures:
//! - Random assignment at different population sizes
//! - Greedy assignment against a populated matrix
//! - Full multi-round greedy runs

use breakout_core::{Algorithm, CapacityPlan, CoOccurrenceMatrix, ParticipantId};
use breakout_engine::{Engine, EngineConfig, GreedyAssigner, RandomAssigner, Request};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::SmallRng;
use rand::SeedableRng;

const SIZES: [(usize, usize); 4] = [(12, 3), (60, 10), (200, 20), (1000, 50)];

/// Benchmark a single random round
fn bench_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_assign");

    for (n, r) in SIZES {
        let plan = CapacityPlan::new(n, r).unwrap();
        let roster = ParticipantId::roster(n);
        let mut rng = SmallRng::seed_from_u64(1);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("participants", n), &plan, |b, plan| {
            b.iter(|| RandomAssigner.assign(black_box(&roster), plan, &mut rng).unwrap())
        });
    }
    group.finish();
}

/// Benchmark a single greedy round after five random rounds of history
fn bench_greedy(c: &mut Criterion) {
    let mut group = c.benchmark_group("greedy_assign");

    for (n, r) in SIZES {
        let plan = CapacityPlan::new(n, r).unwrap();
        let roster = ParticipantId::roster(n);
        let mut rng = SmallRng::seed_from_u64(2);
        let mut matrix = CoOccurrenceMatrix::new();
        for _ in 0..5 {
            matrix.record(&RandomAssigner.assign(&roster, &plan, &mut rng).unwrap());
        }

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("participants", n), &plan, |b, plan| {
            b.iter(|| GreedyAssigner.assign(black_box(&roster), plan, &matrix).unwrap())
        });
    }
    group.finish();
}

/// Benchmark a ten-round greedy run end to end
fn bench_greedy_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("greedy_run");
    let engine = Engine::new(EngineConfig::default().with_seed(3));

    for (n, r) in SIZES {
        let request = Request::new(n, r, 10, Algorithm::Greedy);
        group.throughput(Throughput::Elements(10));
        group.bench_with_input(BenchmarkId::new("participants", n), &request, |b, req| {
            b.iter(|| engine.run(black_box(req)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_random, bench_greedy, bench_greedy_run);
criterion_main!(benches);
