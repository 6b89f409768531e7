//! Planner Benchmarks
//!
//! Benchmarks for the planning hot paths:
//! - Transition sampling
//! - RTDP Bellman backup and full training passes
//! - MCTS search at increasing rollout budgets
//!
//! ## Hot Paths Identified
//! 1. sample() - Called for every simulated step in both planners
//! 2. Rtdp::bellman_backup() - Called once per trajectory step
//! 3. Mcts::search() - Called for every decision of an MCTS-driven episode

#![allow(clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mdp_core::{sample, Cell, GridConfig, Gridworld, MdpModel, Move};
use mdp_planners::{EpsilonSchedule, LinearDecay, Mcts, MctsConfig, Rtdp, RtdpConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ============================================================================
// Test Data Generators
// ============================================================================

fn create_grid(size: usize) -> Gridworld {
    let config = GridConfig {
        width: size,
        height: size,
        goal: Cell::new(size - 1, size - 1),
        walls: Vec::new(),
        ..GridConfig::default()
    };
    Gridworld::new(config).expect("benchmark grid is valid")
}

fn training_config(episodes: u64) -> RtdpConfig {
    RtdpConfig {
        episodes,
        epsilon_schedule: EpsilonSchedule::from(LinearDecay::new(0.5, 0.05, episodes)),
        ..RtdpConfig::default()
    }
}

// ============================================================================
// Sampling Benchmarks
// ============================================================================

fn bench_sample(c: &mut Criterion) {
    let grid = Gridworld::new(GridConfig::default()).expect("default grid is valid");
    let mut rng = StdRng::seed_from_u64(0);
    let state = Cell::new(2, 2);

    c.bench_function("sampler/gridworld_step", |b| {
        b.iter(|| sample(&grid, black_box(&state), &Move::Right, &mut rng))
    });
}

// ============================================================================
// RTDP Benchmarks
// ============================================================================

fn bench_bellman_backup(c: &mut Criterion) {
    let grid = create_grid(5);
    let mut agent = Rtdp::with_seed(&grid, training_config(20), 0);
    let _ = agent.run();
    let state = grid.initial_state();

    c.bench_function("rtdp/bellman_backup", |b| {
        b.iter(|| agent.bellman_backup(black_box(&state)))
    });
}

fn bench_rtdp_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtdp/training");
    for size in [5, 10, 20] {
        let grid = create_grid(size);
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &grid, |b, grid| {
            b.iter(|| {
                let mut agent = Rtdp::with_seed(grid, training_config(20), 0);
                let _ = agent.run();
                agent.values().len()
            })
        });
    }
    group.finish();
}

// ============================================================================
// MCTS Benchmarks
// ============================================================================

fn bench_mcts_search(c: &mut Criterion) {
    let grid = create_grid(5);
    let start = grid.initial_state();

    let mut group = c.benchmark_group("mcts/search");
    for rollouts in [50, 200, 500] {
        let config = MctsConfig {
            rollouts_per_search: rollouts,
            max_depth: 50,
            ..MctsConfig::default()
        };
        group.throughput(Throughput::Elements(rollouts));
        group.bench_with_input(
            BenchmarkId::from_parameter(rollouts),
            &config,
            |b, config| {
                let mut agent = Mcts::with_seed(&grid, config.clone(), 0);
                b.iter(|| agent.search(black_box(&start)))
            },
        );
    }
    group.finish();
}

criterion_group!(
    name = sampler_benchmarks;
    config = Criterion::default();
    targets = bench_sample,
);

criterion_group!(
    name = rtdp_benchmarks;
    config = Criterion::default();
    targets =
        bench_bellman_backup,
        bench_rtdp_training,
);

criterion_group!(
    name = mcts_benchmarks;
    config = Criterion::default();
    targets = bench_mcts_search,
);

criterion_main!(sampler_benchmarks, rtdp_benchmarks, mcts_benchmarks);
