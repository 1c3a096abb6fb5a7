//! Criterion micro-benchmarks for production, commands and the save codec.

use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use seashell_bench::{late_game_profile, late_game_state};
use seashell_core::{Catalog, Shells};
use seashell_engine::{EngineConfig, LockstepGame};
use seashell_save::{load_state, save_state};

/// Benchmark: one virtual hour with every job at its top level.
fn bench_advance_hour(c: &mut Criterion) {
    c.bench_function("advance_one_hour_all_jobs", |b| {
        b.iter_batched(
            || LockstepGame::new(late_game_profile(0)).unwrap(),
            |mut game| black_box(game.advance(Duration::from_secs(3600))),
            criterion::BatchSize::LargeInput,
        );
    });
}

/// Benchmark: click income, one snapshot per call.
fn bench_collect(c: &mut Criterion) {
    let mut game = LockstepGame::new(EngineConfig::default()).unwrap();
    c.bench_function("collect", |b| {
        b.iter(|| black_box(game.collect().unwrap()));
    });
}

/// Benchmark: abbreviated currency formatting.
fn bench_format(c: &mut Criterion) {
    let values: Vec<Shells> = (0..64).map(|i| Shells::new(7u64.pow(i % 22))).collect();
    c.bench_function("shells_format_64", |b| {
        b.iter(|| {
            for v in &values {
                black_box(v.format());
            }
        });
    });
}

/// Benchmark: save and load a late-game state.
fn bench_save_round_trip(c: &mut Criterion) {
    let catalog = Catalog::standard();
    let state = late_game_state(&catalog, u64::MAX / 3);
    c.bench_function("save_load_late_game", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(64);
            save_state(&mut buf, &state).unwrap();
            black_box(load_state(buf.as_slice(), &catalog).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_advance_hour,
    bench_collect,
    bench_format,
    bench_save_round_trip
);
criterion_main!(benches);
