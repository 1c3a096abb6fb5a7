//! Realtime idle loop.
//!
//! Clicks a few times per second, buys or upgrades whatever is cheapest,
//! and prints the balance. Set `RUST_LOG=debug` to see every command and
//! cycle completion.

use std::thread;
use std::time::Duration;

use seashell_bench::{next_move, Move};
use seashell_core::Catalog;
use seashell_engine::{EngineConfig, RealtimeGame};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn main() {
    init_tracing();
    println!("=== Seashell Idle Loop ===\n");

    let catalog = Catalog::standard();
    let mut game = RealtimeGame::new(EngineConfig::default()).unwrap();

    for step in 0..60 {
        game.collect().unwrap();
        let state = game.state();
        match next_move(&state, &catalog) {
            Some(Move::Purchase(job)) => {
                if game.purchase(job).is_ok() {
                    println!("  [{step:>2}] bought {}", job.name());
                }
            }
            Some(Move::Upgrade(job)) => {
                if let Ok(level) = game.upgrade(job) {
                    println!("  [{step:>2}] upgraded {} to level {level}", job.name());
                }
            }
            None => {}
        }
        if step % 10 == 9 {
            let state = game.state();
            println!(
                "  t={:>5.1}s  shells={:>8}  workers={}",
                game.elapsed().as_secs_f64(),
                state.stashed_money.format(),
                state.workers.len()
            );
        }
        thread::sleep(Duration::from_millis(250));
    }

    let metrics = game.metrics();
    println!(
        "\nCycles completed: {}, production income: {}, click income: {}",
        metrics.cycles_completed,
        metrics.production_income.format(),
        metrics.click_income.format()
    );

    game.reset();
    println!("After reset: {} shells", game.state().stashed_money.format());

    let report = game.clear();
    println!(
        "Cleared in {}ms, {} worker threads joined",
        report.total_ms, report.workers_joined
    );
}
