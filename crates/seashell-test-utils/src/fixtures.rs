//! Reusable catalogs and game states.
//!
//! - [`scenario_catalog`]: the built-in hotel curves (Room level 1 costs
//!   10, earns 5 every 2 s).
//! - [`uniform_catalog`]: every job shares one linear curve; handy for
//!   tie-breaking and for short realtime cycles.
//! - [`funded_state`] / [`owning_state`]: valid aggregates to restore from.

use std::time::Duration;

use seashell_core::{Catalog, GameState, JobDefinition, JobId, Level, LevelTier, Shells, Worker};

/// Cycle length used by realtime tests. Above the engine's default
/// `min_cycle`, short enough to keep tests fast.
pub const FAST_CYCLE: Duration = Duration::from_millis(60);

/// One tier; panics on level 0.
pub fn tier(level: u32, cost: u64, earn: u64, duration: Duration) -> LevelTier {
    LevelTier {
        level: Level::new(level).expect("levels start at 1"),
        cost: Shells::new(cost),
        earn: Shells::new(earn),
        duration,
    }
}

/// The built-in catalog.
pub fn scenario_catalog() -> Catalog {
    Catalog::standard()
}

/// Every job gets `levels` tiers where level `k` costs `cost * k`, earns
/// `earn * k` and always takes `duration`.
pub fn uniform_catalog(cost: u64, earn: u64, duration: Duration, levels: u32) -> Catalog {
    let definitions = JobId::ALL
        .iter()
        .map(|&id| JobDefinition {
            id,
            tiers: (1..=levels)
                .map(|k| tier(k, cost * u64::from(k), earn * u64::from(k), duration))
                .collect(),
        })
        .collect();
    Catalog::new(definitions).expect("uniform catalog is well-formed")
}

/// A fresh game holding `money`.
pub fn funded_state(catalog: &Catalog, money: u64) -> GameState {
    let mut state = GameState::initial(catalog);
    state.stashed_money = Shells::new(money);
    state
}

/// A game holding `money` that already owns `jobs` at level 1.
pub fn owning_state(catalog: &Catalog, money: u64, jobs: &[JobId]) -> GameState {
    let mut state = funded_state(catalog, money);
    for &job in jobs {
        state.workers.insert(
            job,
            Worker {
                job_id: job,
                level: Level::FIRST,
            },
        );
    }
    state
}
