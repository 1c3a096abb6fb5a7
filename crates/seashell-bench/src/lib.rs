//! Benchmark profiles and a simple purchasing strategy.
//!
//! - [`late_game_state`]: every job owned at its top level
//! - [`late_game_profile`]: a lockstep config resuming that state
//! - [`next_move`]: the cheapest affordable purchase or upgrade

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use seashell_core::{Catalog, GameState, JobId, Shells, Worker};
use seashell_engine::EngineConfig;

/// Every job owned at the catalog ceiling, holding `money`.
pub fn late_game_state(catalog: &Catalog, money: u64) -> GameState {
    let mut state = GameState::initial(catalog);
    state.stashed_money = Shells::new(money);
    for job in JobId::ALL {
        let level = catalog.max_level(job);
        state.workers.insert(job, Worker { job_id: job, level });
        state
            .refresh_job(catalog, job, level)
            .expect("max_level is an authored tier");
    }
    state
}

/// Standard catalog resuming [`late_game_state`].
pub fn late_game_profile(money: u64) -> EngineConfig {
    let catalog = Catalog::standard();
    EngineConfig {
        initial_state: Some(late_game_state(&catalog, money)),
        catalog: Arc::new(catalog),
        ..EngineConfig::default()
    }
}

/// A move the greedy strategy wants to make.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    /// Buy a job not yet owned.
    Purchase(JobId),
    /// Upgrade an owned job.
    Upgrade(JobId),
}

/// The cheapest purchase or upgrade `state` can afford, if any.
pub fn next_move(state: &GameState, catalog: &Catalog) -> Option<Move> {
    JobId::ALL
        .iter()
        .filter_map(|&job| {
            if state.already_bought(job) {
                state
                    .upgrade_cost(catalog, job)
                    .map(|cost| (cost, Move::Upgrade(job)))
            } else {
                state.job(job).map(|j| (j.tier.cost, Move::Purchase(job)))
            }
        })
        .filter(|(cost, _)| *cost <= state.stashed_money)
        .min_by_key(|(cost, _)| *cost)
        .map(|(_, mv)| mv)
}
