//! Game core: the single-owner aggregate behind both engine drivers.
//!
//! [`Game`] owns the [`GameState`], the running production [`Cycle`]s
//! and the engine counters. Every method is a complete, synchronous
//! mutation: preconditions are checked before anything is written, so a
//! rejected command leaves the aggregate untouched.
//!
//! # No background work
//!
//! `Game` never sleeps or spawns. Callers supply the engine clock (`now`)
//! and decide when a cycle completes: [`LockstepGame`](crate::LockstepGame)
//! by advancing a virtual clock, [`RealtimeGame`](crate::RealtimeGame)
//! from worker threads holding the game lock.

use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use seashell_core::{Catalog, GameError, GameSnapshot, GameState, JobId, Level, Shells, Worker};

use crate::config::{ConfigError, EngineConfig, PayoutPolicy};
use crate::metrics::EngineMetrics;
use crate::production::{Completion, Cycle, CyclePhase, CycleTicket};

/// The game aggregate plus its production cycles.
#[derive(Debug)]
pub struct Game {
    catalog: Arc<Catalog>,
    click_income: Shells,
    payout_policy: PayoutPolicy,
    min_cycle: Duration,
    state: GameState,
    cycles: IndexMap<JobId, Cycle>,
    generation: u64,
    sequence: u64,
    closed: bool,
    metrics: EngineMetrics,
}

impl Game {
    /// Build a game from `config` with the engine clock at zero.
    ///
    /// A saved `initial_state` that does not match the catalog is
    /// discarded in favour of a fresh game. One cycle is started for each
    /// restored worker.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = match &config.initial_state {
            None => GameState::initial(&config.catalog),
            Some(saved) => match saved.validate(&config.catalog) {
                Ok(()) => saved.clone(),
                Err(e) => {
                    tracing::warn!(error = %e, "saved game rejected, starting fresh");
                    GameState::initial(&config.catalog)
                }
            },
        };

        let mut game = Self {
            catalog: Arc::clone(&config.catalog),
            click_income: config.click_income,
            payout_policy: config.payout_policy,
            min_cycle: config.min_cycle,
            state,
            cycles: IndexMap::new(),
            generation: 0,
            sequence: 0,
            closed: false,
            metrics: EngineMetrics::default(),
        };
        game.start_restored_cycles(Duration::ZERO);
        Ok(game)
    }

    fn start_restored_cycles(&mut self, now: Duration) {
        for worker in self.state.workers.values() {
            // The state was validated against this catalog.
            if let Ok(tier) = self.catalog.level_info(worker.job_id, worker.level) {
                let cycle = Cycle::start(worker.job_id, &tier, self.generation, now, self.min_cycle);
                self.cycles.insert(worker.job_id, cycle);
            }
        }
    }

    // ── Commands ─────────────────────────────────────────────────

    /// Add the per-click income. Returns the new balance.
    pub fn collect(&mut self) -> Result<Shells, GameError> {
        let result = self.ensure_open().map(|()| {
            self.state.stashed_money = self.state.stashed_money.add(self.click_income);
            self.metrics.click_income = self.metrics.click_income.add(self.click_income);
            self.state.stashed_money
        });
        self.record("collect", result)
    }

    /// Buy `job` at level 1 and start its first cycle at `now`.
    pub fn purchase(&mut self, job: JobId, now: Duration) -> Result<CycleTicket, GameError> {
        let result = self.try_purchase(job, now);
        self.record("purchase", result)
    }

    fn try_purchase(&mut self, job: JobId, now: Duration) -> Result<CycleTicket, GameError> {
        self.ensure_open()?;
        if self.state.already_bought(job) {
            return Err(GameError::AlreadyOwned { job });
        }
        // Validated definitions always carry a level-1 tier.
        let tier = self.catalog.definition(job).tiers[0];
        let balance = self.state.stashed_money.subtract(tier.cost)?;

        self.state.stashed_money = balance;
        self.state.workers.insert(
            job,
            Worker {
                job_id: job,
                level: Level::FIRST,
            },
        );
        let cycle = Cycle::start(job, &tier, self.generation, now, self.min_cycle);
        let ticket = cycle.ticket();
        self.cycles.insert(job, cycle);
        self.metrics.purchases += 1;
        tracing::debug!(job = job.get(), cost = tier.cost.get(), "job purchased");
        Ok(ticket)
    }

    /// Undo a purchase whose cycle cannot be driven.
    ///
    /// Refunds the level-1 price, removes the worker and its cycle, and
    /// counts the purchase as rejected. Returns `false` if `job` has no
    /// running first-level cycle of the current generation.
    pub fn rollback_purchase(&mut self, job: JobId) -> bool {
        let Some(cycle) = self.cycles.get(&job) else {
            return false;
        };
        if cycle.generation() != self.generation || self.state.level_of(job) != Level::FIRST {
            return false;
        }
        let tier = self.catalog.definition(job).tiers[0];
        self.cycles.shift_remove(&job);
        self.state.workers.shift_remove(&job);
        self.state.stashed_money = self.state.stashed_money.add(tier.cost);
        self.metrics.purchases = self.metrics.purchases.saturating_sub(1);
        self.metrics.commands_rejected += 1;
        tracing::debug!(job = job.get(), refund = tier.cost.get(), "purchase rolled back");
        true
    }

    /// Raise `job` one level. Returns the new level.
    ///
    /// The running cycle keeps its original end time; the new tier is
    /// picked up when the next cycle starts.
    pub fn upgrade(&mut self, job: JobId) -> Result<Level, GameError> {
        let result = self.try_upgrade(job);
        self.record("upgrade", result)
    }

    fn try_upgrade(&mut self, job: JobId) -> Result<Level, GameError> {
        self.ensure_open()?;
        let current = self
            .state
            .worker(job)
            .map(|w| w.level)
            .ok_or(GameError::NotOwned { job })?;
        let ceiling = GameError::MaxLevelReached {
            job,
            level: current,
        };
        let next = current.next().ok_or_else(|| ceiling.clone())?;
        let tier = self.catalog.level_info(job, next).map_err(|_| ceiling)?;
        let balance = self.state.stashed_money.subtract(tier.cost)?;

        self.state.stashed_money = balance;
        if let Some(worker) = self.state.workers.get_mut(&job) {
            worker.level = next;
        }
        if let Some(entry) = self.state.available_jobs.get_mut(job.index()) {
            entry.tier = tier;
        }
        self.metrics.upgrades += 1;
        tracing::debug!(job = job.get(), level = next.get(), cost = tier.cost.get(), "job upgraded");
        Ok(next)
    }

    /// Cancel every cycle and return to the fresh-game aggregate.
    ///
    /// Returns `false` (and does nothing) once the game is closed.
    pub fn reset(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let cancelled = self.cancel_all();
        self.state = GameState::initial(&self.catalog);
        self.metrics.resets += 1;
        tracing::info!(generation = self.generation, cancelled, "game reset");
        true
    }

    /// Cancel every cycle and refuse further commands. Idempotent.
    ///
    /// Returns the number of cycles cancelled by this call.
    pub fn close(&mut self) -> u64 {
        if self.closed {
            return 0;
        }
        self.closed = true;
        self.cancel_all()
    }

    fn cancel_all(&mut self) -> u64 {
        self.generation += 1;
        let mut cancelled = 0;
        for cycle in self.cycles.values_mut() {
            if cycle.phase() == CyclePhase::Running {
                cancelled += 1;
            }
            cycle.cancel();
        }
        self.cycles.clear();
        self.metrics.cycles_cancelled += cancelled;
        cancelled
    }

    // ── Production ───────────────────────────────────────────────

    /// Complete the cycle of `job` and start the next one.
    ///
    /// Returns `None` without touching the balance when the cycle belongs
    /// to an older generation, was cancelled, or is not yet due.
    pub fn complete_cycle(
        &mut self,
        job: JobId,
        generation: u64,
        now: Duration,
    ) -> Option<Completion> {
        let live = !self.closed
            && generation == self.generation
            && self
                .cycles
                .get(&job)
                .is_some_and(|c| c.generation() == generation);
        if !live {
            self.metrics.stale_completions += 1;
            tracing::debug!(job = job.get(), generation, "stale completion dropped");
            return None;
        }

        let cycle = self.cycles.get_mut(&job)?;
        if !cycle.is_due(now) {
            return None;
        }
        let (start_level, start_earn) = cycle.begin_completion()?;
        let current_level = self.state.level_of(job);
        let current_tier = match self.catalog.level_info(job, current_level) {
            Ok(tier) => tier,
            Err(e) => {
                tracing::warn!(error = %e, "worker level has no tier, stopping cycle");
                cycle.cancel();
                return None;
            }
        };
        let (level_paid, earned) = match self.payout_policy {
            PayoutPolicy::StartLevel => (start_level, start_earn),
            PayoutPolicy::CompletionLevel => (current_level, current_tier.earn),
        };
        let completed_at = cycle.ends_at();
        cycle.restart(&current_tier, self.min_cycle);
        let next = cycle.ticket();

        self.state.stashed_money = self.state.stashed_money.add(earned);
        self.metrics.cycles_completed += 1;
        self.metrics.production_income = self.metrics.production_income.add(earned);
        tracing::debug!(
            job = job.get(),
            level = level_paid.get(),
            earned = earned.get(),
            "cycle completed"
        );
        Some(Completion {
            job,
            level_paid,
            earned,
            completed_at,
            next,
        })
    }

    /// Earliest running cycle as `(due time, job)`; ties go to the lower id.
    pub fn next_due(&self) -> Option<(Duration, JobId)> {
        self.cycles
            .values()
            .filter(|c| c.phase() == CyclePhase::Running)
            .map(|c| (c.ends_at(), c.job()))
            .min()
    }

    /// Tickets of every running cycle, in purchase order.
    pub fn running_tickets(&self) -> Vec<CycleTicket> {
        self.cycles
            .values()
            .filter(|c| c.phase() == CyclePhase::Running)
            .map(Cycle::ticket)
            .collect()
    }

    // ── Snapshots & accessors ────────────────────────────────────

    /// Take the next snapshot for publication.
    pub fn next_snapshot(&mut self, now: Duration) -> GameSnapshot {
        self.sequence += 1;
        self.metrics.snapshots_published += 1;
        GameSnapshot {
            sequence: self.sequence,
            generation: self.generation,
            elapsed: now,
            state: self.state.clone(),
        }
    }

    /// The current aggregate.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The job catalog.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// The running cycle of `job`, if any.
    pub fn cycle(&self, job: JobId) -> Option<&Cycle> {
        self.cycles.get(&job)
    }

    /// Reset counter; bumped by every reset and by close.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Counters since construction.
    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    fn ensure_open(&self) -> Result<(), GameError> {
        if self.closed {
            Err(GameError::ShutDown)
        } else {
            Ok(())
        }
    }

    fn record<T>(&mut self, command: &str, result: Result<T, GameError>) -> Result<T, GameError> {
        if let Err(e) = &result {
            self.metrics.commands_rejected += 1;
            tracing::debug!(command, error = %e, "command rejected");
        }
        result
    }
}
