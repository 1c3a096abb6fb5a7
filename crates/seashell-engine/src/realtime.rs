//! User-facing `RealtimeGame` API and shutdown state machine.
//!
//! Production runs on wall-clock time: every purchased job gets its own
//! background thread that sleeps until its cycle is due, then completes
//! the cycle under the game lock.
//!
//! # Architecture
//!
//! ```text
//! User Thread(s)                 Game Mutex               Worker Threads (1 per job)
//!     |                              |                          |
//!     |--collect/purchase/upgrade--->| mutate + publish         |
//!     |                              |                          | cancel_rx.recv_deadline(ends_at)
//!     |                              |<---complete_cycle--------| (timeout = due)
//!     |                              |    publish               |
//!     |--reset()/clear()------------>| generation += 1          |
//!     |   drop cancel senders ------------------------------->  | Disconnected -> exit
//!     |   join every worker  <----------------------------------|
//! ```
//!
//! After `reset()` or `clear()` returns, no worker thread from before the
//! call is alive, so no cancelled cycle can pay out.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use seashell_core::{GameError, GameSnapshot, GameState, JobId, Level, Shells};

use crate::config::{ConfigError, EngineConfig};
use crate::game::Game;
use crate::metrics::EngineMetrics;
use crate::publish::Publisher;
use crate::worker::{self, Shared, WorkerTask};

// ── ShutdownReport ───────────────────────────────────────────────

/// Report from [`RealtimeGame::clear()`] and
/// [`LockstepGame::clear()`](crate::LockstepGame::clear).
///
/// A repeated clear returns the all-zero default.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Wall time spent in the shutdown sequence.
    pub total_ms: u64,
    /// Running cycles cancelled.
    pub cycles_cancelled: u64,
    /// Worker threads joined cleanly.
    pub workers_joined: usize,
    /// Worker threads that had panicked.
    pub workers_panicked: usize,
}

// ── ShutdownState ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownState {
    Running,
    Closed,
}

// ── RealtimeGame ─────────────────────────────────────────────────

/// Wall-clock game with one background thread per worker.
///
/// Commands take `&self` and may be issued from any thread. Lifecycle
/// operations ([`reset`](Self::reset), [`clear`](Self::clear)) take
/// `&mut self` because they join worker threads.
pub struct RealtimeGame {
    shared: Arc<Shared>,
    tasks: Mutex<Vec<WorkerTask>>,
    state: ShutdownState,
}

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<RealtimeGame>();
};

impl RealtimeGame {
    /// Build a game, publish its initial snapshot and spawn one worker
    /// per restored job.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let game = Game::new(&config)?;
        let tickets = game.running_tickets();
        let shared = Arc::new(Shared::new(game, Publisher::new(config.subscriber_capacity)));
        {
            let mut game = shared.lock_game();
            shared.publish(&mut game, Duration::ZERO);
        }

        let mut world = Self {
            shared,
            tasks: Mutex::new(Vec::with_capacity(tickets.len())),
            state: ShutdownState::Running,
        };
        for ticket in tickets {
            match worker::spawn(&world.shared, ticket) {
                Ok(task) => world.tasks_mut().push(task),
                Err(e) => {
                    // Drop tears down whatever was already spawned.
                    return Err(ConfigError::ThreadSpawnFailed {
                        reason: format!("seashell-worker-{}: {e}", ticket.job.get()),
                    });
                }
            }
        }
        tracing::info!(workers = world.worker_count(), "realtime game started");
        Ok(world)
    }

    fn tasks_mut(&mut self) -> &mut Vec<WorkerTask> {
        self.tasks.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate<T>(
        &self,
        command: impl FnOnce(&mut Game, Duration) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let mut game = self.shared.lock_game();
        let now = self.shared.elapsed();
        let out = command(&mut game, now)?;
        self.shared.publish(&mut game, now);
        Ok(out)
    }

    /// Add the per-click income. Returns the new balance.
    pub fn collect(&self) -> Result<Shells, GameError> {
        self.mutate(|game, _| game.collect())
    }

    /// Buy `job` and start its worker thread.
    ///
    /// The thread is spawned while the game lock is held. If it cannot be
    /// spawned the purchase is rolled back and
    /// [`GameError::WorkerUnavailable`] is returned; nothing is published.
    pub fn purchase(&self, job: JobId) -> Result<(), GameError> {
        let mut game = self.shared.lock_game();
        let now = self.shared.elapsed();
        let ticket = game.purchase(job, now)?;
        match worker::spawn(&self.shared, ticket) {
            Ok(task) => self
                .tasks
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(task),
            Err(e) => {
                game.rollback_purchase(job);
                tracing::error!(job = job.get(), error = %e, "failed to spawn worker thread");
                return Err(GameError::WorkerUnavailable { job });
            }
        }
        self.shared.publish(&mut game, now);
        Ok(())
    }

    /// Raise `job` one level. Returns the new level.
    ///
    /// The running cycle keeps its end time.
    pub fn upgrade(&self, job: JobId) -> Result<Level, GameError> {
        self.mutate(|game, _| game.upgrade(job))
    }

    /// Cancel every cycle, join every worker and return to a fresh game.
    ///
    /// No-op after [`clear()`](Self::clear).
    pub fn reset(&mut self) {
        if self.state != ShutdownState::Running {
            return;
        }
        let generation = {
            let mut game = self.shared.lock_game();
            game.reset();
            let now = self.shared.elapsed();
            self.shared.publish(&mut game, now);
            game.generation()
        };
        let (joined, panicked) = self.stop_workers();
        tracing::info!(generation, joined, panicked, "realtime game reset");
    }

    /// Shut the game down.
    ///
    /// Closes the game under the lock, which makes every in-flight
    /// completion stale, disconnects subscribers, then drops every cancel
    /// sender and joins every worker thread.
    ///
    /// Safe to call repeatedly; later calls return an empty report.
    pub fn clear(&mut self) -> ShutdownReport {
        if self.state == ShutdownState::Closed {
            return ShutdownReport::default();
        }
        let start = Instant::now();

        let cycles_cancelled = self.shared.lock_game().close();
        self.shared.publisher().close();
        let (workers_joined, workers_panicked) = self.stop_workers();

        self.state = ShutdownState::Closed;
        let report = ShutdownReport {
            total_ms: start.elapsed().as_millis() as u64,
            cycles_cancelled,
            workers_joined,
            workers_panicked,
        };
        tracing::info!(
            cycles_cancelled,
            workers_joined,
            workers_panicked,
            total_ms = report.total_ms,
            "realtime game cleared"
        );
        report
    }

    /// Disconnect and join every worker thread. Must not be called with
    /// the game lock held.
    fn stop_workers(&mut self) -> (usize, usize) {
        let tasks = std::mem::take(self.tasks_mut());
        // Disconnect every worker before joining any of them.
        let handles: Vec<_> = tasks
            .into_iter()
            .map(|task| {
                drop(task.cancel);
                (task.job, task.handle)
            })
            .collect();

        let mut joined = 0;
        let mut panicked = 0;
        for (job, handle) in handles {
            if handle.join().is_ok() {
                joined += 1;
            } else {
                panicked += 1;
                tracing::warn!(job = job.get(), "worker thread panicked");
            }
        }
        (joined, panicked)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Option<Arc<GameSnapshot>> {
        self.shared.publisher().latest()
    }

    /// Channel receiving the current snapshot and every later one.
    pub fn subscribe(&self) -> Receiver<Arc<GameSnapshot>> {
        self.shared.publisher().subscribe()
    }

    /// A copy of the live aggregate.
    pub fn state(&self) -> GameState {
        self.shared.lock_game().state().clone()
    }

    /// Counters since construction.
    pub fn metrics(&self) -> EngineMetrics {
        self.shared.lock_game().metrics().clone()
    }

    /// Time since the game was built.
    pub fn elapsed(&self) -> Duration {
        self.shared.elapsed()
    }

    /// Worker threads spawned since the last reset or clear.
    pub fn worker_count(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether [`clear()`](Self::clear) has run.
    pub fn is_cleared(&self) -> bool {
        self.state == ShutdownState::Closed
    }
}

impl Drop for RealtimeGame {
    fn drop(&mut self) {
        if self.state != ShutdownState::Closed {
            self.clear();
        }
    }
}

impl std::fmt::Debug for RealtimeGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeGame")
            .field("state", &self.state)
            .field("workers", &self.worker_count())
            .field("elapsed", &self.elapsed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seashell_test_utils::{funded_state, owning_state, uniform_catalog, FAST_CYCLE};

    fn fast_config(money: u64) -> EngineConfig {
        let catalog = uniform_catalog(10, 5, FAST_CYCLE, 3);
        EngineConfig {
            initial_state: Some(funded_state(&catalog, money)),
            catalog: Arc::new(catalog),
            ..EngineConfig::default()
        }
    }

    fn wait_for(game: &RealtimeGame, what: &str, pred: impl Fn(&GameState) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !pred(&game.state()) {
            if Instant::now() > deadline {
                panic!("{what} not reached within 5s");
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn lifecycle_start_and_clear() {
        let mut game = RealtimeGame::new(fast_config(0)).unwrap();
        assert_eq!(game.snapshot().unwrap().sequence, 1);
        assert_eq!(game.worker_count(), 0);
        let report = game.clear();
        assert_eq!(report.workers_joined, 0);
        assert!(game.is_cleared());
    }

    #[test]
    fn purchased_worker_produces() {
        let mut game = RealtimeGame::new(fast_config(10)).unwrap();
        game.purchase(JobId::ROOM).unwrap();
        assert_eq!(game.worker_count(), 1);
        wait_for(&game, "two payouts", |s| s.stashed_money >= Shells::new(10));
        assert!(game.metrics().cycles_completed >= 2);
        let report = game.clear();
        assert_eq!(report.cycles_cancelled, 1);
        assert_eq!(report.workers_joined, 1);
        assert_eq!(report.workers_panicked, 0);
    }

    #[test]
    fn reset_leaves_no_late_payout() {
        let mut game = RealtimeGame::new(fast_config(10)).unwrap();
        game.purchase(JobId::ROOM).unwrap();
        game.reset();
        assert_eq!(game.worker_count(), 0);
        std::thread::sleep(FAST_CYCLE * 3);
        let state = game.state();
        assert_eq!(state, GameState::initial(&uniform_catalog(10, 5, FAST_CYCLE, 3)));
        assert_eq!(game.metrics().cycles_completed, 0);
    }

    #[test]
    fn commands_after_clear_are_rejected() {
        let mut game = RealtimeGame::new(fast_config(100)).unwrap();
        game.purchase(JobId::ROOM).unwrap();
        game.clear();
        assert_eq!(game.collect(), Err(GameError::ShutDown));
        assert_eq!(game.purchase(JobId::SUITE), Err(GameError::ShutDown));
        assert_eq!(game.upgrade(JobId::ROOM), Err(GameError::ShutDown));
        assert_eq!(game.clear(), ShutdownReport::default());
        game.reset();
        assert!(game.is_cleared());
    }

    #[test]
    fn restored_workers_are_spawned() {
        let catalog = uniform_catalog(10, 5, FAST_CYCLE, 3);
        let config = EngineConfig {
            initial_state: Some(owning_state(&catalog, 0, &[JobId::ROOM])),
            catalog: Arc::new(catalog),
            ..EngineConfig::default()
        };
        let game = RealtimeGame::new(config).unwrap();
        assert_eq!(game.worker_count(), 1);
        wait_for(&game, "first payout", |s| s.stashed_money >= Shells::new(5));
    }

    #[test]
    fn subscriber_observes_payouts() {
        let game = RealtimeGame::new(fast_config(10)).unwrap();
        let rx = game.subscribe();
        game.purchase(JobId::ROOM).unwrap();
        let initial = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let bought = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let paid = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(initial.sequence + 1, bought.sequence);
        assert_eq!(bought.sequence + 1, paid.sequence);
        assert_eq!(paid.state.stashed_money, Shells::new(5));
    }

    #[test]
    fn drop_joins_workers() {
        let game = RealtimeGame::new(fast_config(100)).unwrap();
        game.purchase(JobId::ROOM).unwrap();
        game.purchase(JobId::DOUBLE_ROOM).unwrap();
        drop(game);
        // If this doesn't hang, shutdown worked.
    }
}
