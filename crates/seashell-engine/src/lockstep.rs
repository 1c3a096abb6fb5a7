//! Lockstep (caller-clocked) game.
//!
//! [`LockstepGame`] runs the whole engine on the caller's thread. Time
//! only moves when [`advance()`](LockstepGame::advance) is called, which
//! makes every run reproducible: the same commands interleaved with the
//! same `advance` steps always produce the same snapshots.
//!
//! # Ownership model
//!
//! All mutating methods take `&mut self`; there are no background threads,
//! so [`clear()`](LockstepGame::clear) and drop never have anything to
//! join.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use seashell_core::{Catalog, GameError, GameSnapshot, GameState, JobId, Level, Shells};

use crate::config::{ConfigError, EngineConfig};
use crate::game::Game;
use crate::metrics::EngineMetrics;
use crate::production::Completion;
use crate::publish::Publisher;
use crate::realtime::ShutdownReport;

const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<LockstepGame>();
    }
};

// ── AdvanceReport ───────────────────────────────────────────────

/// Result of one [`LockstepGame::advance()`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    /// Cycles paid during the step, in completion order.
    pub completions: Vec<Completion>,
    /// Engine clock after the step.
    pub now: Duration,
}

impl AdvanceReport {
    /// Sum of everything earned during the step.
    pub fn earned(&self) -> Shells {
        self.completions
            .iter()
            .fold(Shells::ZERO, |acc, c| acc.add(c.earned))
    }
}

// ── LockstepGame ────────────────────────────────────────────────

/// Single-threaded game driven by a virtual clock.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use seashell_core::JobId;
/// use seashell_engine::{EngineConfig, LockstepGame};
///
/// let mut game = LockstepGame::new(EngineConfig::default()).unwrap();
/// for _ in 0..2 {
///     game.collect().unwrap();
/// }
/// game.purchase(JobId::ROOM).unwrap();
/// let report = game.advance(Duration::from_secs(2));
/// assert_eq!(report.completions.len(), 1);
/// assert_eq!(game.state().stashed_money.get(), 5);
/// ```
pub struct LockstepGame {
    game: Game,
    publisher: Publisher,
    now: Duration,
}

impl LockstepGame {
    /// Build a game and publish its initial snapshot.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let game = Game::new(&config)?;
        let mut world = Self {
            game,
            publisher: Publisher::new(config.subscriber_capacity),
            now: Duration::ZERO,
        };
        world.publish();
        tracing::info!(
            workers = world.game.state().workers.len(),
            "lockstep game started"
        );
        Ok(world)
    }

    fn publish(&mut self) {
        let snapshot = self.game.next_snapshot(self.now);
        self.publisher.publish(snapshot);
    }

    /// Add the per-click income. Returns the new balance.
    pub fn collect(&mut self) -> Result<Shells, GameError> {
        let balance = self.game.collect()?;
        self.publish();
        Ok(balance)
    }

    /// Buy `job` and start its first cycle at the current clock.
    pub fn purchase(&mut self, job: JobId) -> Result<(), GameError> {
        self.game.purchase(job, self.now)?;
        self.publish();
        Ok(())
    }

    /// Raise `job` one level. Returns the new level.
    pub fn upgrade(&mut self, job: JobId) -> Result<Level, GameError> {
        let level = self.game.upgrade(job)?;
        self.publish();
        Ok(level)
    }

    /// Cancel every cycle and return to a fresh game. The clock keeps
    /// running. No-op after [`clear()`](Self::clear).
    pub fn reset(&mut self) {
        if self.game.reset() {
            self.publish();
        }
    }

    /// Cancel every cycle and refuse further commands.
    ///
    /// A second call returns an empty report.
    pub fn clear(&mut self) -> ShutdownReport {
        if self.game.is_closed() {
            return ShutdownReport::default();
        }
        let cycles_cancelled = self.game.close();
        self.publisher.close();
        tracing::info!(cycles_cancelled, "lockstep game cleared");
        ShutdownReport {
            cycles_cancelled,
            ..ShutdownReport::default()
        }
    }

    /// Move the clock forward by `dt`, completing every cycle that falls
    /// due on the way.
    ///
    /// Completions are processed in due-time order (ties by job id), each
    /// publishing one snapshot. A cycle shorter than `dt` completes
    /// several times.
    pub fn advance(&mut self, dt: Duration) -> AdvanceReport {
        let target = self.now.saturating_add(dt);
        let mut completions = Vec::new();
        while let Some((due, job)) = self.game.next_due() {
            if due > target {
                break;
            }
            self.now = due;
            let generation = self.game.generation();
            if let Some(done) = self.game.complete_cycle(job, generation, due) {
                self.publish();
                completions.push(done);
            }
        }
        self.now = target;
        AdvanceReport {
            completions,
            now: target,
        }
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Option<Arc<GameSnapshot>> {
        self.publisher.latest()
    }

    /// Channel receiving the current snapshot and every later one.
    pub fn subscribe(&self) -> Receiver<Arc<GameSnapshot>> {
        self.publisher.subscribe()
    }

    /// The live aggregate.
    pub fn state(&self) -> &GameState {
        self.game.state()
    }

    /// The job catalog.
    pub fn catalog(&self) -> &Catalog {
        self.game.catalog()
    }

    /// Engine clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Counters since construction.
    pub fn metrics(&self) -> EngineMetrics {
        self.game.metrics().clone()
    }

    /// Whether [`clear()`](Self::clear) has run.
    pub fn is_cleared(&self) -> bool {
        self.game.is_closed()
    }
}

impl std::fmt::Debug for LockstepGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockstepGame")
            .field("now", &self.now)
            .field("generation", &self.game.generation())
            .field("money", &self.game.state().stashed_money)
            .field("workers", &self.game.state().workers.len())
            .finish()
    }
}
