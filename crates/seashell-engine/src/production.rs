//! Per-worker production cycle state machine.
//!
//! ```text
//!   start ──► Running(ends_at) ──complete──► Completing ──restart──► Running(..)
//!                  │                                                   │
//!                  └──────────────────── cancel ──────────────► Cancelled
//! ```
//!
//! A [`Cycle`] snapshots the level and earn that were active when it
//! started. Times are engine-clock offsets (`Duration` since the engine
//! started): the lockstep driver advances the clock virtually, the
//! realtime driver reads it from a monotonic `Instant`.

use std::time::Duration;

use seashell_core::{JobId, Level, LevelTier, Shells};

/// Phase of a production cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CyclePhase {
    /// Waiting for `ends_at`.
    Running,
    /// Payout in progress; transient inside a single completion.
    Completing,
    /// Terminal. Cancelled cycles never pay.
    Cancelled,
}

/// What a worker thread needs to wait for the current cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleTicket {
    /// The job producing.
    pub job: JobId,
    /// Engine generation the cycle belongs to.
    pub generation: u64,
    /// Engine-clock time at which the cycle is due.
    pub ends_at: Duration,
}

/// One production interval of one worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cycle {
    job: JobId,
    generation: u64,
    phase: CyclePhase,
    level: Level,
    earn: Shells,
    started_at: Duration,
    ends_at: Duration,
}

impl Cycle {
    /// Enter `Running` at `now` with the economics of `tier`.
    ///
    /// Durations shorter than `min_cycle` are clamped up to it.
    pub fn start(
        job: JobId,
        tier: &LevelTier,
        generation: u64,
        now: Duration,
        min_cycle: Duration,
    ) -> Self {
        Self {
            job,
            generation,
            phase: CyclePhase::Running,
            level: tier.level,
            earn: tier.earn,
            started_at: now,
            ends_at: now.saturating_add(tier.duration.max(min_cycle)),
        }
    }

    /// Leave `Running` for `Completing`.
    ///
    /// Returns the level snapshotted at start, or `None` when the cycle
    /// is not running (already completing or cancelled).
    pub fn begin_completion(&mut self) -> Option<(Level, Shells)> {
        if self.phase != CyclePhase::Running {
            return None;
        }
        self.phase = CyclePhase::Completing;
        Some((self.level, self.earn))
    }

    /// Leave `Completing` for a fresh `Running` cycle.
    ///
    /// The new cycle starts where the old one was due, so a late wakeup
    /// does not stretch the cadence.
    pub fn restart(&mut self, tier: &LevelTier, min_cycle: Duration) {
        debug_assert_eq!(self.phase, CyclePhase::Completing);
        let start = self.ends_at;
        *self = Self::start(self.job, tier, self.generation, start, min_cycle);
    }

    /// Move to the terminal `Cancelled` phase. Idempotent.
    pub fn cancel(&mut self) {
        self.phase = CyclePhase::Cancelled;
    }

    /// Whether the cycle is running and due at `now`.
    pub fn is_due(&self, now: Duration) -> bool {
        self.phase == CyclePhase::Running && now >= self.ends_at
    }

    /// Time left until due, zero once due.
    pub fn remaining(&self, now: Duration) -> Duration {
        self.ends_at.saturating_sub(now)
    }

    /// Ticket describing the current wait.
    pub fn ticket(&self) -> CycleTicket {
        CycleTicket {
            job: self.job,
            generation: self.generation,
            ends_at: self.ends_at,
        }
    }

    /// The producing job.
    pub fn job(&self) -> JobId {
        self.job
    }

    /// Current phase.
    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Level active when the cycle started.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Engine-clock time the cycle started.
    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    /// Engine-clock time the cycle is due.
    pub fn ends_at(&self) -> Duration {
        self.ends_at
    }

    /// Generation the cycle belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A successfully paid production cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    /// The job that produced.
    pub job: JobId,
    /// Level the payout was computed at.
    pub level_paid: Level,
    /// Shells credited.
    pub earned: Shells,
    /// Engine-clock time the cycle was due.
    pub completed_at: Duration,
    /// The cycle that started in its place.
    pub next: CycleTicket,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(level: u32, earn: u64, millis: u64) -> LevelTier {
        LevelTier {
            level: Level::new(level).unwrap(),
            cost: Shells::new(10),
            earn: Shells::new(earn),
            duration: Duration::from_millis(millis),
        }
    }

    const MIN: Duration = Duration::from_millis(50);

    #[test]
    fn start_schedules_after_duration() {
        let c = Cycle::start(JobId::ROOM, &tier(1, 5, 2000), 0, Duration::from_secs(1), MIN);
        assert_eq!(c.phase(), CyclePhase::Running);
        assert_eq!(c.ends_at(), Duration::from_secs(3));
        assert!(!c.is_due(Duration::from_millis(2999)));
        assert!(c.is_due(Duration::from_secs(3)));
        assert_eq!(c.remaining(Duration::from_secs(2)), Duration::from_secs(1));
    }

    #[test]
    fn zero_duration_is_clamped() {
        let c = Cycle::start(JobId::POOL, &tier(1, 1, 0), 0, Duration::ZERO, MIN);
        assert_eq!(c.ends_at(), MIN);
    }

    #[test]
    fn completion_returns_start_snapshot_once() {
        let mut c = Cycle::start(JobId::ROOM, &tier(1, 5, 2000), 0, Duration::ZERO, MIN);
        assert_eq!(
            c.begin_completion(),
            Some((Level::FIRST, Shells::new(5)))
        );
        assert_eq!(c.phase(), CyclePhase::Completing);
        assert_eq!(c.begin_completion(), None);
    }

    #[test]
    fn restart_uses_new_tier_from_previous_end() {
        let mut c = Cycle::start(JobId::ROOM, &tier(1, 5, 2000), 3, Duration::ZERO, MIN);
        c.begin_completion();
        c.restart(&tier(2, 9, 3000), MIN);
        assert_eq!(c.phase(), CyclePhase::Running);
        assert_eq!(c.level().get(), 2);
        assert_eq!(c.started_at(), Duration::from_secs(2));
        assert_eq!(c.ends_at(), Duration::from_secs(5));
        assert_eq!(c.generation(), 3);
    }

    #[test]
    fn cancelled_cycle_never_completes() {
        let mut c = Cycle::start(JobId::SUITE, &tier(1, 5, 100), 0, Duration::ZERO, MIN);
        c.cancel();
        c.cancel();
        assert_eq!(c.phase(), CyclePhase::Cancelled);
        assert!(!c.is_due(Duration::from_secs(100)));
        assert_eq!(c.begin_completion(), None);
    }
}
