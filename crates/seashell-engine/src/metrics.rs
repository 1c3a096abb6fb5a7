//! Cumulative engine counters.
//!
//! [`EngineMetrics`] is updated under the same lock as the game state, so
//! a copy taken with the state is always consistent with it. Counters
//! survive `reset()`; only dropping the engine clears them.

use seashell_core::Shells;

/// Counters collected over the lifetime of an engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineMetrics {
    /// Production cycles that paid out.
    pub cycles_completed: u64,
    /// Production cycles cancelled by reset or clear.
    pub cycles_cancelled: u64,
    /// Completions that arrived after their cycle was cancelled.
    pub stale_completions: u64,
    /// Shells credited by production cycles.
    pub production_income: Shells,
    /// Shells credited by `collect()`.
    pub click_income: Shells,
    /// Successful `purchase()` calls.
    pub purchases: u64,
    /// Successful `upgrade()` calls.
    pub upgrades: u64,
    /// Commands that returned an error.
    pub commands_rejected: u64,
    /// Number of `reset()` calls.
    pub resets: u64,
    /// Snapshots published to observers.
    pub snapshots_published: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = EngineMetrics::default();
        assert_eq!(m.cycles_completed, 0);
        assert_eq!(m.cycles_cancelled, 0);
        assert_eq!(m.stale_completions, 0);
        assert_eq!(m.production_income, Shells::ZERO);
        assert_eq!(m.click_income, Shells::ZERO);
        assert_eq!(m.purchases, 0);
        assert_eq!(m.upgrades, 0);
        assert_eq!(m.commands_rejected, 0);
        assert_eq!(m.resets, 0);
        assert_eq!(m.snapshots_published, 0);
    }
}
