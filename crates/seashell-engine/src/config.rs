//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] is the builder-input for both engine drivers.
//! [`validate()`](EngineConfig::validate) checks structural invariants at
//! startup; the catalog is validated when it is built, so a config only
//! ever holds a well-formed [`Catalog`].

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use seashell_core::catalog::JobDefinition;
use seashell_core::{Catalog, CatalogError, GameState, Shells};

/// Default per-click income.
pub const DEFAULT_CLICK_INCOME: Shells = Shells::new(5);

/// Default floor on a production cycle's length.
pub const DEFAULT_MIN_CYCLE: Duration = Duration::from_millis(50);

// ── PayoutPolicy ───────────────────────────────────────────────────

/// Which level a completed cycle pays out at when the worker was
/// upgraded while the cycle was running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PayoutPolicy {
    /// Pay the earn of the level that was active when the cycle started.
    /// Upgrades take effect from the next cycle.
    #[default]
    StartLevel,
    /// Pay the earn of the worker's level at completion time.
    CompletionLevel,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building or starting an engine.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The job catalog failed validation.
    Catalog(CatalogError),
    /// Subscriber channel capacity is zero.
    SubscriberCapacityTooSmall {
        /// The configured size that was too small.
        configured: usize,
    },
    /// `min_cycle` is zero, which would let a zero-length job spin.
    ZeroMinCycle,
    /// A background thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(e) => write!(f, "catalog: {e}"),
            Self::SubscriberCapacityTooSmall { configured } => {
                write!(f, "subscriber_capacity {configured} is below minimum of 1")
            }
            Self::ZeroMinCycle => write!(f, "min_cycle must be greater than zero"),
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "thread spawn failed: {reason}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Catalog(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CatalogError> for ConfigError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

// ── EngineConfig ───────────────────────────────────────────────────

/// Complete configuration for constructing a game engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Job definitions, shared read-only with worker threads.
    pub catalog: Arc<Catalog>,
    /// Shells added by one `collect()`. Default: 5.
    pub click_income: Shells,
    /// Payout level for cycles that span an upgrade. Default: start level.
    pub payout_policy: PayoutPolicy,
    /// Shortest cycle the scheduler will run. Default: 50ms. Must be > 0.
    pub min_cycle: Duration,
    /// Undelivered snapshots each subscriber channel holds before it
    /// starts skipping. Default: 8. Minimum: 1.
    pub subscriber_capacity: usize,
    /// Saved aggregate to resume from. Invalid state falls back to a
    /// fresh game.
    pub initial_state: Option<GameState>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog: Arc::new(Catalog::standard()),
            click_income: DEFAULT_CLICK_INCOME,
            payout_policy: PayoutPolicy::default(),
            min_cycle: DEFAULT_MIN_CYCLE,
            subscriber_capacity: 8,
            initial_state: None,
        }
    }
}

impl EngineConfig {
    /// Default configuration over a custom, authored catalog.
    pub fn with_definitions(definitions: Vec<JobDefinition>) -> Result<Self, ConfigError> {
        Ok(Self {
            catalog: Arc::new(Catalog::new(definitions)?),
            ..Self::default()
        })
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subscriber_capacity == 0 {
            return Err(ConfigError::SubscriberCapacityTooSmall {
                configured: self.subscriber_capacity,
            });
        }
        if self.min_cycle.is_zero() {
            return Err(ConfigError::ZeroMinCycle);
        }
        Ok(())
    }
}
