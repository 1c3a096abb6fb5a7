//! Production engine for Seashell idle games.
//!
//! [`Game`] holds the aggregate and the per-worker production cycles. Two
//! drivers wrap it:
//!
//! - [`LockstepGame`]: the caller advances a virtual clock. Deterministic;
//!   used for tests, simulations and balancing.
//! - [`RealtimeGame`]: wall-clock time, one background thread per worker.
//!
//! Both publish a [`GameSnapshot`](seashell_core::GameSnapshot) after every
//! committed mutation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod game;
pub mod lockstep;
pub mod metrics;
pub mod production;
pub mod publish;
pub mod realtime;
mod worker;

pub use config::{ConfigError, EngineConfig, PayoutPolicy, DEFAULT_CLICK_INCOME, DEFAULT_MIN_CYCLE};
pub use game::Game;
pub use lockstep::{AdvanceReport, LockstepGame};
pub use metrics::EngineMetrics;
pub use production::{Completion, Cycle, CyclePhase, CycleTicket};
pub use publish::Publisher;
pub use realtime::{RealtimeGame, ShutdownReport};
