//! Seashell: an idle production game engine.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Seashell sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use std::time::Duration;
//! use seashell::prelude::*;
//!
//! let mut game = LockstepGame::new(EngineConfig::default()).unwrap();
//! for _ in 0..3 {
//!     game.collect().unwrap();
//! }
//! game.purchase(JobId::ROOM).unwrap();
//! game.advance(Duration::from_secs(2));
//! assert_eq!(game.state().stashed_money, Shells::new(10));
//!
//! // Persist and resume.
//! let mut buf = Vec::new();
//! seashell::save::save_state(&mut buf, game.state()).unwrap();
//! let restored = seashell::save::load_or_default(buf.as_slice(), game.catalog());
//! assert_eq!(&restored, game.state());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `seashell-core` | Currency, job ids, catalog, game state |
//! | [`engine`] | `seashell-engine` | Lockstep and realtime drivers |
//! | [`save`] | `seashell-save` | Binary save format |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Currency, ids, catalog and the game aggregate (`seashell-core`).
pub use seashell_core as types;

/// Game drivers (`seashell-engine`).
///
/// [`engine::LockstepGame`] for caller-clocked runs,
/// [`engine::RealtimeGame`] for wall-clock production on worker threads.
pub use seashell_engine as engine;

/// Save and load the game aggregate (`seashell-save`).
pub use seashell_save as save;

/// Common imports for typical Seashell usage.
///
/// ```rust
/// use seashell::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use seashell_core::{
        Catalog, GameSnapshot, GameState, JobDefinition, JobId, Level, LevelTier, Shells, Worker,
    };

    // Errors
    pub use seashell_core::{CatalogError, GameError, StateError};
    pub use seashell_engine::ConfigError;
    pub use seashell_save::SaveError;

    // Engine
    pub use seashell_engine::{
        AdvanceReport, EngineConfig, EngineMetrics, LockstepGame, PayoutPolicy, RealtimeGame,
        ShutdownReport,
    };
}
