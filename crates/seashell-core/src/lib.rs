//! Core types for the Seashell idle production engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental value types used throughout the Seashell workspace:
//! the [`Shells`] currency, job identifiers, the job [`Catalog`], the
//! [`GameState`] aggregate, and the error types shared by the engine.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod currency;
pub mod error;
pub mod id;
pub mod state;

pub use catalog::{Catalog, JobDefinition, LevelTier};
pub use currency::Shells;
pub use error::{CatalogError, GameError, StateError};
pub use id::{JobId, Level};
pub use state::{GameJob, GameSnapshot, GameState, Worker};
