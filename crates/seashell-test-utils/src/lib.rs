//! Test fixtures for Seashell development.
//!
//! Catalog and state builders shared by the unit tests, integration
//! tests and benchmarks of the engine and save crates. See [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    funded_state, owning_state, scenario_catalog, tier, uniform_catalog, FAST_CYCLE,
};
