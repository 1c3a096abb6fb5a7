//! Error types for the Seashell engine.
//!
//! Organized by subsystem: commands ([`GameError`]), catalog lookup and
//! authoring ([`CatalogError`]), and restored-state validation
//! ([`StateError`]). All of them are local, recoverable outcomes.

use std::error::Error;
use std::fmt;

use crate::currency::Shells;
use crate::id::{JobId, Level};

/// Caller-visible outcome of a rejected command.
///
/// Commands check every precondition before mutating state, so a
/// command that returns one of these has left the aggregate untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    /// The job id is not part of the closed set `1..=5`.
    UnknownJob {
        /// The rejected raw id.
        id: u8,
    },
    /// A worker for this job already exists.
    AlreadyOwned {
        /// The job that was purchased twice.
        job: JobId,
    },
    /// No worker exists for this job, so it cannot be upgraded.
    NotOwned {
        /// The job that was not purchased.
        job: JobId,
    },
    /// The balance does not cover the price.
    InsufficientFunds {
        /// Price of the operation.
        needed: Shells,
        /// Balance at the time of the attempt.
        available: Shells,
    },
    /// The worker is already at the highest authored level.
    MaxLevelReached {
        /// The job at its ceiling.
        job: JobId,
        /// The ceiling level.
        level: Level,
    },
    /// The job's worker thread could not be started. The purchase was
    /// rolled back.
    WorkerUnavailable {
        /// The job whose purchase was undone.
        job: JobId,
    },
    /// The engine has been cleared and accepts no further commands.
    ShutDown,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownJob { id } => write!(f, "unknown job id {id}"),
            Self::AlreadyOwned { job } => write!(f, "job {job} is already owned"),
            Self::NotOwned { job } => write!(f, "job {job} is not owned"),
            Self::InsufficientFunds { needed, available } => {
                write!(f, "insufficient funds: need {needed}, have {available}")
            }
            Self::MaxLevelReached { job, level } => {
                write!(f, "job {job} is already at max level {level}")
            }
            Self::WorkerUnavailable { job } => {
                write!(f, "no worker thread for job {job}, purchase undone")
            }
            Self::ShutDown => write!(f, "engine has been shut down"),
        }
    }
}

impl Error for GameError {}

/// Errors from catalog lookup and catalog authoring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// Lookup of a raw id outside `1..=5`.
    UnknownJob {
        /// The rejected raw id.
        id: u8,
    },
    /// No tier is authored at the requested level.
    LevelOutOfRange {
        /// The job looked up.
        job: JobId,
        /// The requested level.
        level: Level,
        /// Highest authored level for the job.
        max: Level,
    },
    /// A job id has no definition.
    MissingJob {
        /// The absent job.
        job: JobId,
    },
    /// A job id is defined more than once.
    DuplicateJob {
        /// The repeated job.
        job: JobId,
    },
    /// A definition has no tiers.
    EmptyTiers {
        /// The job without tiers.
        job: JobId,
    },
    /// Tier levels must run `1, 2, 3, ...` without gaps.
    NonContiguousLevels {
        /// The offending job.
        job: JobId,
        /// Position of the first tier out of sequence.
        position: usize,
        /// Level found at that position.
        found: u32,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownJob { id } => write!(f, "unknown job id {id}"),
            Self::LevelOutOfRange { job, level, max } => {
                write!(f, "job {job} has no level {level} (max {max})")
            }
            Self::MissingJob { job } => write!(f, "catalog has no definition for job {job}"),
            Self::DuplicateJob { job } => write!(f, "job {job} is defined more than once"),
            Self::EmptyTiers { job } => write!(f, "job {job} has no level tiers"),
            Self::NonContiguousLevels {
                job,
                position,
                found,
            } => write!(
                f,
                "job {job}: tier at position {position} has level {found}, expected {}",
                position + 1
            ),
        }
    }
}

impl Error for CatalogError {}

/// A restored [`GameState`](crate::GameState) is inconsistent with the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateError {
    /// `available_jobs` does not list every job exactly once, in order.
    AvailableJobsMismatch {
        /// Number of entries found.
        found: usize,
    },
    /// A worker is keyed under a different job than it records.
    WorkerKeyMismatch {
        /// The map key.
        key: JobId,
        /// The job stored in the worker.
        stored: JobId,
    },
    /// A level is outside the authored range for its job.
    Catalog(CatalogError),
    /// An available job's tier disagrees with the catalog or its worker.
    TierMismatch {
        /// The inconsistent job.
        job: JobId,
    },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AvailableJobsMismatch { found } => {
                write!(f, "expected 5 available jobs in id order, found {found}")
            }
            Self::WorkerKeyMismatch { key, stored } => {
                write!(f, "worker keyed as job {key} records job {stored}")
            }
            Self::Catalog(e) => write!(f, "catalog: {e}"),
            Self::TierMismatch { job } => {
                write!(f, "available tier for job {job} disagrees with the catalog")
            }
        }
    }
}

impl Error for StateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Catalog(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CatalogError> for StateError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_amounts() {
        let e = GameError::InsufficientFunds {
            needed: Shells::new(10),
            available: Shells::new(5),
        };
        assert_eq!(e.to_string(), "insufficient funds: need 10, have 5");
    }

    #[test]
    fn state_error_chains_catalog_source() {
        let inner = CatalogError::UnknownJob { id: 9 };
        let e = StateError::from(inner.clone());
        let src = e.source().unwrap();
        assert_eq!(src.to_string(), inner.to_string());
    }
}
