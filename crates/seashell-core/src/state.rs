//! The [`GameState`] aggregate and the snapshot type published to observers.

use std::time::Duration;

use indexmap::IndexMap;

use crate::catalog::{Catalog, LevelTier};
use crate::currency::Shells;
use crate::error::{CatalogError, StateError};
use crate::id::{JobId, Level};

/// A job as shown to the player: its id and the tier at its current level.
///
/// Unowned jobs sit at level 1, so `tier.cost` is the purchase price.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameJob {
    /// The job.
    pub id: JobId,
    /// Catalog tier at the job's current level.
    pub tier: LevelTier,
}

/// A purchased job bound to a production cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Worker {
    /// The job this worker runs.
    pub job_id: JobId,
    /// Current upgrade level.
    pub level: Level,
}

/// The single mutable aggregate of a running game.
///
/// Invariant: every worker key appears in `available_jobs`, and
/// `available_jobs[i].tier.level` equals the worker's level when the job
/// is owned (1 otherwise). [`validate`](GameState::validate) checks this
/// for state restored from outside the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Spendable balance.
    pub stashed_money: Shells,
    /// Every job, in id order, at its current level.
    pub available_jobs: Vec<GameJob>,
    /// Purchased jobs, in purchase order.
    pub workers: IndexMap<JobId, Worker>,
}

impl GameState {
    /// The fresh-game aggregate: no money, no workers, every job at level 1.
    pub fn initial(catalog: &Catalog) -> Self {
        let available_jobs = catalog
            .iter()
            .map(|def| GameJob {
                id: def.id,
                tier: def.tiers[0],
            })
            .collect();
        Self {
            stashed_money: Shells::ZERO,
            available_jobs,
            workers: IndexMap::new(),
        }
    }

    /// Whether a worker exists for `job`.
    pub fn already_bought(&self, job: JobId) -> bool {
        self.workers.contains_key(&job)
    }

    /// The worker for `job`, if purchased.
    pub fn worker(&self, job: JobId) -> Option<&Worker> {
        self.workers.get(&job)
    }

    /// The available-job entry for `job`.
    ///
    /// Returns `None` only for a state that failed [`validate`](Self::validate).
    pub fn job(&self, job: JobId) -> Option<&GameJob> {
        self.available_jobs.get(job.index()).filter(|j| j.id == job)
    }

    /// Current level of `job` (1 when not owned).
    pub fn level_of(&self, job: JobId) -> Level {
        self.workers.get(&job).map_or(Level::FIRST, |w| w.level)
    }

    /// Price of the next upgrade of `job`, if one is authored.
    pub fn upgrade_cost(&self, catalog: &Catalog, job: JobId) -> Option<Shells> {
        let next = self.level_of(job).next()?;
        catalog.level_info(job, next).ok().map(|t| t.cost)
    }

    /// Check the aggregate against `catalog`.
    ///
    /// Used when a state arrives from persistence rather than from the
    /// engine's own commands.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), StateError> {
        let in_order = self.available_jobs.len() == JobId::ALL.len()
            && self
                .available_jobs
                .iter()
                .zip(JobId::ALL)
                .all(|(j, id)| j.id == id);
        if !in_order {
            return Err(StateError::AvailableJobsMismatch {
                found: self.available_jobs.len(),
            });
        }
        for (&key, worker) in &self.workers {
            if key != worker.job_id {
                return Err(StateError::WorkerKeyMismatch {
                    key,
                    stored: worker.job_id,
                });
            }
            catalog.level_info(key, worker.level)?;
        }
        for job in &self.available_jobs {
            let expected = catalog
                .level_info(job.id, self.level_of(job.id))
                .map_err(StateError::from)?;
            if job.tier != expected {
                return Err(StateError::TierMismatch { job: job.id });
            }
        }
        Ok(())
    }

    /// Point the available-job entry of `job` at `level`.
    ///
    /// Leaves the state untouched when the level is not authored.
    pub fn refresh_job(
        &mut self,
        catalog: &Catalog,
        job: JobId,
        level: Level,
    ) -> Result<(), CatalogError> {
        let tier = catalog.level_info(job, level)?;
        if let Some(entry) = self.available_jobs.get_mut(job.index()) {
            entry.tier = tier;
        }
        Ok(())
    }
}

/// An immutable, point-in-time copy of the game published to observers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSnapshot {
    /// Publish counter; increases by exactly one per snapshot.
    pub sequence: u64,
    /// Reset counter at the time of publishing.
    pub generation: u64,
    /// Engine clock when the snapshot was taken.
    pub elapsed: Duration,
    /// The aggregate.
    pub state: GameState,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned_room(catalog: &Catalog, level: u32) -> GameState {
        let mut s = GameState::initial(catalog);
        let level = Level::new(level).unwrap();
        s.workers.insert(
            JobId::ROOM,
            Worker {
                job_id: JobId::ROOM,
                level,
            },
        );
        s.refresh_job(catalog, JobId::ROOM, level).unwrap();
        s
    }

    #[test]
    fn initial_state_is_valid_and_empty() {
        let c = Catalog::standard();
        let s = GameState::initial(&c);
        assert_eq!(s.stashed_money, Shells::ZERO);
        assert!(s.workers.is_empty());
        assert_eq!(s.available_jobs.len(), 5);
        assert!(s.available_jobs.iter().all(|j| j.tier.level == Level::FIRST));
        s.validate(&c).unwrap();
    }

    #[test]
    fn already_bought_tracks_workers() {
        let c = Catalog::standard();
        let s = owned_room(&c, 3);
        assert!(s.already_bought(JobId::ROOM));
        assert!(!s.already_bought(JobId::POOL));
        assert_eq!(s.job(JobId::ROOM).unwrap().tier.level.get(), 3);
        s.validate(&c).unwrap();
    }

    #[test]
    fn upgrade_cost_is_next_tier() {
        let c = Catalog::standard();
        let s = owned_room(&c, 1);
        let expected = c.level_info(JobId::ROOM, Level::new(2).unwrap()).unwrap();
        assert_eq!(s.upgrade_cost(&c, JobId::ROOM), Some(expected.cost));

        let top = owned_room(&c, c.max_level(JobId::ROOM).get());
        assert_eq!(top.upgrade_cost(&c, JobId::ROOM), None);
    }

    #[test]
    fn validate_rejects_stale_tier() {
        let c = Catalog::standard();
        let mut s = owned_room(&c, 2);
        s.available_jobs[0].tier = c.level_info(JobId::ROOM, Level::FIRST).unwrap();
        assert_eq!(
            s.validate(&c),
            Err(StateError::TierMismatch { job: JobId::ROOM })
        );
    }

    #[test]
    fn validate_rejects_level_past_ceiling() {
        let c = Catalog::standard();
        let mut s = GameState::initial(&c);
        s.workers.insert(
            JobId::SUITE,
            Worker {
                job_id: JobId::SUITE,
                level: Level::new(99).unwrap(),
            },
        );
        assert!(matches!(s.validate(&c), Err(StateError::Catalog(_))));
    }

    #[test]
    fn validate_rejects_misordered_jobs() {
        let c = Catalog::standard();
        let mut s = GameState::initial(&c);
        s.available_jobs.swap(0, 1);
        assert_eq!(
            s.validate(&c),
            Err(StateError::AvailableJobsMismatch { found: 5 })
        );
    }

    #[test]
    fn validate_rejects_mis_keyed_worker() {
        let c = Catalog::standard();
        let mut s = GameState::initial(&c);
        s.workers.insert(
            JobId::POOL,
            Worker {
                job_id: JobId::SUITE,
                level: Level::FIRST,
            },
        );
        assert_eq!(
            s.validate(&c),
            Err(StateError::WorkerKeyMismatch {
                key: JobId::POOL,
                stored: JobId::SUITE,
            })
        );
    }
}
