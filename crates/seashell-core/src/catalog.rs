//! Static job definitions and their per-level economics.
//!
//! A [`Catalog`] holds exactly one [`JobDefinition`] per [`JobId`], each
//! an ordered list of [`LevelTier`]s starting at level 1. The catalog is
//! immutable after construction and is shared between the engine and its
//! worker threads through an `Arc`.

use std::time::Duration;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::currency::Shells;
use crate::error::CatalogError;
use crate::id::{JobId, Level};

/// Number of levels authored for every job in [`Catalog::standard`].
pub const STANDARD_MAX_LEVEL: u32 = 10;

/// Economics of one job at one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelTier {
    /// The level this tier describes.
    pub level: Level,
    /// Price to reach this level (purchase price at level 1).
    pub cost: Shells,
    /// Payout of one completed production cycle.
    pub earn: Shells,
    /// Length of one production cycle.
    pub duration: Duration,
}

/// All authored tiers of a single job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobDefinition {
    /// The job described.
    pub id: JobId,
    /// Tiers ordered by level, starting at 1.
    pub tiers: SmallVec<[LevelTier; 10]>,
}

impl JobDefinition {
    /// Highest authored level.
    ///
    /// Only meaningful on a validated definition (non-empty tiers).
    pub fn max_level(&self) -> Level {
        self.tiers.last().map_or(Level::FIRST, |t| t.level)
    }

    /// Whether cost, earn and duration never decrease with level.
    pub fn is_monotonic(&self) -> bool {
        self.tiers.windows(2).all(|w| {
            w[0].cost <= w[1].cost && w[0].earn <= w[1].earn && w[0].duration <= w[1].duration
        })
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.tiers.is_empty() {
            return Err(CatalogError::EmptyTiers { job: self.id });
        }
        for (position, tier) in self.tiers.iter().enumerate() {
            if tier.level.get() as usize != position + 1 {
                return Err(CatalogError::NonContiguousLevels {
                    job: self.id,
                    position,
                    found: tier.level.get(),
                });
            }
        }
        Ok(())
    }
}

/// The complete, validated set of job definitions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    jobs: IndexMap<JobId, JobDefinition>,
}

impl Catalog {
    /// Build a catalog from authored definitions.
    ///
    /// Every job id must appear exactly once with a non-empty, contiguous
    /// tier list. Definitions are stored in id order regardless of input
    /// order. Curves that are not monotonic are accepted with a warning.
    pub fn new(definitions: Vec<JobDefinition>) -> Result<Self, CatalogError> {
        let mut jobs = IndexMap::with_capacity(JobId::ALL.len());
        for def in definitions {
            def.validate()?;
            if !def.is_monotonic() {
                tracing::warn!(job = def.id.get(), "job economics decrease with level");
            }
            let id = def.id;
            if jobs.insert(id, def).is_some() {
                return Err(CatalogError::DuplicateJob { job: id });
            }
        }
        if let Some(&missing) = JobId::ALL.iter().find(|id| !jobs.contains_key(*id)) {
            return Err(CatalogError::MissingJob { job: missing });
        }
        jobs.sort_keys();
        Ok(Self { jobs })
    }

    /// The built-in hotel catalog.
    ///
    /// Each job has [`STANDARD_MAX_LEVEL`] tiers. Cost doubles per level,
    /// earn grows by half and the cycle lengthens by a tenth of its base.
    pub fn standard() -> Self {
        // (job, base cost, base earn, base duration in ms)
        const BASES: [(JobId, u64, u64, u64); 5] = [
            (JobId::ROOM, 10, 5, 2_000),
            (JobId::DOUBLE_ROOM, 100, 40, 5_000),
            (JobId::SUITE, 1_000, 300, 10_000),
            (JobId::POOL, 10_000, 2_500, 20_000),
            (JobId::RESTAURANT, 100_000, 20_000, 40_000),
        ];

        let jobs = BASES
            .iter()
            .map(|&(id, cost, earn, ms)| {
                let tiers = (0..STANDARD_MAX_LEVEL)
                    .map(|step| {
                        let grow = 3u64.pow(step);
                        let shrink = 2u64.pow(step);
                        LevelTier {
                            level: Level(step + 1),
                            cost: Shells::new(cost * shrink),
                            earn: Shells::new(earn * grow / shrink),
                            duration: Duration::from_millis(ms + ms * step as u64 / 10),
                        }
                    })
                    .collect();
                (id, JobDefinition { id, tiers })
            })
            .collect();
        Self { jobs }
    }

    /// Tier of `job` at `level`.
    ///
    /// Fails with [`CatalogError::LevelOutOfRange`] past the authored ceiling.
    pub fn level_info(&self, job: JobId, level: Level) -> Result<LevelTier, CatalogError> {
        let def = self.definition(job);
        def.tiers
            .get(level.get() as usize - 1)
            .copied()
            .ok_or(CatalogError::LevelOutOfRange {
                job,
                level,
                max: def.max_level(),
            })
    }

    /// Like [`level_info`](Self::level_info) but takes an unchecked raw id.
    pub fn level_info_raw(&self, id: u8, level: Level) -> Result<LevelTier, CatalogError> {
        let job = JobId::new(id).map_err(|_| CatalogError::UnknownJob { id })?;
        self.level_info(job, level)
    }

    /// Highest authored level of `job`.
    pub fn max_level(&self, job: JobId) -> Level {
        self.definition(job).max_level()
    }

    /// The definition of `job`.
    pub fn definition(&self, job: JobId) -> &JobDefinition {
        // A validated catalog defines every id.
        &self.jobs[job.index()]
    }

    /// All definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &JobDefinition> {
        self.jobs.values()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

// Compile-time assertion: Catalog is shared read-only across threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Catalog>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn tier(level: u32, cost: u64, earn: u64, secs: u64) -> LevelTier {
        LevelTier {
            level: Level::new(level).unwrap(),
            cost: Shells::new(cost),
            earn: Shells::new(earn),
            duration: Duration::from_secs(secs),
        }
    }

    fn flat_defs() -> Vec<JobDefinition> {
        JobId::ALL
            .iter()
            .map(|&id| JobDefinition {
                id,
                tiers: smallvec![tier(1, 10, 5, 2), tier(2, 20, 8, 2)],
            })
            .collect()
    }

    #[test]
    fn standard_first_room_tier() {
        let c = Catalog::standard();
        let t = c.level_info(JobId::ROOM, Level::FIRST).unwrap();
        assert_eq!(t.cost, Shells::new(10));
        assert_eq!(t.earn, Shells::new(5));
        assert_eq!(t.duration, Duration::from_secs(2));
    }

    #[test]
    fn standard_curves_are_monotonic() {
        let c = Catalog::standard();
        for def in c.iter() {
            assert!(def.is_monotonic(), "job {} not monotonic", def.id);
            assert_eq!(def.max_level().get(), STANDARD_MAX_LEVEL);
        }
    }

    #[test]
    fn standard_passes_own_validation() {
        let defs: Vec<_> = Catalog::standard().iter().cloned().collect();
        assert_eq!(Catalog::new(defs).unwrap(), Catalog::standard());
    }

    #[test]
    fn level_out_of_range() {
        let c = Catalog::new(flat_defs()).unwrap();
        let err = c
            .level_info(JobId::POOL, Level::new(3).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::LevelOutOfRange {
                job: JobId::POOL,
                level: Level::new(3).unwrap(),
                max: Level::new(2).unwrap(),
            }
        );
    }

    #[test]
    fn raw_lookup_rejects_unknown_id() {
        let c = Catalog::standard();
        assert_eq!(
            c.level_info_raw(7, Level::FIRST),
            Err(CatalogError::UnknownJob { id: 7 })
        );
        assert!(c.level_info_raw(5, Level::FIRST).is_ok());
    }

    #[test]
    fn new_sorts_into_id_order() {
        let mut defs = flat_defs();
        defs.reverse();
        let c = Catalog::new(defs).unwrap();
        let ids: Vec<_> = c.iter().map(|d| d.id).collect();
        assert_eq!(ids, JobId::ALL.to_vec());
    }

    #[test]
    fn new_rejects_missing_and_duplicate() {
        let mut defs = flat_defs();
        defs.pop();
        assert_eq!(
            Catalog::new(defs),
            Err(CatalogError::MissingJob {
                job: JobId::RESTAURANT
            })
        );

        let mut defs = flat_defs();
        defs.push(defs[0].clone());
        assert_eq!(
            Catalog::new(defs),
            Err(CatalogError::DuplicateJob { job: JobId::ROOM })
        );
    }

    #[test]
    fn new_rejects_bad_tiers() {
        let mut defs = flat_defs();
        defs[1].tiers.clear();
        assert_eq!(
            Catalog::new(defs),
            Err(CatalogError::EmptyTiers {
                job: JobId::DOUBLE_ROOM
            })
        );

        let mut defs = flat_defs();
        defs[2].tiers[1].level = Level::new(4).unwrap();
        assert_eq!(
            Catalog::new(defs),
            Err(CatalogError::NonContiguousLevels {
                job: JobId::SUITE,
                position: 1,
                found: 4,
            })
        );
    }

    #[test]
    fn non_monotonic_curve_is_accepted() {
        let mut defs = flat_defs();
        defs[0].tiers[1].earn = Shells::new(1);
        assert!(!defs[0].is_monotonic());
        assert!(Catalog::new(defs).is_ok());
    }
}
