//! Strongly-typed identifiers: [`JobId`] and [`Level`].

use std::fmt;

use crate::error::GameError;

/// Identifies one of the five purchasable hotel jobs.
///
/// The set of jobs is closed: only ids `1..=5` exist. Construct through
/// [`JobId::new`] (fallible) or use the associated constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(u8);

impl JobId {
    /// Single room.
    pub const ROOM: JobId = JobId(1);
    /// Double room.
    pub const DOUBLE_ROOM: JobId = JobId(2);
    /// Suite.
    pub const SUITE: JobId = JobId(3);
    /// Pool.
    pub const POOL: JobId = JobId(4);
    /// Restaurant.
    pub const RESTAURANT: JobId = JobId(5);

    /// Every job id, in catalog order.
    pub const ALL: [JobId; 5] = [
        Self::ROOM,
        Self::DOUBLE_ROOM,
        Self::SUITE,
        Self::POOL,
        Self::RESTAURANT,
    ];

    /// Validate a raw id.
    ///
    /// Returns [`GameError::UnknownJob`] for anything outside `1..=5`.
    pub fn new(raw: u8) -> Result<Self, GameError> {
        if (1..=5).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(GameError::UnknownJob { id: raw })
        }
    }

    /// The raw numeric id.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position in [`JobId::ALL`].
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Display name of the amenity.
    pub fn name(self) -> &'static str {
        match self.0 {
            1 => "Room",
            2 => "Double Room",
            3 => "Suite",
            4 => "Pool",
            _ => "Restaurant",
        }
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for JobId {
    type Error = GameError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

/// A job's upgrade rank. Always at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Level(pub(crate) u32);

impl Level {
    /// The level every job starts at.
    pub const FIRST: Level = Level(1);

    /// Build a level, rejecting zero.
    pub fn new(raw: u32) -> Option<Self> {
        (raw >= 1).then_some(Self(raw))
    }

    /// The raw level number.
    pub fn get(self) -> u32 {
        self.0
    }

    /// The following level, or `None` on `u32` overflow.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
