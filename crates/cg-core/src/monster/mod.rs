//! Monsters on generated levels

mod race;

use serde::{Deserialize, Serialize};

use crate::dungeon::Loc;

pub use race::{MonsterRace, RaceFlags, RaceId};

/// Unique identifier for a monster within one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonsterId(pub u32);

impl MonsterId {
    pub fn next(self) -> Self {
        MonsterId(self.0 + 1)
    }
}

/// A monster placed on a level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub race: RaceId,
    pub loc: Loc,
    pub asleep: bool,
    /// Placed as part of a group
    pub grouped: bool,
}

impl Monster {
    /// A fresh, awake, solitary monster; the chunk assigns the id
    pub fn new(race: RaceId, loc: Loc) -> Self {
        Self {
            id: MonsterId(0),
            race,
            loc,
            asleep: false,
            grouped: false,
        }
    }

    pub fn asleep(mut self) -> Self {
        self.asleep = true;
        self
    }

    pub fn grouped(mut self) -> Self {
        self.grouped = true;
        self
    }
}
