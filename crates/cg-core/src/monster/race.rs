//! Monster races (catalog entries)

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::world::{WildGrid, WorldPos};

/// Index of a race in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RaceId(pub u16);

bitflags! {
    /// Race flags relevant to level generation
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RaceFlags: u16 {
        const UNIQUE = 0x0001;
        /// Target of a player quest
        const QUESTOR = 0x0002;
        /// Guaranteed once per eligible level for each player
        const FIXED_ENCOUNTER = 0x0004;
        /// Lives in water
        const AQUATIC = 0x0008;
        /// Stationary
        const NEVER_MOVE = 0x0010;
        /// Appears with companions
        const FRIENDS = 0x0020;
        /// Excluded from random level population
        const NO_RANDOM = 0x0040;
    }
}

impl Serialize for RaceFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RaceFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u16::deserialize(deserializer)?;
        Ok(RaceFlags::from_bits_truncate(bits))
    }
}

/// A monster race definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterRace {
    pub name: String,
    pub symbol: char,
    /// Native depth
    pub level: i32,
    /// 1-in-N allocation rarity; 0 never appears randomly
    pub rarity: u32,
    /// Contribution to the level's monster rating
    pub power: u32,
    #[serde(default)]
    pub flags: RaceFlags,
    /// Wilderness columns the race is restricted to; empty means anywhere
    #[serde(default)]
    pub locations: Vec<WildGrid>,
}

impl MonsterRace {
    /// Whether the race's location constraint admits this world position
    pub fn allowed_at(&self, wpos: &WorldPos) -> bool {
        self.locations.is_empty() || self.locations.contains(&wpos.grid)
    }

    pub fn is_unique(&self) -> bool {
        self.flags.contains(RaceFlags::UNIQUE)
    }

    /// Can be picked by random level population at this depth
    pub fn randomly_allowed(&self, depth: i32) -> bool {
        self.rarity > 0
            && self.level <= depth
            && !self
                .flags
                .intersects(RaceFlags::NO_RANDOM | RaceFlags::QUESTOR | RaceFlags::FIXED_ENCOUNTER)
    }
}
