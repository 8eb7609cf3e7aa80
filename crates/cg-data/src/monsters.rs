//! Monster races
//!
//! Only the fields level generation reads: depth, rarity, power and the
//! placement flags.

use cg_core::monster::{MonsterRace, RaceFlags};
use cg_core::world::WildGrid;

/// A monster race entry
#[derive(Debug, Clone, Copy)]
pub struct MonsterEntry {
    pub name: &'static str,
    pub symbol: char,
    /// Native depth
    pub level: i32,
    /// 1-in-N rarity; 0 never appears at random
    pub rarity: u32,
    pub power: u32,
    pub flags: RaceFlags,
    /// Wilderness columns the race is restricted to
    pub locations: &'static [WildGrid],
}

impl MonsterEntry {
    pub fn to_race(&self) -> MonsterRace {
        MonsterRace {
            name: self.name.to_string(),
            symbol: self.symbol,
            level: self.level,
            rarity: self.rarity,
            power: self.power,
            flags: self.flags,
            locations: self.locations.to_vec(),
        }
    }
}

const NONE: RaceFlags = RaceFlags::empty();
const FRIENDS: RaceFlags = RaceFlags::FRIENDS;
const UNIQUE: RaceFlags = RaceFlags::UNIQUE;
const FIXED: RaceFlags = RaceFlags::UNIQUE.union(RaceFlags::FIXED_ENCOUNTER);
const QUESTOR: RaceFlags = RaceFlags::UNIQUE
    .union(RaceFlags::QUESTOR)
    .union(RaceFlags::NO_RANDOM);

const fn mon(
    name: &'static str,
    symbol: char,
    level: i32,
    rarity: u32,
    power: u32,
    flags: RaceFlags,
) -> MonsterEntry {
    MonsterEntry {
        name,
        symbol,
        level,
        rarity,
        power,
        flags,
        locations: &[],
    }
}

/// All monster races
pub static MONSTERS: &[MonsterEntry] = &[
    // Town
    mon("scruffy little dog", 'C', 0, 1, 1, NONE),
    mon("aimless-looking merchant", 'p', 0, 1, 1, NONE),
    mon("pitiful-looking wretch", 'p', 0, 1, 1, NONE),
    mon("village idiot", 't', 0, 1, 1, NONE),
    // Shallow dungeon
    mon("jackal", 'C', 1, 1, 2, FRIENDS),
    mon("floating eye", 'e', 1, 1, 3, RaceFlags::NEVER_MOVE),
    mon("kobold", 'k', 2, 1, 4, NONE),
    mon("cave spider", 'S', 2, 1, 4, FRIENDS),
    mon("Grip, Farmer Maggot's Dog", 'C', 2, 1, 8, FIXED),
    mon("Fang, Farmer Maggot's Dog", 'C', 5, 1, 12, FIXED),
    mon("cave orc", 'o', 7, 1, 12, FRIENDS),
    mon("Bullroarer the Hobbit", 'h', 10, 3, 30, UNIQUE),
    mon("snaga", 'o', 9, 1, 10, FRIENDS),
    // Middle depths
    mon("giant frog", 'R', 12, 2, 15, RaceFlags::AQUATIC),
    mon("hill troll", 'T', 15, 1, 40, FRIENDS),
    mon("disenchanter mold", 'm', 16, 2, 20, RaceFlags::NEVER_MOVE),
    mon("warg", 'C', 18, 2, 30, FRIENDS),
    MonsterEntry {
        locations: &[WildGrid::new(0, 1), WildGrid::new(1, 1)],
        ..mon("Old Man Willow", 'l', 22, 3, 80, FIXED.union(RaceFlags::NEVER_MOVE))
    },
    mon("ogre", 'O', 25, 2, 60, NONE),
    mon("young blue dragon", 'd', 29, 2, 120, NONE),
    // Deep
    mon("kraken", 'l', 40, 4, 250, RaceFlags::AQUATIC),
    mon("mature white dragon", 'd', 35, 2, 200, NONE),
    mon("dread", 'G', 40, 2, 220, FRIENDS),
    mon("greater basilisk", 'R', 55, 3, 500, NONE),
    mon("great wyrm of chaos", 'D', 75, 3, 1200, NONE),
    // Quest targets
    mon("Sauron, the Sorcerer", 'p', 99, 1, 3000, QUESTOR),
    mon("Morgoth, Lord of Darkness", 'P', 100, 1, 5000, QUESTOR),
];

/// Get a monster race by name
pub fn get_monster(name: &str) -> Option<&'static MonsterEntry> {
    MONSTERS.iter().find(|m| m.name == name)
}

/// Get the number of monster races
pub fn num_monsters() -> usize {
    MONSTERS.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_town_has_residents() {
        let town = MONSTERS.iter().filter(|m| m.level == 0 && m.rarity > 0).count();
        assert!(town >= 3);
    }

    #[test]
    fn test_quest_targets_never_random() {
        for m in MONSTERS.iter().filter(|m| m.flags.contains(RaceFlags::QUESTOR)) {
            assert!(!m.to_race().randomly_allowed(m.level), "{}", m.name);
        }
    }

    #[test]
    fn test_fixed_encounters_are_unique() {
        for m in MONSTERS.iter().filter(|m| m.flags.contains(RaceFlags::FIXED_ENCOUNTER)) {
            assert!(m.flags.contains(RaceFlags::UNIQUE), "{}", m.name);
        }
        let willow = get_monster("Old Man Willow").unwrap().to_race();
        assert_eq!(willow.locations.len(), 2);
    }
}
