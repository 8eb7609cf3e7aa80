//! Artifact definitions
//!
//! True artifacts exist once per world. Randomized ones are rolled
//! separately for each player and only when a level is built for a player.

use cg_core::object::ArtifactDef;

/// An artifact entry
#[derive(Debug, Clone, Copy)]
pub struct ArtifactEntry {
    pub name: &'static str,
    /// Native depth
    pub level: i32,
    /// 1-in-N roll once the level qualifies
    pub rarity: u32,
    pub rating: u32,
    pub randomized: bool,
}

impl ArtifactEntry {
    pub fn to_def(&self) -> ArtifactDef {
        ArtifactDef {
            name: self.name.to_string(),
            level: self.level,
            rarity: self.rarity,
            rating: self.rating,
            randomized: self.randomized,
        }
    }
}

const fn art(name: &'static str, level: i32, rarity: u32, rating: u32) -> ArtifactEntry {
    ArtifactEntry {
        name,
        level,
        rarity,
        rating,
        randomized: false,
    }
}

const fn randart(name: &'static str, level: i32, rarity: u32, rating: u32) -> ArtifactEntry {
    ArtifactEntry {
        randomized: true,
        ..art(name, level, rarity, rating)
    }
}

/// All artifacts
pub static ARTIFACTS: &[ArtifactEntry] = &[
    // Lights
    art("the Phial of Galadriel", 5, 10, 20),
    art("the Star of Elendil", 30, 20, 40),
    art("the Arkenstone of Thrain", 60, 30, 60),
    // Weapons
    art("the Dagger 'Narthanc'", 10, 15, 25),
    art("the Long Sword 'Ringil'", 40, 40, 80),
    art("the Lance 'Eorlingas'", 20, 25, 35),
    // Armour
    art("the Soft Leather Armour of Himring", 15, 20, 30),
    art("the Metal Cap of Thengel", 10, 15, 25),
    // One per player
    randart("a Blade of Chaos of the Wanderer", 25, 30, 50),
    randart("an Amulet of the Magi of the Wanderer", 50, 50, 70),
];

/// Get an artifact by name
pub fn get_artifact(name: &str) -> Option<&'static ArtifactEntry> {
    ARTIFACTS.iter().find(|a| a.name == name)
}

/// Get the number of artifacts
pub fn num_artifacts() -> usize {
    ARTIFACTS.len()
}
