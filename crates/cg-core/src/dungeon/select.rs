//! Cave profile selection
//!
//! Surface levels map straight to a town or wilderness profile. Dungeon
//! levels first go through a fixed list of overrides, then fall back to a
//! single weighted pass over the catalog.

use std::sync::Arc;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::catalog::{CLASSIC_PROFILE, Catalog, CatalogError, CaveProfile};
use crate::rng::GameRng;
use crate::world::WorldPos;

/// What kind of surface column a depth-0 level sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// A town; `static_layout` towns come from a fixed town file
    Town { static_layout: bool },
    Wilderness,
}

bitflags! {
    /// Flags of the dungeon a level belongs to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DungeonFlags: u8 {
        const ARENA = 0x01;
        const CAVERN = 0x02;
        const MAZE = 0x04;
    }
}

impl Serialize for DungeonFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DungeonFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(DungeonFlags::from_bits_truncate(bits))
    }
}

/// World facts about the requested location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelContext {
    pub surface: SurfaceKind,
    pub dungeon: DungeonFlags,
    /// A quest is fought on this level
    pub quest_level: bool,
    /// Level content is fixed and must not be randomized
    pub non_random: bool,
}

impl Default for LevelContext {
    fn default() -> Self {
        Self {
            surface: SurfaceKind::Wilderness,
            dungeon: DungeonFlags::empty(),
            quest_level: false,
            non_random: false,
        }
    }
}

impl LevelContext {
    pub fn town(static_layout: bool) -> Self {
        Self {
            surface: SurfaceKind::Town { static_layout },
            ..Self::default()
        }
    }

    pub fn dungeon(flags: DungeonFlags) -> Self {
        Self {
            dungeon: flags,
            ..Self::default()
        }
    }

    /// Quest and fixed levels are never randomized
    pub fn is_random(&self) -> bool {
        !self.quest_level && !self.non_random
    }
}

/// Does this depth roll a labyrinth
///
/// Never above depth 13; otherwise 2% plus 1% for each of 3, 5, 7, 11 and
/// 13 that divides the depth.
pub fn labyrinth_check(depth: i32, rng: &mut GameRng) -> bool {
    if depth < 13 {
        return false;
    }
    let chance = 2 + [3, 5, 7, 11, 13]
        .iter()
        .filter(|&&d| depth % d == 0)
        .count() as u32;
    rng.randint0(100) < chance
}

/// Weighted single-pass reservoir pick
///
/// Each candidate with weight `w > 0` replaces the current choice with
/// probability `w / total_so_far`, which leaves every candidate chosen with
/// probability `w / sum(w)`. The running total saturates at `u32::MAX`.
pub fn reservoir_pick<'a, T>(
    items: impl IntoIterator<Item = &'a T>,
    weight: impl Fn(&T) -> u32,
    rng: &mut GameRng,
) -> Option<&'a T> {
    let mut total = 0u32;
    let mut choice = None;
    for item in items {
        let alloc = weight(item);
        if alloc == 0 {
            continue;
        }
        total = total.saturating_add(alloc);
        if rng.randint0(total) < alloc {
            choice = Some(item);
        }
    }
    choice
}

/// Pick the cave profile for a level
pub fn select_profile(
    catalog: &Catalog,
    wpos: WorldPos,
    context: &LevelContext,
    rng: &mut GameRng,
) -> Result<Arc<CaveProfile>, CatalogError> {
    let profile = choose(catalog, wpos, context, rng)?;
    tracing::info!(profile = %profile.name, depth = wpos.depth, "Dungeon profile: {} @ {}", profile.name, wpos.depth);
    Ok(profile)
}

fn choose(
    catalog: &Catalog,
    wpos: WorldPos,
    context: &LevelContext,
    rng: &mut GameRng,
) -> Result<Arc<CaveProfile>, CatalogError> {
    let depth = wpos.depth;

    if wpos.is_surface() {
        let name = match context.surface {
            SurfaceKind::Town { static_layout: true } => "town",
            SurfaceKind::Town { static_layout: false } => "mang_town",
            SurfaceKind::Wilderness => "wilderness",
        };
        return catalog.require(name);
    }

    if !context.is_random() {
        return catalog.require(CLASSIC_PROFILE);
    }
    if context.dungeon.contains(DungeonFlags::ARENA) && rng.one_in(15) {
        return catalog.require("arena");
    }
    if context.dungeon.contains(DungeonFlags::CAVERN) && rng.one_in(20) {
        return catalog.require("cavern");
    }

    let maze = context.dungeon.contains(DungeonFlags::MAZE) || labyrinth_check(depth, rng);
    if maze && catalog.alloc_of("labyrinth") != 0 {
        return catalog.require("labyrinth");
    }
    if (10..40).contains(&depth) && rng.one_in(40) && catalog.alloc_of("moria") != 0 {
        return catalog.require("moria");
    }
    if (rng.randint0(200) as i32) < depth && catalog.alloc_of("modified") != 0 {
        return catalog.require("modified");
    }

    let weighted = reservoir_pick(
        catalog.profiles(),
        |p| {
            if p.alloc > 0 && p.min_level <= depth {
                p.alloc as u32
            } else {
                0
            }
        },
        rng,
    );
    match weighted {
        Some(profile) => Ok(Arc::clone(profile)),
        None => catalog.require(CLASSIC_PROFILE),
    }
}
