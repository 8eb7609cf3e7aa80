//! Rooms and vaults
//!
//! A cave profile lists room profiles in priority order. For each room it
//! wants, a builder rolls a rarity level and a 0..100 key, then walks the
//! list and takes the first profile the rolls admit. Rooms are placed on
//! untouched granite and recorded in the arena.

mod layout;
mod simple;

use std::fmt;
use std::sync::Arc;

use super::arena::GenArena;
use super::builders::BuildContext;
use super::cell::{CellFlags, Loc, Terrain};
use super::chunk::Chunk;
use super::errors::GenFailure;
use crate::catalog::{BuilderRegistry, CaveProfile, RoomProfile, VaultKind};
use crate::player::PlayerId;
use crate::rng::GameRng;

pub use layout::{TemplateRoom, VaultRoom};
pub use simple::{CircularRoom, SimpleRoom};

/// Where and what a room builder should build
#[derive(Debug, Clone, Copy)]
pub struct RoomSite<'a> {
    pub centre: Loc,
    pub profile: &'a RoomProfile,
    pub depth: i32,
    pub player: Option<PlayerId>,
}

/// A room layout algorithm
pub trait RoomBuilder: fmt::Debug + Send + Sync {
    /// Build a room around `site.centre`; `Ok(false)` when it does not fit
    fn build(
        &self,
        chunk: &mut Chunk,
        arena: &mut GenArena,
        ctx: &mut BuildContext<'_>,
        site: &RoomSite<'_>,
    ) -> Result<bool, GenFailure>;
}

/// Register the built-in room builders under their catalog names
pub fn register_defaults(registry: &mut BuilderRegistry) {
    registry.register_room("simple", Arc::new(SimpleRoom));
    registry.register_room("circular", Arc::new(CircularRoom));
    registry.register_room("template", Arc::new(TemplateRoom));
    registry.register_room("interesting", Arc::new(VaultRoom(VaultKind::Interesting)));
    registry.register_room("lesser_vault", Arc::new(VaultRoom(VaultKind::Lesser)));
    registry.register_room("greater_vault", Arc::new(VaultRoom(VaultKind::Greater)));
}

/// How unusual a room this slot may hold
///
/// One roll per rarity level; each passes with chance
/// `(50 + depth / 2) / dun_unusual`.
pub fn roll_room_rarity(profile: &CaveProfile, depth: i32, rng: &mut GameRng) -> u32 {
    let threshold = (50 + depth / 2).max(0) as u32;
    let mut rarity = 0;
    for _ in 0..profile.max_rarity {
        if rng.randint0(profile.dun_unusual) < threshold {
            rarity += 1;
        }
    }
    rarity
}

/// Room profiles the rolls admit, in priority order
pub fn room_candidates<'p>(
    profile: &'p CaveProfile,
    depth: i32,
    rarity: u32,
    key: u32,
    arena: &GenArena,
) -> impl Iterator<Item = &'p RoomProfile> {
    profile.rooms.iter().filter(move |room| {
        room.rarity <= rarity
            && room.level <= depth
            && key < room.cutoff
            && (!room.pit || arena.can_add_pit())
    })
}

/// First room profile the rolls admit
pub fn pick_room_profile<'p>(
    profile: &'p CaveProfile,
    depth: i32,
    rarity: u32,
    key: u32,
    arena: &GenArena,
) -> Option<&'p RoomProfile> {
    room_candidates(profile, depth, rarity, key, arena).next()
}

/// Top-left corner of an `height x width` area centred on `centre`, if the
/// whole area plus a one-cell margin is untouched granite inside the chunk
pub fn room_area(chunk: &Chunk, centre: Loc, height: usize, width: usize) -> Option<Loc> {
    let (h, w) = (height as i32, width as i32);
    let top_left = centre.offset(-w / 2, -h / 2);
    let bottom_right = top_left.offset(w - 1, h - 1);

    if !chunk.in_bounds_fully(top_left.offset(-1, -1))
        || !chunk.in_bounds_fully(bottom_right.offset(1, 1))
    {
        return None;
    }

    for x in top_left.x - 1..=bottom_right.x + 1 {
        for y in top_left.y - 1..=bottom_right.y + 1 {
            let cell = chunk.cell(Loc::new(x, y));
            if cell.terrain != Terrain::Granite || !cell.flags.is_empty() {
                return None;
            }
        }
    }
    Some(top_left)
}

/// Ring of outer wall around a rectangle, with solid corners
pub(crate) fn draw_outer_walls(chunk: &mut Chunk, top_left: Loc, bottom_right: Loc) {
    let (x1, y1, x2, y2) = (top_left.x - 1, top_left.y - 1, bottom_right.x + 1, bottom_right.y + 1);
    for x in x1..=x2 {
        for y in [y1, y2] {
            mark_wall(chunk, Loc::new(x, y), CellFlags::WALL_OUTER);
        }
    }
    for y in y1..=y2 {
        for x in [x1, x2] {
            mark_wall(chunk, Loc::new(x, y), CellFlags::WALL_OUTER);
        }
    }
    for corner in [Loc::new(x1, y1), Loc::new(x2, y1), Loc::new(x1, y2), Loc::new(x2, y2)] {
        mark_wall(chunk, corner, CellFlags::WALL_SOLID);
    }
}

fn mark_wall(chunk: &mut Chunk, loc: Loc, flag: CellFlags) {
    if chunk.in_bounds(loc) {
        let cell = chunk.cell_mut(loc);
        cell.terrain = Terrain::Granite;
        cell.flags.remove(CellFlags::WALL_OUTER | CellFlags::WALL_SOLID);
        cell.flags |= flag;
    }
}

/// Rooms get darker with depth
pub(crate) fn room_is_lit(depth: i32, rng: &mut GameRng) -> bool {
    depth <= rng.randint1(25) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::builders::testing;
    use crate::world::WorldPos;

    #[test]
    fn test_rarity_bounded_by_max() {
        let catalog = testing::catalog();
        let profile = catalog.require("classic").unwrap();
        let mut rng = GameRng::new(1);
        for depth in [1, 20, 60, 120] {
            for _ in 0..100 {
                assert!(roll_room_rarity(&profile, depth, &mut rng) <= profile.max_rarity);
            }
        }
    }

    #[test]
    fn test_pick_room_profile_gating() {
        let catalog = testing::catalog();
        let profile = catalog.require("classic").unwrap();
        let arena = GenArena::new(Default::default());

        // The vault needs rarity 2 and a key below 5
        let pick = pick_room_profile(&profile, 10, 2, 3, &arena).unwrap();
        assert_eq!(pick.name, "greater vault");
        let pick = pick_room_profile(&profile, 10, 1, 3, &arena).unwrap();
        assert_eq!(pick.name, "simple room");
        let pick = pick_room_profile(&profile, 10, 0, 70, &arena).unwrap();
        assert_eq!(pick.name, "circular room");
        assert!(pick_room_profile(&profile, 10, 0, 100, &arena).is_none());
    }

    #[test]
    fn test_room_area_needs_granite() {
        let mut chunk = Chunk::new(WorldPos::new(0, 0, 1), 22, 66);
        assert_eq!(room_area(&chunk, Loc::new(10, 10), 5, 7), Some(Loc::new(7, 8)));
        assert!(room_area(&chunk, Loc::new(2, 2), 5, 7).is_none());

        chunk.set_terrain(Loc::new(13, 12), Terrain::Floor);
        assert!(room_area(&chunk, Loc::new(10, 10), 5, 7).is_none());
    }

    #[test]
    fn test_outer_walls_have_solid_corners() {
        let mut chunk = Chunk::new(WorldPos::new(0, 0, 1), 22, 66);
        draw_outer_walls(&mut chunk, Loc::new(5, 5), Loc::new(9, 8));
        assert!(chunk.cell(Loc::new(4, 4)).has(CellFlags::WALL_SOLID));
        assert!(chunk.cell(Loc::new(10, 9)).has(CellFlags::WALL_SOLID));
        assert!(chunk.cell(Loc::new(7, 4)).has(CellFlags::WALL_OUTER));
        assert!(chunk.cell(Loc::new(4, 6)).has(CellFlags::WALL_OUTER));
        assert!(!chunk.cell(Loc::new(7, 4)).has(CellFlags::WALL_SOLID));
    }
}
