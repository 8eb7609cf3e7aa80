//! Plain rectangular and circular rooms

use super::{RoomBuilder, RoomSite, draw_outer_walls, room_area, room_is_lit};
use crate::dungeon::arena::GenArena;
use crate::dungeon::builders::BuildContext;
use crate::dungeon::cell::{CellFlags, Loc, Terrain};
use crate::dungeon::chunk::Chunk;
use crate::dungeon::errors::GenFailure;

/// A rectangle of floor inside an outer wall
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRoom;

impl RoomBuilder for SimpleRoom {
    fn build(
        &self,
        chunk: &mut Chunk,
        arena: &mut GenArena,
        ctx: &mut BuildContext<'_>,
        site: &RoomSite<'_>,
    ) -> Result<bool, GenFailure> {
        let max_h = site.profile.height.saturating_sub(2).max(3) as i32;
        let max_w = site.profile.width.saturating_sub(2).max(3) as i32;
        let h = ctx.rng.range(3, max_h) as usize;
        let w = ctx.rng.range(3, max_w) as usize;

        // Walls sit inside the checked margin
        let Some(top_left) = room_area(chunk, site.centre, h + 2, w + 2) else {
            return Ok(false);
        };
        let top_left = top_left.offset(1, 1);
        let bottom_right = top_left.offset(w as i32 - 1, h as i32 - 1);

        arena.add_room(site.centre)?;

        let mut flags = CellFlags::ROOM;
        if room_is_lit(site.depth, ctx.rng) {
            flags |= CellFlags::GLOW;
        }
        chunk.fill_rect(top_left, bottom_right, Terrain::Floor, flags);
        draw_outer_walls(chunk, top_left, bottom_right);
        Ok(true)
    }
}

/// A round room
#[derive(Debug, Clone, Copy, Default)]
pub struct CircularRoom;

impl RoomBuilder for CircularRoom {
    fn build(
        &self,
        chunk: &mut Chunk,
        arena: &mut GenArena,
        ctx: &mut BuildContext<'_>,
        site: &RoomSite<'_>,
    ) -> Result<bool, GenFailure> {
        let max_radius = (site.profile.height.min(site.profile.width) / 2).saturating_sub(1).max(2) as i32;
        let radius = ctx.rng.range(2, max_radius);
        let size = (2 * radius + 3) as usize;

        if room_area(chunk, site.centre, size, size).is_none() {
            return Ok(false);
        }
        arena.add_room(site.centre)?;

        let mut flags = CellFlags::ROOM;
        if room_is_lit(site.depth, ctx.rng) {
            flags |= CellFlags::GLOW;
        }

        let inside = radius * radius + radius;
        let wall = (radius + 1) * (radius + 1) + radius + 1;
        for dy in -radius - 1..=radius + 1 {
            for dx in -radius - 1..=radius + 1 {
                let d = dx * dx + dy * dy;
                let loc = site.centre.offset(dx, dy);
                let cell = chunk.cell_mut(loc);
                if d <= inside {
                    cell.terrain = Terrain::Floor;
                    cell.flags |= flags;
                } else if d <= wall {
                    cell.flags |= CellFlags::WALL_OUTER;
                }
            }
        }

        // Seal diagonal gaps in the ring so tunnels only enter through walls
        let ring: Vec<Loc> = (-radius - 1..=radius + 1)
            .flat_map(|dy| (-radius - 1..=radius + 1).map(move |dx| (dx, dy)))
            .map(|(dx, dy)| site.centre.offset(dx, dy))
            .filter(|&loc| chunk.cell(loc).has(CellFlags::WALL_OUTER))
            .filter(|&loc| {
                loc.orthogonal()
                    .iter()
                    .filter(|n| chunk.cell(**n).terrain == Terrain::Floor)
                    .count()
                    == 0
            })
            .collect();
        for loc in ring {
            let cell = chunk.cell_mut(loc);
            cell.flags.remove(CellFlags::WALL_OUTER);
            cell.flags |= CellFlags::WALL_SOLID;
        }
        Ok(true)
    }
}
