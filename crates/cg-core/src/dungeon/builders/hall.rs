//! Arena levels: a single open hall

use super::{BuildContext, BuildRequest, CaveBuilder};
use crate::dungeon::alloc::{alloc_monsters, alloc_objects, monster_count, object_count, place_stairs};
use crate::dungeon::arena::GenArena;
use crate::dungeon::cell::{CellFlags, Loc, Terrain};
use crate::dungeon::chunk::Chunk;
use crate::dungeon::errors::GenFailure;
use crate::{MIN_CHUNK_HGT, MIN_CHUNK_WID};

/// One lit hall filling the level, dotted with pillars
#[derive(Debug, Clone, Copy, Default)]
pub struct HallBuilder;

impl CaveBuilder for HallBuilder {
    fn build(
        &self,
        req: &BuildRequest<'_>,
        arena: &mut GenArena,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Chunk, GenFailure> {
        let depth = req.depth();
        let pref_h = MIN_CHUNK_HGT * 2 + ctx.rng.randint0(MIN_CHUNK_HGT as u32) as usize;
        let pref_w = MIN_CHUNK_WID * 2 + ctx.rng.randint0(MIN_CHUNK_WID as u32) as usize;
        let (height, width) = req.dimensions(ctx.config, pref_h, pref_w);

        let mut chunk = Chunk::new(req.wpos, height, width);
        let top_left = Loc::new(1, 1);
        let bottom_right = Loc::new(width as i32 - 2, height as i32 - 2);
        chunk.fill_rect(top_left, bottom_right, Terrain::Floor, CellFlags::ROOM | CellFlags::GLOW);
        chunk.draw_boundary();
        arena.add_room(Loc::new(width as i32 / 2, height as i32 / 2))?;

        // Isolated pillars never split the floor
        let spacing = if ctx.rng.one_in(2) { 4 } else { 6 };
        for loc in chunk.locs() {
            if loc.x % spacing == 2 && loc.y % spacing == 2 && chunk.in_bounds_fully(loc.offset(1, 1)) {
                let cell = chunk.cell_mut(loc);
                cell.terrain = Terrain::Granite;
                cell.flags = CellFlags::WALL_INNER;
            }
        }

        let centre = Loc::new(width as i32 / 2, height as i32 / 2);
        chunk.fill_rect(centre.offset(-1, -1), centre.offset(1, 1), Terrain::Floor, CellFlags::TRAINING);

        place_stairs(&mut chunk, ctx.rng, req.profile.up, req.profile.down)?;

        // Nowhere to hide
        let monsters = monster_count(ctx.rng, depth) / 2 + 1;
        alloc_monsters(&mut chunk, ctx, monsters, depth + 5);
        let objects = object_count(ctx.rng, depth) / 3;
        alloc_objects(&mut chunk, arena, ctx, objects, depth, req.player.map(|p| p.id))?;

        tracing::debug!(height, width, spacing, "arena built");
        Ok(chunk)
    }
}
