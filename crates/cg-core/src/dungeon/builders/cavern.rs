//! Cavern levels: one twisting cave, no rooms

use super::{BuildContext, BuildRequest, CaveBuilder};
use crate::dungeon::alloc::{alloc_monsters, alloc_objects, alloc_streamers, monster_count, object_count, place_stairs};
use crate::dungeon::arena::GenArena;
use crate::dungeon::cell::{Loc, Terrain};
use crate::dungeon::chunk::Chunk;
use crate::dungeon::errors::GenFailure;
use crate::rng::GameRng;
use crate::{DUNGEON_HGT, DUNGEON_WID};

/// Percentage of the interior a cavern opens up
const CAVERN_OPEN_PERCENT: usize = 30;

/// Walkers are given this many steps per interior cell
const CAVERN_STEPS_PER_CELL: usize = 12;

/// A cave dug by random walkers from the middle of the level
#[derive(Debug, Clone, Copy, Default)]
pub struct CavernBuilder;

impl CaveBuilder for CavernBuilder {
    fn build(
        &self,
        req: &BuildRequest<'_>,
        arena: &mut GenArena,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Chunk, GenFailure> {
        let depth = req.depth();
        let pref_h = ctx.rng.range(DUNGEON_HGT as i32 / 2, DUNGEON_HGT as i32) as usize;
        let pref_w = ctx.rng.range(DUNGEON_WID as i32 / 2, DUNGEON_WID as i32) as usize;
        let (height, width) = req.dimensions(ctx.config, pref_h, pref_w);

        let mut chunk = Chunk::new(req.wpos, height, width);
        chunk.draw_boundary();

        let interior = (height - 2) * (width - 2);
        let wanted = interior * CAVERN_OPEN_PERCENT / 100;
        let opened = dig_cave(&mut chunk, ctx.rng, wanted, interior * CAVERN_STEPS_PER_CELL);
        if opened < wanted / 2 {
            return Err(GenFailure::builder(format!("cavern too small ({opened} cells)")));
        }

        alloc_streamers(&mut chunk, ctx.rng, &req.profile.streamer);
        place_stairs(&mut chunk, ctx.rng, req.profile.up, req.profile.down)?;

        // Caverns are crowded and poor
        let monsters = monster_count(ctx.rng, depth) + (depth / 4).max(0) as usize;
        alloc_monsters(&mut chunk, ctx, monsters, depth);
        let objects = object_count(ctx.rng, depth) / 2;
        alloc_objects(&mut chunk, arena, ctx, objects, depth, req.player.map(|p| p.id))?;

        tracing::debug!(height, width, opened, "cavern built");
        Ok(chunk)
    }
}

/// Random walk from the centre until `wanted` cells are open
///
/// A single walker only ever steps onto its neighbours, so everything it
/// opens is one connected region.
fn dig_cave(chunk: &mut Chunk, rng: &mut GameRng, wanted: usize, max_steps: usize) -> usize {
    let mut loc = Loc::new(chunk.width as i32 / 2, chunk.height as i32 / 2);
    chunk.set_terrain(loc, Terrain::Floor);
    let mut opened = 1;

    for _ in 0..max_steps {
        if opened >= wanted {
            break;
        }
        let next = loc.orthogonal()[rng.randint0(4) as usize];
        if !chunk.in_bounds_fully(next) {
            continue;
        }
        if chunk.cell(next).terrain != Terrain::Floor {
            chunk.set_terrain(next, Terrain::Floor);
            opened += 1;
        }
        loc = next;
    }
    opened
}
