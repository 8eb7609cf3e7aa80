//! Labyrinth levels: a perfect maze carved on odd coordinates

use super::{BuildContext, BuildRequest, CaveBuilder};
use crate::dungeon::alloc::{alloc_monsters, alloc_objects, monster_count, object_count, place_stairs};
use crate::dungeon::arena::GenArena;
use crate::dungeon::cell::{Loc, Terrain};
use crate::dungeon::chunk::Chunk;
use crate::dungeon::errors::GenFailure;
use crate::rng::GameRng;
use crate::{DUNGEON_HGT, DUNGEON_WID};

/// Two-step moves between maze cells
const MAZE_DIRS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// A maze of one-cell corridors
///
/// Deeper labyrinths are larger, more often unlit and more often walled in
/// permanent rock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabyrinthBuilder;

impl CaveBuilder for LabyrinthBuilder {
    fn build(
        &self,
        req: &BuildRequest<'_>,
        arena: &mut GenArena,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Chunk, GenFailure> {
        let depth = req.depth().max(0);
        let grow = (depth / 10) as u32;
        let pref_h = 15 + 2 * ctx.rng.randint0(grow + 1) as usize;
        let pref_w = 51 + 10 * ctx.rng.randint0(grow + 1) as usize;
        let (h, w) = req.dimensions(ctx.config, pref_h, pref_w);
        let height = make_odd(h, ctx.config.max_height);
        let width = make_odd(w, ctx.config.max_width);

        let permanent = ctx.rng.randint0(100) < (depth as u32).min(60);
        let lit = ctx.rng.randint0(depth as u32 + 1) < 25 || ctx.rng.one_in(3);

        let mut chunk = Chunk::new(req.wpos, height, width);
        let wall = if permanent { Terrain::PermanentWall } else { Terrain::Granite };
        for loc in chunk.locs() {
            chunk.set_terrain(loc, wall);
        }
        chunk.draw_boundary();
        carve_maze(&mut chunk, ctx.rng);

        place_stairs(&mut chunk, ctx.rng, req.profile.up, req.profile.down)?;

        // Population scales with the area
        let area = (height * width) as f64 / (DUNGEON_HGT * DUNGEON_WID) as f64;
        let monsters = (monster_count(ctx.rng, depth) as f64 * area).ceil() as usize;
        alloc_monsters(&mut chunk, ctx, monsters, depth);
        let objects = (object_count(ctx.rng, depth) as f64 * area).ceil() as usize;
        alloc_objects(&mut chunk, arena, ctx, objects, depth, req.player.map(|p| p.id))?;

        if lit {
            chunk.illuminate();
        }
        tracing::debug!(height, width, permanent, lit, "labyrinth built");
        Ok(chunk)
    }
}

fn make_odd(n: usize, max: usize) -> usize {
    if n % 2 == 1 {
        n
    } else if n < max {
        n + 1
    } else {
        n - 1
    }
}

fn is_maze_cell(chunk: &Chunk, loc: Loc) -> bool {
    loc.x % 2 == 1 && loc.y % 2 == 1 && chunk.in_bounds_fully(loc)
}

/// Recursive backtracker with an explicit stack
fn carve_maze(chunk: &mut Chunk, rng: &mut GameRng) {
    let cols = ((chunk.width - 1) / 2) as u32;
    let rows = ((chunk.height - 1) / 2) as u32;
    let start = Loc::new(
        2 * rng.randint0(cols) as i32 + 1,
        2 * rng.randint0(rows) as i32 + 1,
    );

    let mut stack = Vec::with_capacity((cols * rows) as usize);
    chunk.set_terrain(start, Terrain::Floor);
    stack.push(start);

    while let Some(&loc) = stack.last() {
        let mut open = [(0, 0); 4];
        let mut n = 0;
        for (dx, dy) in MAZE_DIRS {
            let next = loc.offset(2 * dx, 2 * dy);
            if is_maze_cell(chunk, next) && chunk.cell(next).terrain != Terrain::Floor {
                open[n] = (dx, dy);
                n += 1;
            }
        }

        if n == 0 {
            stack.pop();
            continue;
        }
        let (dx, dy) = open[rng.randint0(n as u32) as usize];
        chunk.set_terrain(loc.offset(dx, dy), Terrain::Floor);
        let next = loc.offset(2 * dx, 2 * dy);
        chunk.set_terrain(next, Terrain::Floor);
        stack.push(next);
    }
}
