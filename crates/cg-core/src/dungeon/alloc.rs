//! Shared placement helpers for builders
//!
//! Stairs, mineral streamers, monsters and objects. Every search is bounded;
//! a helper that runs out of tries places fewer things rather than looping.

use super::arena::GenArena;
use super::builders::BuildContext;
use super::cell::{CellFlags, Loc, Terrain};
use super::chunk::Chunk;
use super::errors::GenFailure;
use super::select::reservoir_pick;
use crate::catalog::StreamerParams;
use crate::monster::{Monster, RaceFlags, RaceId};
use crate::object::{ArtifactKey, Object};
use crate::player::PlayerId;
use crate::rng::{GameRng, RandomValue};
use crate::{CELL_SEARCH_TRIES, MAX_DEPTH};

/// Random empty floor cell accepted by `filter`
pub fn find_empty(
    chunk: &Chunk,
    rng: &mut GameRng,
    filter: impl Fn(&Chunk, Loc) -> bool,
) -> Option<Loc> {
    chunk.find_loc(rng, CELL_SEARCH_TRIES, |c, loc| c.is_empty(loc) && filter(c, loc))
}

fn wall_neighbours(chunk: &Chunk, loc: Loc) -> usize {
    loc.orthogonal()
        .into_iter()
        .filter(|&n| chunk.get(n).is_some_and(|c| c.terrain.is_wall()))
        .count()
}

/// Place `count` staircases of `terrain`, preferring corridor corners
pub fn alloc_stairs(chunk: &mut Chunk, rng: &mut GameRng, terrain: Terrain, count: usize) -> usize {
    let mut placed = 0;
    for _ in 0..count {
        let usable = |c: &Chunk, loc: Loc| !c.cell(loc).has(CellFlags::NO_STAIRS);
        let loc = find_empty(chunk, rng, |c, loc| usable(c, loc) && wall_neighbours(c, loc) >= 2)
            .or_else(|| find_empty(chunk, rng, usable));
        let Some(loc) = loc else { break };
        chunk.set_terrain(loc, terrain);
        placed += 1;
    }
    placed
}

/// Roll and place the staircases of a level
///
/// The surface has no up staircase and the bottom of the world no down
/// staircase. A level that needs stairs but gets none is rejected.
pub fn place_stairs(
    chunk: &mut Chunk,
    rng: &mut GameRng,
    up: RandomValue,
    down: RandomValue,
) -> Result<(), GenFailure> {
    let depth = chunk.depth();
    let ups = if depth > 0 { up.roll(rng, depth).max(1) as usize } else { 0 };
    let downs = if depth < MAX_DEPTH - 1 { down.roll(rng, depth).max(1) as usize } else { 0 };

    let placed_up = alloc_stairs(chunk, rng, Terrain::UpStairs, ups);
    let placed_down = alloc_stairs(chunk, rng, Terrain::DownStairs, downs);
    if (ups > 0 && placed_up == 0) || (downs > 0 && placed_down == 0) {
        return Err(GenFailure::builder("no room for stairs"));
    }
    Ok(())
}

/// Run magma and quartz veins through plain granite
pub fn alloc_streamers(chunk: &mut Chunk, rng: &mut GameRng, params: &StreamerParams) {
    for _ in 0..params.mag {
        build_streamer(chunk, rng, Terrain::Magma, Terrain::MagmaTreasure, params.mc, params);
    }
    for _ in 0..params.qua {
        build_streamer(chunk, rng, Terrain::Quartz, Terrain::QuartzTreasure, params.qc, params);
    }
}

const DIRS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

fn build_streamer(
    chunk: &mut Chunk,
    rng: &mut GameRng,
    vein: Terrain,
    treasure: Terrain,
    chance: u32,
    params: &StreamerParams,
) {
    let mut loc = chunk.random_loc(rng);
    let (dx, dy) = DIRS[rng.randint0(DIRS.len() as u32) as usize];
    let spread = params.rng as i32;
    let max_steps = chunk.width + chunk.height;

    for _ in 0..max_steps {
        for _ in 0..params.den {
            let at = loc.offset(
                rng.range(-spread, spread),
                rng.range(-spread, spread),
            );
            if !chunk.in_bounds_fully(at) {
                continue;
            }
            let cell = chunk.cell_mut(at);
            if cell.terrain != Terrain::Granite || !cell.flags.is_empty() {
                continue;
            }
            cell.terrain = if chance > 0 && rng.one_in(chance) { treasure } else { vein };
        }

        loc = loc.offset(dx, dy);
        if !chunk.in_bounds(loc) {
            break;
        }
    }
}

/// Pick a race for random population at `level`
pub fn pick_race(chunk: &Chunk, ctx: &mut BuildContext<'_>, level: i32) -> Option<RaceId> {
    let races: Vec<(RaceId, u32)> = ctx
        .catalog
        .races()
        .filter(|(id, race)| {
            race.randomly_allowed(level)
                && race.allowed_at(&chunk.wpos)
                && !(race.is_unique() && chunk.has_race(*id))
        })
        .map(|(id, race)| (id, (100 / race.rarity.max(1)).max(1)))
        .collect();
    reservoir_pick(&races, |(_, w)| *w, ctx.rng).map(|(id, _)| *id)
}

/// Put one monster of `race` at `loc`, plus companions for social races
pub fn place_monster_at(
    chunk: &mut Chunk,
    ctx: &mut BuildContext<'_>,
    loc: Loc,
    race_id: RaceId,
    asleep: bool,
) -> usize {
    let catalog = ctx.catalog;
    let Some(race) = catalog.race(race_id) else {
        return 0;
    };
    if !chunk.is_empty(loc) && chunk.cell(loc).terrain != Terrain::Water {
        return 0;
    }

    let mut monster = Monster::new(race_id, loc);
    monster.asleep = asleep;
    let friends = race.flags.contains(RaceFlags::FRIENDS);
    if friends {
        monster = monster.grouped();
    }
    chunk.add_monster(monster, race.power);

    let mut placed = 1;
    if friends {
        let extra = ctx.rng.randint1(3) as usize;
        let spots: Vec<Loc> = loc.adjacent().filter(|&n| chunk.is_empty(n)).take(extra).collect();
        for spot in spots {
            let mut friend = Monster::new(race_id, spot).grouped();
            friend.asleep = asleep;
            chunk.add_monster(friend, race.power);
            placed += 1;
        }
    }
    placed
}

/// Scatter random monsters outside restricted cells
pub fn alloc_monsters(chunk: &mut Chunk, ctx: &mut BuildContext<'_>, count: usize, level: i32) -> usize {
    let mut placed = 0;
    for _ in 0..count {
        let Some(race) = pick_race(chunk, ctx, level) else { break };
        let Some(loc) = find_empty(chunk, ctx.rng, |c, loc| !c.cell(loc).has(CellFlags::MON_RESTRICT))
        else {
            break;
        };
        let asleep = !ctx.rng.one_in(4);
        placed += place_monster_at(chunk, ctx, loc, race, asleep);
    }
    placed
}

/// Try to turn a good object into an artifact
fn roll_artifact(
    arena: &mut GenArena,
    ctx: &mut BuildContext<'_>,
    level: i32,
    player: Option<PlayerId>,
) -> Result<Option<(ArtifactKey, String, u32)>, GenFailure> {
    let catalog = ctx.catalog;
    for (id, def) in catalog.artifacts() {
        if def.level > level {
            continue;
        }
        let key = match (def.randomized, player) {
            (false, _) => ArtifactKey::True(id),
            (true, Some(player)) => ArtifactKey::Randomized { player, id },
            (true, None) => continue,
        };
        if !ctx.artifacts.is_available(key) || !ctx.rng.one_in(def.rarity.max(1)) {
            continue;
        }
        arena.roll_artifact(ctx.artifacts, key)?;
        tracing::debug!(artifact = %def.name, level, "artifact rolled");
        return Ok(Some((key, def.name.clone(), def.rating)));
    }
    Ok(None)
}

/// Put one object at `loc`; good objects may become artifacts
pub fn place_object_at(
    chunk: &mut Chunk,
    arena: &mut GenArena,
    ctx: &mut BuildContext<'_>,
    loc: Loc,
    level: i32,
    good: bool,
    player: Option<PlayerId>,
) -> Result<bool, GenFailure> {
    if good && let Some((key, name, rating)) = roll_artifact(arena, ctx, level, player)? {
        chunk.add_object(Object::artifact(name, loc, level, rating, key));
        return Ok(true);
    }

    let catalog = ctx.catalog;
    let Some(kind) = reservoir_pick(
        catalog.kinds(),
        |k| u32::from(k.level <= level),
        ctx.rng,
    ) else {
        return Ok(false);
    };

    let mut rating = kind.rating;
    if good {
        rating += 10 + ctx.rng.m_bonus(10, level) as u32;
    }
    let mut object = Object::new(kind.name.clone(), loc, level, rating);
    object.good = good;
    object.owner = player;
    chunk.add_object(object);
    Ok(true)
}

/// Scatter random objects, preferring rooms
pub fn alloc_objects(
    chunk: &mut Chunk,
    arena: &mut GenArena,
    ctx: &mut BuildContext<'_>,
    count: usize,
    level: i32,
    player: Option<PlayerId>,
) -> Result<usize, GenFailure> {
    let mut placed = 0;
    for _ in 0..count {
        let loc = find_empty(chunk, ctx.rng, |c, loc| c.cell(loc).has(CellFlags::ROOM))
            .or_else(|| find_empty(chunk, ctx.rng, |_, _| true));
        let Some(loc) = loc else { break };
        let good = ctx.rng.one_in(20);
        if place_object_at(chunk, arena, ctx, loc, level, good, player)? {
            placed += 1;
        }
    }
    Ok(placed)
}

/// Default monster count for a level at `depth`
pub fn monster_count(rng: &mut GameRng, depth: i32) -> usize {
    let k = (depth / 3).clamp(2, 10) as u32;
    (crate::MIN_LEVEL_MONSTERS + rng.randint1(8) + k) as usize
}

/// Default object count for a level at `depth`
pub fn object_count(rng: &mut GameRng, depth: i32) -> usize {
    (crate::MIN_LEVEL_OBJECTS + rng.randint0(5) + (depth / 10).max(0) as u32) as usize
}
