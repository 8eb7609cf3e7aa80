//! Work done on a level once it has been accepted
//!
//! Quest and fixed-encounter monsters, the level feeling, hidden feeling
//! cells, lighting, and the final artifact bookkeeping. Nothing here can
//! reject the level; placements that do not fit are reported and skipped.

use serde::Serialize;

use super::cell::{CellFlags, Loc, Terrain};
use super::chunk::Chunk;
use super::feeling::{mon_feeling, obj_feeling};
use super::select::LevelContext;
use crate::catalog::{Catalog, CaveProfile};
use crate::monster::{Monster, MonsterRace, RaceFlags, RaceId};
use crate::object::mark_generated_if_ready;
use crate::player::{Player, PlayerId};
use crate::rng::GameRng;
use crate::world::{GenConfig, World};
use crate::{ENCOUNTER_PLACEMENT_TRIES, FEELING_PLACEMENT_TRIES};

/// What the post-generation pass did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostGenReport {
    /// Encounter races placed on the level
    pub placed: Vec<RaceId>,
    /// Encounter races that found no room, or a level already at capacity
    pub skipped: Vec<RaceId>,
    pub feeling_cells: usize,
    pub artifacts_marked: usize,
}

/// Where an encounter race may stand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Water,
    TrainingGround,
    Floor,
}

impl Placement {
    fn for_race(race: &MonsterRace) -> Self {
        if race.flags.contains(RaceFlags::AQUATIC) {
            Placement::Water
        } else if race.flags.contains(RaceFlags::NEVER_MOVE) {
            Placement::TrainingGround
        } else {
            Placement::Floor
        }
    }

    fn accepts(self, chunk: &Chunk, loc: Loc) -> bool {
        let cell = chunk.cell(loc);
        if cell.monster.is_some() || chunk.object_at(loc).is_some() {
            return false;
        }
        match self {
            Placement::Water => cell.terrain == Terrain::Water,
            Placement::TrainingGround => cell.terrain.is_floor() && cell.has(CellFlags::TRAINING),
            Placement::Floor => chunk.is_empty(loc),
        }
    }
}

/// Run every post-generation step on a stamped chunk
pub(crate) fn finish_level(
    chunk: &mut Chunk,
    world: &mut World,
    catalog: &Catalog,
    config: &GenConfig,
    profile: &CaveProfile,
    player: Option<PlayerId>,
    context: &LevelContext,
) -> PostGenReport {
    let mut report = PostGenReport::default();

    if let Some(player) = player.and_then(|id| world.players.get_mut(&id)) {
        seed_encounters(chunk, player, catalog, config, &mut world.rng, &mut report);
    }

    let random = context.is_random();
    let depth = chunk.depth();
    chunk.obj_feeling = obj_feeling(chunk.obj_rating, depth, chunk.good_item, random);
    chunk.mon_feeling = mon_feeling(chunk.mon_rating, depth, random);
    chunk.feeling = chunk.obj_feeling + chunk.mon_feeling;

    report.feeling_cells = place_feeling_cells(chunk, &mut world.rng, config.feeling_total);

    if profile.lit || (chunk.wpos.is_surface() && config.surface_daylight) {
        chunk.illuminate();
    }
    report.artifacts_marked = mark_generated_if_ready(chunk, &mut world.artifacts);

    tracing::debug!(
        feeling = chunk.feeling,
        obj_feeling = chunk.obj_feeling,
        mon_feeling = chunk.mon_feeling,
        placed = report.placed.len(),
        skipped = report.skipped.len(),
        "post-generation done"
    );
    report
}

/// Races this player should meet on this level
fn encounter_races(chunk: &Chunk, player: &Player, catalog: &Catalog) -> Vec<RaceId> {
    let quest = player.quest_target();
    catalog
        .races()
        .filter(|&(id, race)| {
            let wanted = Some(id) == quest
                || (race.flags.contains(RaceFlags::FIXED_ENCOUNTER)
                    && !player.force_descend
                    && !player.lore.has_spawned(id));
            wanted
                && race.level == chunk.depth()
                && race.allowed_at(&chunk.wpos)
                && !chunk.has_race(id)
        })
        .map(|(id, _)| id)
        .collect()
}

fn seed_encounters(
    chunk: &mut Chunk,
    player: &mut Player,
    catalog: &Catalog,
    config: &GenConfig,
    rng: &mut GameRng,
    report: &mut PostGenReport,
) {
    for id in encounter_races(chunk, player, catalog) {
        let Some(race) = catalog.race(id) else { continue };
        if chunk.monster_count() >= config.level_monster_max {
            report.skipped.push(id);
            tracing::warn!(race = %race.name, wpos = %chunk.wpos, "level full, encounter not placed");
            continue;
        }
        let placement = Placement::for_race(race);
        match chunk.find_loc(rng, ENCOUNTER_PLACEMENT_TRIES, |c, loc| placement.accepts(c, loc)) {
            Some(loc) => {
                chunk.add_monster(Monster::new(id, loc).asleep().grouped(), race.power);
                player.lore.mark_spawned(id);
                report.placed.push(id);
                tracing::info!(race = %race.name, wpos = %chunk.wpos, "encounter placed");
            }
            None => {
                report.skipped.push(id);
                tracing::warn!(race = %race.name, wpos = %chunk.wpos, ?placement, "could not place encounter");
            }
        }
    }
}

fn place_feeling_cells(chunk: &mut Chunk, rng: &mut GameRng, total: usize) -> usize {
    let mut placed = 0;
    for _ in 0..total {
        let found = chunk.find_loc(rng, FEELING_PLACEMENT_TRIES, |c, loc| {
            let cell = c.cell(loc);
            cell.terrain.is_floor() && !cell.has(CellFlags::FEEL)
        });
        if let Some(loc) = found {
            chunk.cell_mut(loc).flags |= CellFlags::FEEL;
            placed += 1;
        }
    }
    placed
}
