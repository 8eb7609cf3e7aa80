//! Rooms drawn from fixed text layouts: room templates and vaults

use super::{RoomBuilder, RoomSite, room_area, room_is_lit};
use crate::catalog::{Layout, VaultKind};
use crate::monster::Monster;
use crate::dungeon::alloc::{pick_race, place_monster_at, place_object_at};
use crate::dungeon::arena::GenArena;
use crate::dungeon::builders::BuildContext;
use crate::dungeon::cell::{CellFlags, Loc, Terrain};
use crate::dungeon::chunk::Chunk;
use crate::dungeon::errors::GenFailure;

/// What to put on a layout cell once the terrain is down
#[derive(Debug, Clone, Copy)]
enum Spawn {
    Monster(i32),
    Object { boost: i32, good: bool },
    Guarded(i32),
}

/// Stamp `layout` centred on `site.centre`
fn build_layout(
    chunk: &mut Chunk,
    arena: &mut GenArena,
    ctx: &mut BuildContext<'_>,
    site: &RoomSite<'_>,
    layout: &dyn Layout,
    room_flags: CellFlags,
    rating: u32,
) -> Result<bool, GenFailure> {
    let Some(top_left) = room_area(chunk, site.centre, layout.height(), layout.width()) else {
        return Ok(false);
    };
    let room = arena.add_room(site.centre)?;

    let mut spawns = Vec::new();
    for (dy, row) in layout.rows().iter().enumerate() {
        for (dx, ch) in row.chars().enumerate() {
            let loc = top_left.offset(dx as i32, dy as i32);
            let (terrain, flags) = match ch {
                ' ' => continue,
                '#' => (Terrain::Granite, CellFlags::WALL_INNER),
                '%' => (Terrain::Granite, CellFlags::WALL_OUTER),
                'X' => (Terrain::PermanentWall, CellFlags::WALL_SOLID),
                '+' => (Terrain::SecretDoor, room_flags),
                '\'' => (Terrain::ClosedDoor, room_flags),
                '~' => (Terrain::Water, room_flags),
                _ => (Terrain::Floor, room_flags),
            };
            let cell = chunk.cell_mut(loc);
            cell.terrain = terrain;
            cell.flags |= flags;

            if terrain.is_door() {
                arena.add_entrance(room, loc)?;
            }
            match ch {
                '&' => spawns.push((loc, Spawn::Monster(5))),
                '@' => spawns.push((loc, Spawn::Monster(11))),
                '*' => spawns.push((loc, Spawn::Object { boost: 0, good: false })),
                '9' => spawns.push((loc, Spawn::Object { boost: 7, good: true })),
                '8' => spawns.push((loc, Spawn::Guarded(20))),
                _ => {}
            }
        }
    }

    // Objects first so monsters never land on a cell an object still needs
    for &(loc, spawn) in &spawns {
        match spawn {
            Spawn::Object { boost, good } => {
                place_object_at(chunk, arena, ctx, loc, site.depth + boost, good, site.player)?;
            }
            Spawn::Guarded(boost) => {
                place_object_at(chunk, arena, ctx, loc, site.depth + boost, true, site.player)?;
            }
            Spawn::Monster(_) => {}
        }
    }
    for (loc, spawn) in spawns {
        match spawn {
            Spawn::Monster(boost) | Spawn::Guarded(boost) => {
                spawn_monster(chunk, ctx, loc, site.depth + boost);
            }
            Spawn::Object { .. } => {}
        }
    }

    chunk.obj_rating += u64::from(rating) * u64::from(rating);
    tracing::debug!(layout = layout.name(), at = ?site.centre, "layout room placed");
    Ok(true)
}

fn spawn_monster(chunk: &mut Chunk, ctx: &mut BuildContext<'_>, loc: Loc, level: i32) {
    if chunk.cell(loc).monster.is_some() {
        return;
    }
    let Some(race) = pick_race(chunk, ctx, level) else {
        return;
    };
    if chunk.object_at(loc).is_none() {
        place_monster_at(chunk, ctx, loc, race, true);
        return;
    }

    // A guard stands on its treasure, alone
    let catalog = ctx.catalog;
    if let Some(def) = catalog.race(race) {
        chunk.add_monster(Monster::new(race, loc).asleep(), def.power);
    }
}

/// A room drawn from the catalog's room templates
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRoom;

impl RoomBuilder for TemplateRoom {
    fn build(
        &self,
        chunk: &mut Chunk,
        arena: &mut GenArena,
        ctx: &mut BuildContext<'_>,
        site: &RoomSite<'_>,
    ) -> Result<bool, GenFailure> {
        let catalog = ctx.catalog;
        let Some(template) = catalog.pick_template(site.depth, ctx.rng) else {
            return Ok(false);
        };
        let mut flags = CellFlags::ROOM;
        if room_is_lit(site.depth, ctx.rng) {
            flags |= CellFlags::GLOW;
        }
        build_layout(chunk, arena, ctx, site, template, flags, template.rating)
    }
}

/// A vault of one kind, drawn from the catalog
#[derive(Debug, Clone, Copy)]
pub struct VaultRoom(pub VaultKind);

impl RoomBuilder for VaultRoom {
    fn build(
        &self,
        chunk: &mut Chunk,
        arena: &mut GenArena,
        ctx: &mut BuildContext<'_>,
        site: &RoomSite<'_>,
    ) -> Result<bool, GenFailure> {
        let catalog = ctx.catalog;
        let Some(vault) = catalog.pick_vault(self.0, site.depth, ctx.rng) else {
            return Ok(false);
        };
        let flags = CellFlags::ROOM | CellFlags::VAULT | CellFlags::GLOW | CellFlags::MON_RESTRICT;
        let built = build_layout(chunk, arena, ctx, site, vault, flags, vault.rating)?;
        if built {
            tracing::info!(vault = %vault.name, kind = %self.0, depth = site.depth, "vault generated");
        }
        Ok(built)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::builders::testing;
    use crate::object::{ArtifactLedger, Provenance};
    use crate::rng::GameRng;
    use crate::world::{GenConfig, WorldPos};

    #[test]
    fn test_vault_stamp() {
        let catalog = testing::catalog();
        let profile = catalog.require("classic").unwrap();
        let config = GenConfig::default();
        let mut rng = GameRng::new(12);
        let mut ledger = ArtifactLedger::default();
        let mut arena = GenArena::new(config.limits.clone());
        let mut chunk = Chunk::new(WorldPos::new(0, 0, 30), 44, 99);
        {
            let mut ctx = BuildContext {
                rng: &mut rng,
                artifacts: &mut ledger,
                catalog: &catalog,
                config: &config,
            };
            let site = RoomSite {
                centre: Loc::new(50, 20),
                profile: &profile.rooms[0],
                depth: 30,
                player: None,
            };
            let built = VaultRoom(VaultKind::Greater)
                .build(&mut chunk, &mut arena, &mut ctx, &site)
                .unwrap();
            assert!(built);
        }

        // Two good objects; the first one takes the only artifact
        assert_eq!(chunk.objects.len(), 2);
        assert!(chunk.good_item);
        assert_eq!(arena.rolled().len(), 1);
        assert_eq!(ledger.count_in(Provenance::Created), 1);
        assert!(chunk.obj_rating >= 40 * 40);

        // Doors register as entrances of the vault
        assert_eq!(arena.entrances(0).len(), 3);
        assert!(chunk.count_flag(CellFlags::VAULT) > 0);
        assert_eq!(chunk.monster_count(), 1);
    }

    #[test]
    fn test_vault_outside_depth_window() {
        let catalog = testing::catalog();
        let profile = catalog.require("classic").unwrap();
        let config = GenConfig::default();
        let mut rng = GameRng::new(1);
        let mut ledger = ArtifactLedger::default();
        let mut arena = GenArena::new(config.limits.clone());
        let mut chunk = Chunk::new(WorldPos::new(0, 0, 0), 44, 99);
        let mut ctx = BuildContext {
            rng: &mut rng,
            artifacts: &mut ledger,
            catalog: &catalog,
            config: &config,
        };
        let site = RoomSite {
            centre: Loc::new(50, 20),
            profile: &profile.rooms[0],
            depth: 0,
            player: None,
        };
        let built = VaultRoom(VaultKind::Greater)
            .build(&mut chunk, &mut arena, &mut ctx, &site)
            .unwrap();
        assert!(!built);
        assert_eq!(arena.room_count(), 0);
    }

    #[test]
    fn test_template_room() {
        let catalog = testing::catalog();
        let profile = catalog.require("classic").unwrap();
        let config = GenConfig::default();
        let mut rng = GameRng::new(2);
        let mut ledger = ArtifactLedger::default();
        let mut arena = GenArena::new(config.limits.clone());
        let mut chunk = Chunk::new(WorldPos::new(0, 0, 8), 44, 99);
        let mut ctx = BuildContext {
            rng: &mut rng,
            artifacts: &mut ledger,
            catalog: &catalog,
            config: &config,
        };
        let site = RoomSite {
            centre: Loc::new(50, 20),
            profile: &profile.rooms[3],
            depth: 8,
            player: None,
        };
        assert!(TemplateRoom.build(&mut chunk, &mut arena, &mut ctx, &site).unwrap());
        assert_eq!(arena.entrances(0).len(), 2);
        assert_eq!(chunk.count_terrain(Terrain::ClosedDoor), 2);
        assert!(!chunk.objects.is_empty());
    }
}
