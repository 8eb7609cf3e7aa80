//! The classic rooms-and-corridors level

use super::tunnel::connect_rooms;
use super::{BuildContext, BuildRequest, CaveBuilder};
use crate::dungeon::alloc::{
    alloc_monsters, alloc_objects, alloc_streamers, monster_count, object_count, place_stairs,
};
use crate::dungeon::arena::GenArena;
use crate::dungeon::cell::Loc;
use crate::dungeon::chunk::Chunk;
use crate::dungeon::errors::GenFailure;
use crate::dungeon::room::{RoomSite, room_candidates, roll_room_rarity};
use crate::{DUNGEON_HGT, DUNGEON_WID};

/// Rooms on a block grid, joined by tunnels, with mineral veins
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicBuilder;

impl CaveBuilder for ClassicBuilder {
    fn build(
        &self,
        req: &BuildRequest<'_>,
        arena: &mut GenArena,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Chunk, GenFailure> {
        let profile = req.profile;
        let depth = req.depth();
        let (height, width) = req.dimensions(ctx.config, DUNGEON_HGT, DUNGEON_WID);
        let mut chunk = Chunk::new(req.wpos, height, width);
        chunk.draw_boundary();
        arena.quest = req.context.quest_level;

        let block = profile.block_size.max(1) as u32;
        let blocks_x = (width as u32 / block).max(1);
        let blocks_y = (height as u32 / block).max(1);
        let wanted = profile.dun_rooms.max(2) as usize;
        let player = req.player.map(|p| p.id);

        for _ in 0..wanted * 3 {
            if arena.room_count() >= wanted || arena.rooms_full() {
                break;
            }
            let bx = ctx.rng.randint0(blocks_x);
            let by = ctx.rng.randint0(blocks_y);
            let centre = Loc::new(
                (bx * block + block / 2) as i32 + ctx.rng.range(-1, 1),
                (by * block + block / 2) as i32 + ctx.rng.range(-1, 1),
            );

            let rarity = roll_room_rarity(profile, depth, ctx.rng);
            let key = ctx.rng.randint0(100);
            let candidates: Vec<_> = room_candidates(profile, depth, rarity, key, arena).collect();
            for room in candidates {
                let site = RoomSite {
                    centre,
                    profile: room,
                    depth,
                    player,
                };
                if room.builder.build(&mut chunk, arena, ctx, &site)? {
                    if room.pit {
                        arena.note_pit()?;
                    }
                    chunk.obj_rating += u64::from(room.rating) * u64::from(room.rating);
                    break;
                }
            }
        }

        if arena.room_count() < 2 {
            return Err(GenFailure::builder("too few rooms"));
        }

        let tracker = connect_rooms(&mut chunk, arena, ctx.rng, &profile.tunnel)?;
        if !tracker.all_connected() || !chunk.is_fully_connected() {
            return Err(GenFailure::builder("level not connected"));
        }
        alloc_streamers(&mut chunk, ctx.rng, &profile.streamer);
        place_stairs(&mut chunk, ctx.rng, profile.up, profile.down)?;

        let monsters = monster_count(ctx.rng, depth);
        alloc_monsters(&mut chunk, ctx, monsters, depth);
        let objects = object_count(ctx.rng, depth);
        alloc_objects(&mut chunk, arena, ctx, objects, depth, player)?;

        tracing::debug!(
            rooms = arena.room_count(),
            monsters = chunk.monster_count(),
            objects = chunk.objects.len(),
            "classic level built"
        );
        Ok(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::builders::testing;
    use crate::dungeon::cell::Terrain;
    use crate::object::Provenance;

    #[test]
    fn test_classic_levels() {
        let catalog = testing::catalog();
        let mut built = 0;
        for seed in 0..10 {
            let (result, ledger) = testing::build(&catalog, "classic", 10, seed);
            // Released without a chunk, so nothing stays created
            assert_eq!(ledger.count_in(Provenance::Created), 0);
            let Ok(chunk) = result else { continue };
            built += 1;
            assert_eq!((chunk.height, chunk.width), (DUNGEON_HGT, DUNGEON_WID));
            assert!(chunk.count_terrain(Terrain::UpStairs) >= 1);
            assert!(chunk.count_terrain(Terrain::DownStairs) >= 1);
            assert!(chunk.monster_count() > 0);
            assert!(!chunk.objects.is_empty());
            assert!(chunk.mon_rating > 0);
        }
        assert!(built >= 7);
    }

    #[test]
    fn test_built_classic_levels_are_connected() {
        let catalog = testing::catalog();
        let mut built = 0;
        for seed in 0..60 {
            let (result, _) = testing::build(&catalog, "classic", 5, seed);
            let Ok(chunk) = result else { continue };
            built += 1;
            assert!(chunk.is_fully_connected(), "seed {seed} built a split level");
        }
        assert!(built > 30);
    }

    #[test]
    fn test_classic_same_seed_same_level() {
        let catalog = testing::catalog();
        let (a, _) = testing::build(&catalog, "classic", 5, 77);
        let (b, _) = testing::build(&catalog, "classic", 5, 77);
        assert_eq!(a.ok(), b.ok());
    }
}
