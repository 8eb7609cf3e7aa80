//! Shared fixtures for the generation tests

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cg_core::catalog::{BuilderRegistry, Catalog, RawCatalog, RawCaveProfile, RawRoomProfile};
use cg_core::dungeon::alloc::place_object_at;
use cg_core::dungeon::builders::ClassicBuilder;
use cg_core::dungeon::{
    BuildContext, BuildRequest, CaveBuilder, CellFlags, Chunk, GenArena, GenFailure,
    LevelGenerator, Loc, Terrain,
};
use cg_core::monster::{MonsterRace, RaceFlags};
use cg_core::object::{ArtifactDef, ObjectKind};
use cg_core::world::GenConfig;
use cg_core::RandomValue;

/// Rolls an artifact, then fails, a set number of times before building a
/// classic level
#[derive(Debug)]
pub struct Flaky {
    failures: usize,
    calls: AtomicUsize,
}

impl Flaky {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CaveBuilder for Flaky {
    fn build(
        &self,
        req: &BuildRequest<'_>,
        arena: &mut GenArena,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Chunk, GenFailure> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            let mut scratch = Chunk::new(req.wpos, 11, 33);
            scratch.set_terrain(Loc::new(5, 5), Terrain::Floor);
            place_object_at(&mut scratch, arena, ctx, Loc::new(5, 5), 50, true, None)?;
            return Err(GenFailure::builder(format!("flaky attempt {}", call + 1)));
        }
        ClassicBuilder.build(req, arena, ctx)
    }
}

/// One open floor with nothing on it
#[derive(Debug)]
pub struct Vacant;

impl CaveBuilder for Vacant {
    fn build(
        &self,
        req: &BuildRequest<'_>,
        _arena: &mut GenArena,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Chunk, GenFailure> {
        let mut chunk = Chunk::new(req.wpos, 22, 66);
        chunk.fill_rect(Loc::new(1, 1), Loc::new(64, 20), Terrain::Floor, CellFlags::empty());
        chunk.draw_boundary();
        Ok(chunk)
    }
}

pub fn room(name: &str, builder: &str, cutoff: u32) -> RawRoomProfile {
    RawRoomProfile {
        name: name.to_string(),
        builder: builder.to_string(),
        rating: 0,
        height: 11,
        width: 33,
        level: 0,
        pit: false,
        rarity: 0,
        cutoff,
    }
}

pub fn race(name: &str, level: i32, flags: RaceFlags) -> MonsterRace {
    MonsterRace {
        name: name.to_string(),
        symbol: 'p',
        level,
        rarity: 1,
        power: 20,
        flags,
        locations: Vec::new(),
    }
}

pub fn raw_catalog() -> RawCatalog {
    let mut classic = RawCaveProfile::new("classic", "classic").with_alloc(100);
    classic.dun_rooms = 20;
    classic.up = RandomValue::new(1, 1, 2);
    classic.down = RandomValue::new(1, 1, 2);
    classic.rooms = vec![room("simple room", "simple", 70), room("circular room", "circular", 100)];

    let mut flaky = classic.clone();
    flaky.name = "flaky".to_string();
    flaky.builder = "flaky".to_string();
    flaky.alloc = 0;

    let vacant = RawCaveProfile::new("vacant", "vacant");

    RawCatalog {
        profiles: vec![
            classic,
            flaky,
            vacant,
            RawCaveProfile::new("arena", "arena"),
            RawCaveProfile::new("town", "town"),
            RawCaveProfile::new("mang_town", "mang_town"),
            RawCaveProfile::new("wilderness", "wilderness"),
        ],
        races: vec![
            race("villager", 0, RaceFlags::empty()),
            race("jackal", 1, RaceFlags::FRIENDS),
            race("cave orc", 5, RaceFlags::empty()),
            race("Grip, Farmer Maggot's Dog", 5, RaceFlags::UNIQUE | RaceFlags::FIXED_ENCOUNTER),
            race("Sauron", 5, RaceFlags::UNIQUE | RaceFlags::QUESTOR),
            race("kraken", 5, RaceFlags::QUESTOR | RaceFlags::AQUATIC),
        ],
        kinds: vec![ObjectKind {
            name: "Flask of Oil".to_string(),
            level: 1,
            rating: 3,
        }],
        artifacts: vec![
            ArtifactDef {
                name: "the Phial of Galadriel".to_string(),
                level: 1,
                rarity: 1,
                rating: 30,
                randomized: false,
            },
            ArtifactDef {
                name: "the Star of Elendil".to_string(),
                level: 5,
                rarity: 1,
                rating: 40,
                randomized: false,
            },
        ],
        ..RawCatalog::default()
    }
}

fn registry() -> BuilderRegistry {
    let mut registry = BuilderRegistry::with_defaults();
    registry.register_cave("vacant", Arc::new(Vacant));
    registry
}

/// A generator whose `flaky` profile fails `failures` times first
pub fn generator(failures: usize, config: GenConfig) -> (LevelGenerator, Arc<Flaky>) {
    let flaky = Arc::new(Flaky::new(failures));
    let mut registry = registry();
    registry.register_cave("flaky", flaky.clone());
    let catalog = Catalog::load(raw_catalog(), &registry).expect("test catalog");
    (LevelGenerator::new(Arc::new(catalog), config), flaky)
}

/// A catalog holding a single `classic` profile that is never drawn by
/// weight, built by [`Vacant`]
pub fn lone_classic_generator() -> LevelGenerator {
    let raw = RawCatalog {
        profiles: vec![
            RawCaveProfile::new("classic", "vacant")
                .with_alloc(-1)
                .with_min_level(0),
        ],
        ..raw_catalog()
    };
    let catalog = Catalog::load(raw, &registry()).expect("lone classic catalog");
    LevelGenerator::new(Arc::new(catalog), GenConfig::default())
}
