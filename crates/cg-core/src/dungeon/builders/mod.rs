//! Cave builders
//!
//! A cave builder turns a request plus a fresh arena into a complete chunk,
//! or reports why this attempt should be thrown away.

mod cavern;
mod classic;
mod hall;
mod labyrinth;
mod town;
mod tunnel;

use std::fmt;
use std::sync::Arc;

use crate::catalog::{BuilderRegistry, Catalog, CaveProfile};
use crate::player::Player;
use crate::rng::GameRng;
use crate::object::ArtifactLedger;
use crate::world::{GenConfig, WorldPos};
use crate::{MIN_CHUNK_HGT, MIN_CHUNK_WID};

use super::arena::GenArena;
use super::chunk::Chunk;
use super::errors::GenFailure;
use super::select::LevelContext;

pub use cavern::CavernBuilder;
pub use classic::ClassicBuilder;
pub use hall::HallBuilder;
pub use labyrinth::LabyrinthBuilder;
pub use town::{TownBuilder, TownLayout};

/// What a builder is asked to produce
#[derive(Debug, Clone, Copy)]
pub struct BuildRequest<'a> {
    pub wpos: WorldPos,
    /// Player whose arrival triggered generation
    pub player: Option<&'a Player>,
    /// Minimum height; 0 lets the builder choose
    pub height: usize,
    /// Minimum width; 0 lets the builder choose
    pub width: usize,
    pub profile: &'a CaveProfile,
    pub context: &'a LevelContext,
}

impl BuildRequest<'_> {
    pub fn depth(&self) -> i32 {
        self.wpos.depth
    }

    /// Chunk dimensions: the builder's preference, raised to the requested
    /// minimum and capped by the configured maximum
    pub fn dimensions(&self, config: &GenConfig, height: usize, width: usize) -> (usize, usize) {
        let h = height.max(self.height).min(config.max_height).max(MIN_CHUNK_HGT);
        let w = width.max(self.width).min(config.max_width).max(MIN_CHUNK_WID);
        (h, w)
    }
}

/// World resources a builder may touch
pub struct BuildContext<'a> {
    pub rng: &'a mut GameRng,
    pub artifacts: &'a mut ArtifactLedger,
    pub catalog: &'a Catalog,
    pub config: &'a GenConfig,
}

/// A level layout algorithm
///
/// Builders must not keep the arena past `build`.
pub trait CaveBuilder: fmt::Debug + Send + Sync {
    fn build(
        &self,
        req: &BuildRequest<'_>,
        arena: &mut GenArena,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Chunk, GenFailure>;
}

/// Register the built-in cave builders under their catalog names
pub fn register_defaults(registry: &mut BuilderRegistry) {
    registry.register_cave("classic", Arc::new(ClassicBuilder));
    registry.register_cave("labyrinth", Arc::new(LabyrinthBuilder));
    registry.register_cave("cavern", Arc::new(CavernBuilder));
    registry.register_cave("arena", Arc::new(HallBuilder));
    registry.register_cave("town", Arc::new(TownBuilder::new(TownLayout::Static)));
    registry.register_cave("mang_town", Arc::new(TownBuilder::new(TownLayout::Dynamic)));
    registry.register_cave("wilderness", Arc::new(TownBuilder::new(TownLayout::Wilderness)));
}
