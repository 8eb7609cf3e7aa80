//! The retry loop around cave builders
//!
//! Every attempt gets a fresh arena and a freshly selected profile. A failed
//! attempt gives back whatever artifacts it rolled before the next one
//! starts, so retrying never loses or duplicates an artifact.

use std::sync::Arc;

use super::arena::GenArena;
use super::builders::{BuildContext, BuildRequest};
use super::chunk::Chunk;
use super::errors::{GenFailure, GenerationError};
use super::postgen::{PostGenReport, finish_level};
use super::select::{LevelContext, select_profile};
use crate::MAX_GENERATION_ATTEMPTS;
use crate::catalog::{Catalog, CaveProfile, CatalogError};
use crate::object::{WipeSummary, preserve_on_discard, wipe_chunk};
use crate::player::PlayerId;
use crate::world::{GenConfig, World, WorldPos, fatal};

/// A request for one level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRequest {
    pub wpos: WorldPos,
    /// Player whose arrival triggered generation
    pub player: Option<PlayerId>,
    /// Minimum height; 0 for no minimum
    pub min_height: usize,
    /// Minimum width; 0 for no minimum
    pub min_width: usize,
    pub context: LevelContext,
    /// Build with this profile instead of selecting one
    pub profile: Option<String>,
}

impl LevelRequest {
    pub fn new(wpos: WorldPos) -> Self {
        Self {
            wpos,
            player: None,
            min_height: 0,
            min_width: 0,
            context: LevelContext::default(),
            profile: None,
        }
    }

    pub fn for_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    pub fn with_min_size(mut self, height: usize, width: usize) -> Self {
        self.min_height = height;
        self.min_width = width;
        self
    }

    pub fn with_context(mut self, context: LevelContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_profile(mut self, name: impl Into<String>) -> Self {
        self.profile = Some(name.into());
        self
    }
}

/// An accepted level and how it came to be
#[derive(Debug, Clone)]
pub struct GeneratedLevel {
    pub chunk: Chunk,
    /// Attempts used, counting the successful one
    pub attempts: usize,
    pub report: PostGenReport,
}

/// Builds levels from a catalog
#[derive(Debug, Clone)]
pub struct LevelGenerator {
    catalog: Arc<Catalog>,
    config: GenConfig,
}

impl LevelGenerator {
    pub fn new(catalog: Arc<Catalog>, config: GenConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    /// Generate a level, aborting the process if that is impossible
    pub fn prepare_level(&self, world: &mut World, request: &LevelRequest) -> Chunk {
        match self.generate(world, request) {
            Ok(level) => level.chunk,
            Err(err) => fatal(err),
        }
    }

    /// Generate a level, retrying failed attempts
    pub fn generate(
        &self,
        world: &mut World,
        request: &LevelRequest,
    ) -> Result<GeneratedLevel, GenerationError> {
        let mut last_reason = String::new();

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let profile = self.pick_profile(world, request)?;
            match self.attempt(world, request, &profile) {
                Ok(mut chunk) => {
                    let report = finish_level(
                        &mut chunk,
                        world,
                        &self.catalog,
                        &self.config,
                        &profile,
                        request.player,
                        &request.context,
                    );
                    tracing::info!(
                        profile = %profile.name,
                        wpos = %request.wpos,
                        attempts = attempt,
                        feeling = chunk.feeling,
                        "level generated"
                    );
                    return Ok(GeneratedLevel {
                        chunk,
                        attempts: attempt,
                        report,
                    });
                }
                Err(failure) => {
                    tracing::info!(attempt, profile = %profile.name, "Generation restarted: {}", failure);
                    last_reason = failure.to_string();
                }
            }
        }

        let err = GenerationError::RetriesExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
            last_reason,
        };
        tracing::error!(wpos = %request.wpos, "level generation failed after {} attempts", MAX_GENERATION_ATTEMPTS);
        Err(err)
    }

    fn pick_profile(
        &self,
        world: &mut World,
        request: &LevelRequest,
    ) -> Result<Arc<CaveProfile>, CatalogError> {
        match &request.profile {
            Some(name) => self.catalog.require(name),
            None => select_profile(&self.catalog, request.wpos, &request.context, &mut world.rng),
        }
    }

    /// One attempt: build, check, and on success stamp the chunk
    ///
    /// The arena is released on every path before this returns.
    fn attempt(
        &self,
        world: &mut World,
        request: &LevelRequest,
        profile: &CaveProfile,
    ) -> Result<Chunk, GenFailure> {
        let mut arena = GenArena::new(self.config.limits.clone());
        let player = request.player.and_then(|id| world.players.get(&id));
        let build = BuildRequest {
            wpos: request.wpos,
            player,
            height: request.min_height,
            width: request.min_width,
            profile,
            context: &request.context,
        };
        let mut ctx = BuildContext {
            rng: &mut world.rng,
            artifacts: &mut world.artifacts,
            catalog: &self.catalog,
            config: &self.config,
        };

        let built = profile.builder.build(&build, &mut arena, &mut ctx);
        let mut chunk = match built {
            Ok(chunk) => chunk,
            Err(failure) => {
                arena.release(&mut world.artifacts, None);
                return Err(failure);
            }
        };

        if chunk.monster_count() > self.config.level_monster_max {
            preserve_on_discard(&mut chunk, &mut world.artifacts);
            arena.release(&mut world.artifacts, None);
            return Err(GenFailure::TooManyMonsters);
        }

        chunk.clear_generation_flags();
        chunk.profile = profile.name.clone();
        chunk.stamp(world.turn);
        let release = arena.release(&mut world.artifacts, Some(&mut chunk));
        tracing::debug!(promoted = release.promoted, reverted = release.reverted, "chunk accepted");
        Ok(chunk)
    }

    /// Remove an accepted level from the world
    pub fn wipe(&self, world: &mut World, chunk: &mut Chunk) -> WipeSummary {
        wipe_chunk(chunk, &mut world.artifacts, self.config.preserve_artifacts)
    }
}
