//! Level generation
//!
//! Cells and chunks, the per-attempt arena, profile selection, the cave and
//! room builders, and the retry loop that ties them together.

pub mod alloc;
pub mod builders;
pub mod room;

mod arena;
mod cell;
mod chunk;
mod errors;
mod feeling;
mod generate;
mod postgen;
mod select;

pub use arena::{ArenaLimits, ArenaRelease, GenArena, TunnelFlags};
pub use builders::{BuildContext, BuildRequest, CaveBuilder};
pub use cell::{Cell, CellFlags, Loc, Terrain};
pub use chunk::Chunk;
pub use errors::{GenFailure, GenerationError};
pub use feeling::{mon_feeling, obj_feeling};
pub use generate::{GeneratedLevel, LevelGenerator, LevelRequest};
pub use postgen::PostGenReport;
pub use select::{
    DungeonFlags, LevelContext, SurfaceKind, labyrinth_check, reservoir_pick, select_profile,
};
