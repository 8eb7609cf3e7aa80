//! cg-core: level generation pipeline for a shared-world roguelike
//!
//! Levels are synthesized on demand from a catalog of cave profiles, built
//! inside a per-attempt generation arena, retried until they satisfy the
//! global acceptance checks, then decorated (feelings, quest monsters) and
//! handed back as an immutable [`dungeon::Chunk`].
//!
//! The crate performs no I/O. Catalog loading from disk, chunk storage and
//! networking belong to the callers.

pub mod catalog;
pub mod dungeon;
pub mod monster;
pub mod object;
pub mod player;
pub mod world;

mod consts;
mod rng;

pub use consts::*;
pub use rng::{GameRng, RandomValue};
