//! World state
//!
//! Positions in the shared world and the mutable tables a generation pass
//! touches: the RNG, the game clock, the artifact ledger and the player list.

pub mod config;
pub mod errors;

use std::fmt;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::object::ArtifactLedger;
use crate::player::{Player, PlayerId};
use crate::rng::GameRng;

pub use config::{ConfigError, GenConfig};
pub use errors::fatal;

/// Game turn; used as the generation stamp of accepted chunks
pub type Turn = u64;

/// Wilderness coordinate of a world column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WildGrid {
    pub x: i16,
    pub y: i16,
}

impl WildGrid {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Position of a level in the world: a wilderness column plus a depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WorldPos {
    pub grid: WildGrid,
    pub depth: i32,
}

impl WorldPos {
    pub const fn new(x: i16, y: i16, depth: i32) -> Self {
        Self {
            grid: WildGrid::new(x, y),
            depth,
        }
    }

    /// Surface levels (towns and wilderness) sit at depth 0
    pub const fn is_surface(&self) -> bool {
        self.depth == 0
    }
}

impl fmt::Display for WorldPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) @ {}", self.grid.x, self.grid.y, self.depth)
    }
}

/// Mutable world tables shared by every generation pass
///
/// The generator takes `&mut World`, so two passes can never mutate the
/// ledger or the player list at the same time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub rng: GameRng,
    pub turn: Turn,
    pub artifacts: ArtifactLedger,
    pub(crate) players: HashMap<PlayerId, Player>,
}

impl World {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
            turn: 1,
            artifacts: ArtifactLedger::default(),
            players: HashMap::new(),
        }
    }

    /// Register a player, replacing any previous entry with the same id
    pub fn add_player(&mut self, player: Player) {
        self.players.insert(player.id, player);
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        self.players.remove(&id)
    }

    /// Advance the game clock
    pub fn advance(&mut self, turns: Turn) {
        self.turn += turns;
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(0)
    }
}
