//! Generation constants
//!
//! Capacity limits that are not game-balance tunables live here; the tunable
//! ones are defaults of [`crate::world::GenConfig`].

/// Full dungeon level dimensions
pub const DUNGEON_HGT: usize = 66;
pub const DUNGEON_WID: usize = 198;

/// Surface (town and wilderness) level dimensions
pub const SURFACE_HGT: usize = 22;
pub const SURFACE_WID: usize = 66;

/// Smallest chunk a builder may produce
pub const MIN_CHUNK_HGT: usize = 11;
pub const MIN_CHUNK_WID: usize = 33;

/// Deepest level of the world
pub const MAX_DEPTH: i32 = 128;

/// Attempts the retry controller makes before giving up on a level
pub const MAX_GENERATION_ATTEMPTS: usize = 100;

/// Random placement tries for one quest or fixed-encounter monster
pub const ENCOUNTER_PLACEMENT_TRIES: usize = 50;

/// Random placement tries for one hidden feeling cell
pub const FEELING_PLACEMENT_TRIES: usize = 500;

/// Generic bound for "find a random cell matching X" searches in builders
pub const CELL_SEARCH_TRIES: usize = 1000;

/// Default arena capacities
pub const ROOM_MAX: usize = 100;
pub const ENTRANCE_MAX: usize = 32;
pub const DOOR_MAX: usize = 200;
pub const WALL_MAX: usize = 500;
pub const TUNNEL_MAX: usize = 9000;
pub const PIT_MAX: usize = 2;

/// Default number of monsters a single level can hold
pub const LEVEL_MONSTER_MAX: usize = 1024;

/// Default number of hidden feeling cells scattered on a level
pub const FEELING_TOTAL: usize = 100;

/// Object feeling used when the level carries a good item or an artifact
pub const GOOD_ITEM_FEELING: u8 = 10;

/// Monsters every dungeon level starts with before depth scaling
pub const MIN_LEVEL_MONSTERS: u32 = 14;

/// Objects every dungeon level starts with before depth scaling
pub const MIN_LEVEL_OBJECTS: u32 = 9;
