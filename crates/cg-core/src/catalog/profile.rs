//! Cave and room profiles

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dungeon::CaveBuilder;
use crate::dungeon::room::RoomBuilder;
use crate::rng::RandomValue;

/// Tunnel digging parameters, all percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnelParams {
    /// Chance a direction change is random rather than towards the target
    pub rnd: u32,
    /// Chance of changing direction at each step
    pub chg: u32,
    /// Chance of continuing after meeting another corridor
    pub con: u32,
    /// Chance a pierced room wall becomes a door
    pub pen: u32,
    /// Chance a corridor junction gets a door
    pub jct: u32,
}

impl Default for TunnelParams {
    fn default() -> Self {
        Self {
            rnd: 10,
            chg: 30,
            con: 15,
            pen: 25,
            jct: 90,
        }
    }
}

/// Mineral vein parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamerParams {
    /// Cells converted around each step
    pub den: u32,
    /// Spread around the streamer line
    pub rng: u32,
    /// Magma streamers
    pub mag: u32,
    /// 1-in-N treasure chance in magma
    pub mc: u32,
    /// Quartz streamers
    pub qua: u32,
    /// 1-in-N treasure chance in quartz
    pub qc: u32,
}

impl Default for StreamerParams {
    fn default() -> Self {
        Self {
            den: 5,
            rng: 2,
            mag: 3,
            mc: 90,
            qua: 2,
            qc: 40,
        }
    }
}

/// Room profile as written in catalog data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRoomProfile {
    pub name: String,
    pub builder: String,
    #[serde(default)]
    pub rating: u32,
    pub height: usize,
    pub width: usize,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub pit: bool,
    #[serde(default)]
    pub rarity: u32,
    /// Upper bound of the 0..100 key that selects this room
    pub cutoff: u32,
}

/// Cave profile as written in catalog data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCaveProfile {
    pub name: String,
    pub builder: String,
    #[serde(default = "default_block_size")]
    pub block_size: usize,
    #[serde(default)]
    pub dun_rooms: u32,
    #[serde(default = "default_unusual")]
    pub dun_unusual: u32,
    #[serde(default)]
    pub max_rarity: u32,
    #[serde(default)]
    pub tunnel: TunnelParams,
    #[serde(default)]
    pub streamer: StreamerParams,
    #[serde(default)]
    pub up: RandomValue,
    #[serde(default)]
    pub down: RandomValue,
    #[serde(default)]
    pub min_level: i32,
    /// `-1` always eligible, `0` never picked at random, otherwise a weight
    #[serde(default)]
    pub alloc: i32,
    /// Light the whole level
    #[serde(default)]
    pub lit: bool,
    #[serde(default)]
    pub rooms: Vec<RawRoomProfile>,
}

fn default_block_size() -> usize {
    11
}

fn default_unusual() -> u32 {
    200
}

impl RawCaveProfile {
    /// A profile with default parameters
    pub fn new(name: impl Into<String>, builder: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            builder: builder.into(),
            block_size: default_block_size(),
            dun_rooms: 0,
            dun_unusual: default_unusual(),
            max_rarity: 0,
            tunnel: TunnelParams::default(),
            streamer: StreamerParams::default(),
            up: RandomValue::fixed(1),
            down: RandomValue::fixed(1),
            min_level: 0,
            alloc: 0,
            lit: false,
            rooms: Vec::new(),
        }
    }

    pub fn with_alloc(mut self, alloc: i32) -> Self {
        self.alloc = alloc;
        self
    }

    pub fn with_min_level(mut self, min_level: i32) -> Self {
        self.min_level = min_level;
        self
    }
}

/// A room profile with its builder resolved
#[derive(Clone)]
pub struct RoomProfile {
    pub name: String,
    pub builder: Arc<dyn RoomBuilder>,
    pub rating: u32,
    pub height: usize,
    pub width: usize,
    pub level: i32,
    pub pit: bool,
    pub rarity: u32,
    pub cutoff: u32,
}

impl fmt::Debug for RoomProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomProfile")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("rarity", &self.rarity)
            .field("cutoff", &self.cutoff)
            .finish_non_exhaustive()
    }
}

/// A cave profile with its builders resolved
#[derive(Clone)]
pub struct CaveProfile {
    pub name: String,
    pub builder: Arc<dyn CaveBuilder>,
    pub block_size: usize,
    pub dun_rooms: u32,
    pub dun_unusual: u32,
    pub max_rarity: u32,
    pub tunnel: TunnelParams,
    pub streamer: StreamerParams,
    pub up: RandomValue,
    pub down: RandomValue,
    pub min_level: i32,
    pub alloc: i32,
    pub lit: bool,
    pub rooms: Vec<RoomProfile>,
}

impl CaveProfile {
    /// Can never be picked by the weighted fallback nor by its override
    pub fn is_disabled(&self) -> bool {
        self.alloc == 0
    }
}

impl fmt::Debug for CaveProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaveProfile")
            .field("name", &self.name)
            .field("builder", &self.builder)
            .field("alloc", &self.alloc)
            .field("min_level", &self.min_level)
            .field("rooms", &self.rooms.len())
            .finish_non_exhaustive()
    }
}
