//! Cave profiles
//!
//! `classic` backs ordinary levels and is also drawn, with other numbers,
//! as `moria` and `modified`. Profiles with `alloc == -1` are only reached
//! through the selector's special checks; `alloc == 0` profiles only by name.

use cg_core::RandomValue;
use cg_core::catalog::{RawCaveProfile, RawRoomProfile, StreamerParams, TunnelParams};

/// A room profile entry
#[derive(Debug, Clone, Copy)]
pub struct RoomEntry {
    pub name: &'static str,
    /// Registered room builder
    pub builder: &'static str,
    pub rating: u32,
    pub height: usize,
    pub width: usize,
    /// Shallowest depth the room appears at
    pub level: i32,
    pub pit: bool,
    /// Rarity roll the room needs
    pub rarity: u32,
    /// Upper bound of the 0..100 selection key
    pub cutoff: u32,
}

impl RoomEntry {
    const fn new(name: &'static str, builder: &'static str, cutoff: u32) -> Self {
        Self {
            name,
            builder,
            rating: 0,
            height: 11,
            width: 33,
            level: 0,
            pit: false,
            rarity: 0,
            cutoff,
        }
    }

    const fn size(mut self, height: usize, width: usize) -> Self {
        self.height = height;
        self.width = width;
        self
    }

    const fn gated(mut self, level: i32, rarity: u32) -> Self {
        self.level = level;
        self.rarity = rarity;
        self
    }

    const fn rated(mut self, rating: u32) -> Self {
        self.rating = rating;
        self
    }

    pub fn to_raw(&self) -> RawRoomProfile {
        RawRoomProfile {
            name: self.name.to_string(),
            builder: self.builder.to_string(),
            rating: self.rating,
            height: self.height,
            width: self.width,
            level: self.level,
            pit: self.pit,
            rarity: self.rarity,
            cutoff: self.cutoff,
        }
    }
}

/// A cave profile entry
#[derive(Debug, Clone, Copy)]
pub struct ProfileEntry {
    pub name: &'static str,
    /// Registered cave builder
    pub builder: &'static str,
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
    pub rooms: &'static [RoomEntry],
}

impl ProfileEntry {
    pub fn to_raw(&self) -> RawCaveProfile {
        RawCaveProfile {
            name: self.name.to_string(),
            builder: self.builder.to_string(),
            block_size: self.block_size,
            dun_rooms: self.dun_rooms,
            dun_unusual: self.dun_unusual,
            max_rarity: self.max_rarity,
            tunnel: self.tunnel,
            streamer: self.streamer,
            up: self.up,
            down: self.down,
            min_level: self.min_level,
            alloc: self.alloc,
            lit: self.lit,
            rooms: self.rooms.iter().map(RoomEntry::to_raw).collect(),
        }
    }
}

const TUNNEL_CLASSIC: TunnelParams = TunnelParams {
    rnd: 10,
    chg: 30,
    con: 15,
    pen: 25,
    jct: 90,
};

const TUNNEL_MORIA: TunnelParams = TunnelParams {
    rnd: 20,
    chg: 60,
    con: 10,
    pen: 20,
    jct: 60,
};

const STREAMER_CLASSIC: StreamerParams = StreamerParams {
    den: 5,
    rng: 2,
    mag: 3,
    mc: 90,
    qua: 2,
    qc: 40,
};

const STREAMER_MORIA: StreamerParams = StreamerParams {
    den: 5,
    rng: 2,
    mag: 5,
    mc: 60,
    qua: 4,
    qc: 20,
};

const NO_STREAMERS: StreamerParams = StreamerParams {
    den: 0,
    rng: 0,
    mag: 0,
    mc: 0,
    qua: 0,
    qc: 0,
};

/// Rooms of the classic profile, most specific first
const CLASSIC_ROOMS: &[RoomEntry] = &[
    RoomEntry::new("greater vault", "greater_vault", 4)
        .size(44, 66)
        .gated(30, 2),
    RoomEntry::new("lesser vault", "lesser_vault", 12)
        .size(22, 33)
        .gated(15, 1),
    RoomEntry::new("interesting room", "interesting", 25)
        .size(22, 33)
        .gated(5, 1)
        .rated(2),
    RoomEntry::new("room template", "template", 35).size(11, 33),
    RoomEntry::new("circular room", "circular", 50)
        .size(22, 22)
        .gated(5, 0),
    RoomEntry::new("simple room", "simple", 100),
];

const MORIA_ROOMS: &[RoomEntry] = &[
    RoomEntry::new("lesser vault", "lesser_vault", 8)
        .size(22, 33)
        .gated(15, 1),
    RoomEntry::new("circular room", "circular", 40).size(22, 22),
    RoomEntry::new("simple room", "simple", 100),
];

const MODIFIED_ROOMS: &[RoomEntry] = &[
    RoomEntry::new("greater vault", "greater_vault", 6)
        .size(44, 66)
        .gated(20, 2),
    RoomEntry::new("lesser vault", "lesser_vault", 15)
        .size(22, 33)
        .gated(10, 1),
    RoomEntry::new("interesting room", "interesting", 30)
        .size(22, 33)
        .gated(0, 1)
        .rated(2),
    RoomEntry::new("room template", "template", 50).size(11, 33),
    RoomEntry::new("simple room", "simple", 100),
];

const fn profile(name: &'static str, builder: &'static str) -> ProfileEntry {
    ProfileEntry {
        name,
        builder,
        block_size: 11,
        dun_rooms: 0,
        dun_unusual: 200,
        max_rarity: 0,
        tunnel: TUNNEL_CLASSIC,
        streamer: NO_STREAMERS,
        up: RandomValue::fixed(1),
        down: RandomValue::fixed(1),
        min_level: 0,
        alloc: 0,
        lit: false,
        rooms: &[],
    }
}

/// All cave profiles
pub static PROFILES: &[ProfileEntry] = &[
    ProfileEntry {
        dun_rooms: 50,
        max_rarity: 2,
        streamer: STREAMER_CLASSIC,
        up: RandomValue::new(1, 1, 2),
        down: RandomValue::new(1, 1, 3),
        min_level: 1,
        alloc: 100,
        rooms: CLASSIC_ROOMS,
        ..profile("classic", "classic")
    },
    ProfileEntry {
        dun_rooms: 30,
        dun_unusual: 250,
        max_rarity: 1,
        tunnel: TUNNEL_MORIA,
        streamer: STREAMER_MORIA,
        up: RandomValue::new(1, 1, 2),
        down: RandomValue::new(1, 1, 2),
        min_level: 10,
        alloc: -1,
        rooms: MORIA_ROOMS,
        ..profile("moria", "classic")
    },
    ProfileEntry {
        dun_rooms: 60,
        dun_unusual: 180,
        max_rarity: 3,
        streamer: STREAMER_CLASSIC,
        up: RandomValue::new(1, 1, 3),
        down: RandomValue::new(2, 1, 3),
        min_level: 1,
        alloc: -1,
        rooms: MODIFIED_ROOMS,
        ..profile("modified", "classic")
    },
    ProfileEntry {
        min_level: 13,
        alloc: -1,
        ..profile("labyrinth", "labyrinth")
    },
    ProfileEntry {
        streamer: STREAMER_MORIA,
        up: RandomValue::new(1, 1, 2),
        down: RandomValue::new(1, 1, 2),
        min_level: 15,
        alloc: 10,
        ..profile("cavern", "cavern")
    },
    ProfileEntry {
        lit: true,
        ..profile("arena", "arena")
    },
    ProfileEntry {
        up: RandomValue::fixed(0),
        ..profile("town", "town")
    },
    ProfileEntry {
        up: RandomValue::fixed(0),
        ..profile("mang_town", "mang_town")
    },
    ProfileEntry {
        up: RandomValue::fixed(0),
        ..profile("wilderness", "wilderness")
    },
];

/// Get a profile by name
pub fn get_profile(name: &str) -> Option<&'static ProfileEntry> {
    PROFILES.iter().find(|p| p.name == name)
}

/// Get the number of profiles
pub fn num_profiles() -> usize {
    PROFILES.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_comes_first() {
        assert_eq!(PROFILES[0].name, "classic");
        assert_eq!(PROFILES[0].alloc, 100);
    }

    #[test]
    fn test_room_cutoffs_increase() {
        for profile in PROFILES {
            let cutoffs: Vec<u32> = profile.rooms.iter().map(|r| r.cutoff).collect();
            assert!(cutoffs.windows(2).all(|w| w[0] < w[1]), "{}", profile.name);
            if let Some(last) = profile.rooms.last() {
                assert_eq!(last.cutoff, 100, "{} never falls through", profile.name);
                assert_eq!(last.rarity, 0);
                assert_eq!(last.level, 0);
            }
        }
    }

    #[test]
    fn test_special_profiles_not_weighted() {
        for name in ["moria", "modified", "labyrinth"] {
            assert_eq!(get_profile(name).map(|p| p.alloc), Some(-1), "{}", name);
        }
        for name in ["arena", "town", "mang_town", "wilderness"] {
            assert_eq!(get_profile(name).map(|p| p.alloc), Some(0), "{}", name);
        }
    }
}
