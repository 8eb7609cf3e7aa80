//! Map cells: terrain, cell flags and grid coordinates

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A grid coordinate inside a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Loc {
    pub x: i32,
    pub y: i32,
}

impl Loc {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbours
    pub fn orthogonal(self) -> [Loc; 4] {
        [
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(-1, 0),
        ]
    }

    /// All eight neighbours
    pub fn adjacent(self) -> impl Iterator<Item = Loc> {
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(move |(dx, dy)| self.offset(dx, dy))
    }

    pub fn distance(self, other: Loc) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// Terrain type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Terrain {
    #[default]
    Granite = 0,
    PermanentWall = 1,
    Magma = 2,
    Quartz = 3,
    MagmaTreasure = 4,
    QuartzTreasure = 5,
    Rubble = 6,
    Floor = 7,
    ClosedDoor = 8,
    OpenDoor = 9,
    SecretDoor = 10,
    UpStairs = 11,
    DownStairs = 12,
    Water = 13,
    Lava = 14,
    Grass = 15,
    Tree = 16,
    Road = 17,
    ShopEntrance = 18,
}

impl Terrain {
    /// Any kind of wall, including mineral veins
    pub const fn is_wall(&self) -> bool {
        matches!(
            self,
            Terrain::Granite
                | Terrain::PermanentWall
                | Terrain::Magma
                | Terrain::Quartz
                | Terrain::MagmaTreasure
                | Terrain::QuartzTreasure
        )
    }

    /// Walls a tunnel may not cut through
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Terrain::PermanentWall)
    }

    /// Plain floor-like ground: objects and monsters may be placed here
    pub const fn is_floor(&self) -> bool {
        matches!(self, Terrain::Floor | Terrain::Grass | Terrain::Road)
    }

    pub const fn is_door(&self) -> bool {
        matches!(
            self,
            Terrain::ClosedDoor | Terrain::OpenDoor | Terrain::SecretDoor
        )
    }

    pub const fn is_stairs(&self) -> bool {
        matches!(self, Terrain::UpStairs | Terrain::DownStairs)
    }

    /// Can be walked through (closed doors count, they open)
    pub const fn is_passable(&self) -> bool {
        matches!(
            self,
            Terrain::Floor
                | Terrain::ClosedDoor
                | Terrain::OpenDoor
                | Terrain::SecretDoor
                | Terrain::UpStairs
                | Terrain::DownStairs
                | Terrain::Rubble
                | Terrain::Grass
                | Terrain::Tree
                | Terrain::Road
                | Terrain::ShopEntrance
        )
    }

    pub const fn is_water(&self) -> bool {
        matches!(self, Terrain::Water)
    }

    /// Display character
    pub const fn symbol(&self) -> char {
        match self {
            Terrain::Granite => '#',
            Terrain::PermanentWall => '#',
            Terrain::Magma | Terrain::Quartz => '%',
            Terrain::MagmaTreasure | Terrain::QuartzTreasure => '*',
            Terrain::Rubble => ':',
            Terrain::Floor => '.',
            Terrain::ClosedDoor => '+',
            Terrain::OpenDoor => '\'',
            Terrain::SecretDoor => '#',
            Terrain::UpStairs => '<',
            Terrain::DownStairs => '>',
            Terrain::Water => '~',
            Terrain::Lava => '^',
            Terrain::Grass => '"',
            Terrain::Tree => '&',
            Terrain::Road => '.',
            Terrain::ShopEntrance => '1',
        }
    }
}

bitflags! {
    /// Per-cell flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u16 {
        /// Part of a room
        const ROOM = 0x0001;
        /// Part of a vault
        const VAULT = 0x0002;
        /// Lit
        const GLOW = 0x0004;
        /// Hidden feeling trigger
        const FEEL = 0x0008;
        /// Stairs may not be placed here
        const NO_STAIRS = 0x0010;
        /// Training ground for stationary encounters
        const TRAINING = 0x0020;
        /// Whole level has been revealed
        const MARK = 0x0040;
        /// Generation only: inner room wall
        const WALL_INNER = 0x0100;
        /// Generation only: outer room wall
        const WALL_OUTER = 0x0200;
        /// Generation only: solid wall that tunnels must avoid
        const WALL_SOLID = 0x0400;
        /// Generation only: random monsters may not be placed here
        const MON_RESTRICT = 0x0800;

        const GENERATION_ONLY = Self::WALL_INNER.bits()
            | Self::WALL_OUTER.bits()
            | Self::WALL_SOLID.bits()
            | Self::MON_RESTRICT.bits();
    }
}

impl Serialize for CellFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CellFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u16::deserialize(deserializer)?;
        Ok(CellFlags::from_bits_truncate(bits))
    }
}

/// A single map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub terrain: Terrain,
    pub flags: CellFlags,
    /// Monster standing here
    #[serde(skip)]
    pub monster: Option<crate::monster::MonsterId>,
}

impl Cell {
    pub const fn granite() -> Self {
        Self {
            terrain: Terrain::Granite,
            flags: CellFlags::empty(),
            monster: None,
        }
    }

    pub fn has(&self, flag: CellFlags) -> bool {
        self.flags.contains(flag)
    }
}
