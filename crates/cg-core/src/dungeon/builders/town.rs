//! Surface levels: towns and open wilderness

use strum::Display;

use super::{BuildContext, BuildRequest, CaveBuilder};
use crate::dungeon::alloc::{alloc_monsters, place_stairs};
use crate::dungeon::arena::GenArena;
use crate::dungeon::cell::{CellFlags, Loc, Terrain};
use crate::dungeon::chunk::Chunk;
use crate::dungeon::errors::GenFailure;
use crate::rng::GameRng;
use crate::world::WorldPos;
use crate::{SURFACE_HGT, SURFACE_WID};

/// Shop buildings in a full town
const TOWN_SHOPS: usize = 8;

/// How the surface is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TownLayout {
    /// Same streets and shops every time the level is built
    Static,
    /// Shops placed afresh on every generation
    Dynamic,
    /// No buildings, just open country
    Wilderness,
}

/// Builder for depth-0 levels
#[derive(Debug, Clone, Copy)]
pub struct TownBuilder {
    layout: TownLayout,
}

impl TownBuilder {
    pub const fn new(layout: TownLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> TownLayout {
        self.layout
    }
}

/// RNG for a static town: the same for a given position
fn town_rng(wpos: WorldPos) -> GameRng {
    let x = u64::from(wpos.grid.x as u16);
    let y = u64::from(wpos.grid.y as u16);
    GameRng::new(0x746f_776e_0000_0000 | (x << 16) | y)
}

impl CaveBuilder for TownBuilder {
    fn build(
        &self,
        req: &BuildRequest<'_>,
        _arena: &mut GenArena,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Chunk, GenFailure> {
        let (height, width) = req.dimensions(ctx.config, SURFACE_HGT, SURFACE_WID);
        let mut chunk = Chunk::new(req.wpos, height, width);
        chunk.fill_rect(
            Loc::new(1, 1),
            Loc::new(width as i32 - 2, height as i32 - 2),
            Terrain::Grass,
            CellFlags::empty(),
        );
        chunk.draw_boundary();

        let mut fixed = town_rng(req.wpos);
        let layout_rng = match self.layout {
            TownLayout::Static => &mut fixed,
            TownLayout::Dynamic | TownLayout::Wilderness => &mut *ctx.rng,
        };

        let shops = match self.layout {
            TownLayout::Wilderness => {
                dig_lake(&mut chunk, layout_rng);
                scatter(&mut chunk, layout_rng, Terrain::Tree, 12);
                0
            }
            TownLayout::Static | TownLayout::Dynamic => {
                lay_road(&mut chunk);
                lay_square(&mut chunk);
                let count = match self.layout {
                    TownLayout::Static => TOWN_SHOPS,
                    _ => 4 + layout_rng.randint0(TOWN_SHOPS as u32 - 3) as usize,
                };
                let shops = build_shops(&mut chunk, layout_rng, count);
                scatter(&mut chunk, layout_rng, Terrain::Tree, 40);
                shops
            }
        };
        place_stairs(&mut chunk, layout_rng, req.profile.up, req.profile.down)?;

        // Townsfolk only
        let residents = 4 + ctx.rng.randint0(4) as usize;
        alloc_monsters(&mut chunk, ctx, residents, 0);

        tracing::debug!(layout = %self.layout, shops, "surface built");
        Ok(chunk)
    }
}

/// Main street across the middle
fn lay_road(chunk: &mut Chunk) {
    let y = chunk.height as i32 / 2;
    chunk.fill_rect(
        Loc::new(1, y),
        Loc::new(chunk.width as i32 - 2, y),
        Terrain::Road,
        CellFlags::empty(),
    );
}

/// Open square in the middle of the street where stationary visitors stand
fn lay_square(chunk: &mut Chunk) {
    let (cx, cy) = (chunk.width as i32 / 2, chunk.height as i32 / 2);
    chunk.fill_rect(
        Loc::new(cx - 3, cy - 1),
        Loc::new(cx + 3, cy + 1),
        Terrain::Floor,
        CellFlags::TRAINING,
    );
}

/// Shops in two rows, one either side of the main street
///
/// Each building sits alone in its own lot with grass all around, so the
/// street always reaches every entrance.
fn build_shops(chunk: &mut Chunk, rng: &mut GameRng, count: usize) -> usize {
    let per_row = count.div_ceil(2).max(1);
    let lot_w = (chunk.width as i32 - 2) / per_row as i32;
    let street = chunk.height as i32 / 2;
    let mut built = 0;

    for i in 0..count {
        let (row, col) = (i % 2, (i / 2) as i32);
        let lot_x = 1 + col * lot_w;
        let w = rng.range(3, (lot_w - 3).clamp(3, 7));
        let h = rng.range(2, ((street - 3) / 2).clamp(2, 4));
        let x1 = lot_x + rng.range(1, (lot_w - w - 1).max(1));
        let y1 = if row == 0 { street - 2 - h } else { street + 2 };
        let top_left = Loc::new(x1, y1);
        let bottom_right = Loc::new(x1 + w - 1, y1 + h - 1);
        if !chunk.in_bounds_fully(top_left.offset(-1, -1)) || !chunk.in_bounds_fully(bottom_right.offset(1, 1))
        {
            continue;
        }

        chunk.fill_rect(top_left, bottom_right, Terrain::PermanentWall, CellFlags::NO_STAIRS);
        let door_y = if row == 0 { bottom_right.y } else { top_left.y };
        let door = Loc::new(rng.range(top_left.x, bottom_right.x), door_y);
        chunk.set_terrain(door, Terrain::ShopEntrance);
        built += 1;
    }
    built
}

fn dig_lake(chunk: &mut Chunk, rng: &mut GameRng) {
    let centre = Loc::new(
        rng.range(chunk.width as i32 / 4, chunk.width as i32 * 3 / 4),
        rng.range(chunk.height as i32 / 3, chunk.height as i32 * 2 / 3),
    );
    let ry = (chunk.height as i32 / 4 - 1).max(1);
    let rx = ry * 3;
    for loc in chunk.locs() {
        let (dx, dy) = (loc.x - centre.x, loc.y - centre.y);
        if dx * dx * ry * ry + dy * dy * rx * rx <= rx * rx * ry * ry && chunk.in_bounds_fully(loc) {
            chunk.set_terrain(loc, Terrain::Water);
        }
    }
}

fn scatter(chunk: &mut Chunk, rng: &mut GameRng, terrain: Terrain, count: usize) {
    for _ in 0..count {
        if let Some(loc) = chunk.find_loc(rng, 20, |c, loc| c.cell(loc).terrain == Terrain::Grass) {
            chunk.set_terrain(loc, terrain);
        }
    }
}
