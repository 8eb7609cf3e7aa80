//! Generated levels
//!
//! A chunk is the grid a builder produces plus everything placed on it.
//! Cells are stored column-major (`cells[x][y]`), the same way the rest of
//! the map code indexes them.

use serde::{Deserialize, Serialize};

use super::cell::{Cell, CellFlags, Loc, Terrain};
use crate::monster::{Monster, MonsterId, RaceId};
use crate::object::{Object, ObjectId};
use crate::rng::GameRng;
use crate::world::{Turn, WorldPos};

/// A generated level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub wpos: WorldPos,
    pub height: usize,
    pub width: usize,
    /// Cells, indexed `[x][y]`
    pub cells: Vec<Vec<Cell>>,
    pub objects: Vec<Object>,
    pub monsters: Vec<Monster>,
    /// Sum of squared object ratings
    pub obj_rating: u64,
    /// Sum of monster power
    pub mon_rating: u64,
    /// Holds at least one good item or artifact
    pub good_item: bool,
    /// Turn the chunk was accepted; `None` while it is still being built
    pub generated: Option<Turn>,
    pub obj_feeling: u8,
    pub mon_feeling: u8,
    pub feeling: u8,
    pub full_illumination: bool,
    /// Name of the cave profile that built the chunk
    pub profile: String,
    next_monster: MonsterId,
    next_object: ObjectId,
}

impl Chunk {
    /// A chunk of solid granite
    pub fn new(wpos: WorldPos, height: usize, width: usize) -> Self {
        Self {
            wpos,
            height,
            width,
            cells: vec![vec![Cell::granite(); height]; width],
            objects: Vec::new(),
            monsters: Vec::new(),
            obj_rating: 0,
            mon_rating: 0,
            good_item: false,
            generated: None,
            obj_feeling: 0,
            mon_feeling: 0,
            feeling: 0,
            full_illumination: false,
            profile: String::new(),
            next_monster: MonsterId(1),
            next_object: ObjectId(1),
        }
    }

    pub fn depth(&self) -> i32 {
        self.wpos.depth
    }

    pub fn in_bounds(&self, loc: Loc) -> bool {
        loc.x >= 0 && loc.y >= 0 && (loc.x as usize) < self.width && (loc.y as usize) < self.height
    }

    /// Inside the bounds and not on the outer edge
    pub fn in_bounds_fully(&self, loc: Loc) -> bool {
        loc.x > 0
            && loc.y > 0
            && (loc.x as usize) < self.width - 1
            && (loc.y as usize) < self.height - 1
    }

    /// Cell at `loc`; callers check bounds first
    pub fn cell(&self, loc: Loc) -> &Cell {
        &self.cells[loc.x as usize][loc.y as usize]
    }

    pub fn cell_mut(&mut self, loc: Loc) -> &mut Cell {
        &mut self.cells[loc.x as usize][loc.y as usize]
    }

    pub fn get(&self, loc: Loc) -> Option<&Cell> {
        if self.in_bounds(loc) {
            Some(self.cell(loc))
        } else {
            None
        }
    }

    pub fn set_terrain(&mut self, loc: Loc, terrain: Terrain) {
        self.cell_mut(loc).terrain = terrain;
    }

    /// Iterate over every location, column by column
    pub fn locs(&self) -> impl Iterator<Item = Loc> + use<> {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..w).flat_map(move |x| (0..h).map(move |y| Loc::new(x, y)))
    }

    /// Set terrain and add flags on the rectangle `top_left..=bottom_right`
    pub fn fill_rect(&mut self, top_left: Loc, bottom_right: Loc, terrain: Terrain, flags: CellFlags) {
        for x in top_left.x..=bottom_right.x {
            for y in top_left.y..=bottom_right.y {
                let loc = Loc::new(x, y);
                if self.in_bounds(loc) {
                    let cell = self.cell_mut(loc);
                    cell.terrain = terrain;
                    cell.flags |= flags;
                }
            }
        }
    }

    /// Surround the chunk with permanent wall
    pub fn draw_boundary(&mut self) {
        let (w, h) = (self.width as i32, self.height as i32);
        for x in 0..w {
            self.set_terrain(Loc::new(x, 0), Terrain::PermanentWall);
            self.set_terrain(Loc::new(x, h - 1), Terrain::PermanentWall);
        }
        for y in 0..h {
            self.set_terrain(Loc::new(0, y), Terrain::PermanentWall);
            self.set_terrain(Loc::new(w - 1, y), Terrain::PermanentWall);
        }
    }

    /// Floor with nothing on it
    pub fn is_empty(&self, loc: Loc) -> bool {
        if !self.in_bounds(loc) {
            return false;
        }
        let cell = self.cell(loc);
        cell.terrain.is_floor() && cell.monster.is_none() && self.object_at(loc).is_none()
    }

    /// A random location anywhere on the chunk
    pub fn random_loc(&self, rng: &mut GameRng) -> Loc {
        Loc::new(
            rng.randint0(self.width as u32) as i32,
            rng.randint0(self.height as u32) as i32,
        )
    }

    /// Up to `tries` random locations; the first one matching `accept`
    pub fn find_loc(
        &self,
        rng: &mut GameRng,
        tries: usize,
        mut accept: impl FnMut(&Chunk, Loc) -> bool,
    ) -> Option<Loc> {
        (0..tries)
            .map(|_| self.random_loc(rng))
            .find(|&loc| accept(self, loc))
    }

    /// Place a monster; its race power counts towards the monster rating
    pub fn add_monster(&mut self, mut monster: Monster, power: u32) -> MonsterId {
        let id = self.next_monster;
        self.next_monster = id.next();
        monster.id = id;
        self.cell_mut(monster.loc).monster = Some(id);
        self.mon_rating += u64::from(power);
        self.monsters.push(monster);
        id
    }

    pub fn monster_count(&self) -> usize {
        self.monsters.len()
    }

    pub fn has_race(&self, race: RaceId) -> bool {
        self.monsters.iter().any(|m| m.race == race)
    }

    /// Place an object; its squared rating counts towards the object rating
    pub fn add_object(&mut self, mut object: Object) -> ObjectId {
        let id = self.next_object;
        self.next_object = id.next();
        object.id = id;
        self.obj_rating += u64::from(object.rating) * u64::from(object.rating);
        if object.good {
            self.good_item = true;
        }
        self.objects.push(object);
        id
    }

    pub fn object_at(&self, loc: Loc) -> Option<&Object> {
        self.objects.iter().find(|o| o.loc == loc)
    }

    /// Strip the flags only builders care about
    pub fn clear_generation_flags(&mut self) {
        for column in &mut self.cells {
            for cell in column {
                cell.flags.remove(CellFlags::GENERATION_ONLY);
            }
        }
    }

    /// Light and reveal every cell
    pub fn illuminate(&mut self) {
        for column in &mut self.cells {
            for cell in column {
                cell.flags |= CellFlags::GLOW | CellFlags::MARK;
            }
        }
        self.full_illumination = true;
    }

    /// Accept the chunk at `turn`
    pub fn stamp(&mut self, turn: Turn) {
        self.generated = Some(turn);
    }

    pub fn is_stamped(&self) -> bool {
        self.generated.is_some()
    }

    pub fn count_terrain(&self, terrain: Terrain) -> usize {
        self.cells
            .iter()
            .flat_map(|col| col.iter())
            .filter(|cell| cell.terrain == terrain)
            .count()
    }

    pub fn count_flag(&self, flag: CellFlags) -> usize {
        self.cells
            .iter()
            .flat_map(|col| col.iter())
            .filter(|cell| cell.has(flag))
            .count()
    }

    /// Every passable cell can be reached from every other one
    pub fn is_fully_connected(&self) -> bool {
        let passable: Vec<Loc> = self
            .locs()
            .filter(|&loc| self.cell(loc).terrain.is_passable())
            .collect();
        let Some(&start) = passable.first() else {
            return true;
        };
        self.flood_fill(start) == passable.len()
    }

    /// Number of passable cells reachable from `start`
    pub fn flood_fill(&self, start: Loc) -> usize {
        self.reach_map(start).iter().flatten().filter(|&&reached| reached).count()
    }

    /// Passable cells reachable from `start`, indexed `[x][y]`
    pub fn reach_map(&self, start: Loc) -> Vec<Vec<bool>> {
        let mut reached = vec![vec![false; self.height]; self.width];
        let mut stack = vec![start];

        while let Some(loc) = stack.pop() {
            if !self.in_bounds(loc)
                || reached[loc.x as usize][loc.y as usize]
                || !self.cell(loc).terrain.is_passable()
            {
                continue;
            }
            reached[loc.x as usize][loc.y as usize] = true;
            stack.extend(loc.orthogonal());
        }

        reached
    }

    /// ASCII rendering, one line per row; `glyph` draws monsters
    pub fn render(&self, glyph: impl Fn(RaceId) -> char) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let loc = Loc::new(x, y);
                let cell = self.cell(loc);
                let ch = if let Some(id) = cell.monster {
                    self.monsters
                        .iter()
                        .find(|m| m.id == id)
                        .map_or('?', |m| glyph(m.race))
                } else if let Some(obj) = self.object_at(loc) {
                    if obj.is_artifact() { '|' } else { '$' }
                } else {
                    cell.terrain.symbol()
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_chunk() -> Chunk {
        let mut chunk = Chunk::new(WorldPos::new(0, 0, 5), 11, 33);
        chunk.fill_rect(Loc::new(1, 1), Loc::new(31, 9), Terrain::Floor, CellFlags::ROOM);
        chunk.draw_boundary();
        chunk
    }

    #[test]
    fn test_bounds() {
        let chunk = open_chunk();
        assert!(chunk.in_bounds(Loc::new(0, 0)));
        assert!(!chunk.in_bounds_fully(Loc::new(0, 0)));
        assert!(chunk.in_bounds_fully(Loc::new(1, 1)));
        assert!(!chunk.in_bounds(Loc::new(33, 0)));
        assert!(!chunk.in_bounds(Loc::new(-1, 3)));
        assert!(chunk.get(Loc::new(40, 40)).is_none());
    }

    #[test]
    fn test_add_monster_and_object() {
        let mut chunk = open_chunk();
        let loc = Loc::new(4, 4);
        assert!(chunk.is_empty(loc));

        let id = chunk.add_monster(Monster::new(RaceId(1), loc), 12);
        assert_eq!(chunk.cell(loc).monster, Some(id));
        assert_eq!(chunk.mon_rating, 12);
        assert!(!chunk.is_empty(loc));

        let other = Loc::new(6, 6);
        chunk.add_object(Object::new("Potion", other, 5, 3));
        assert_eq!(chunk.obj_rating, 9);
        assert!(!chunk.is_empty(other));
        assert!(!chunk.good_item);
    }

    #[test]
    fn test_clear_generation_flags() {
        let mut chunk = open_chunk();
        chunk.cell_mut(Loc::new(2, 2)).flags |= CellFlags::WALL_OUTER | CellFlags::MON_RESTRICT;
        chunk.clear_generation_flags();
        assert_eq!(chunk.count_flag(CellFlags::WALL_OUTER), 0);
        assert_eq!(chunk.count_flag(CellFlags::MON_RESTRICT), 0);
        assert!(chunk.cell(Loc::new(2, 2)).has(CellFlags::ROOM));
    }

    #[test]
    fn test_connectivity() {
        let mut chunk = open_chunk();
        assert!(chunk.is_fully_connected());

        // Wall off the right part
        for y in 1..10 {
            chunk.set_terrain(Loc::new(20, y), Terrain::Granite);
        }
        assert!(!chunk.is_fully_connected());

        chunk.set_terrain(Loc::new(20, 5), Terrain::ClosedDoor);
        assert!(chunk.is_fully_connected());
    }

    #[test]
    fn test_render_dimensions() {
        let chunk = open_chunk();
        let text = chunk.render(|_| 'm');
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert!(lines.iter().all(|l| l.chars().count() == 33));
        assert!(lines[0].chars().all(|c| c == '#'));
    }

    #[test]
    fn test_stamp() {
        let mut chunk = open_chunk();
        assert!(!chunk.is_stamped());
        chunk.stamp(42);
        assert_eq!(chunk.generated, Some(42));
    }
}
