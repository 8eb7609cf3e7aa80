//! Tunnels between rooms
//!
//! Rooms are joined in four passes:
//! 1. Each room to the next in a shuffled order
//! 2. Rooms two apart, if not already joined
//! 3. Anything the first room cannot reach on the map, to the first room
//! 4. A few extra tunnels for loops
//!
//! A tunnel is recorded in the arena while it is walked and only dug once
//! the walk is over.

use crate::catalog::TunnelParams;
use crate::dungeon::arena::{GenArena, TunnelFlags};
use crate::dungeon::cell::{CellFlags, Loc, Terrain};
use crate::dungeon::chunk::Chunk;
use crate::dungeon::errors::GenFailure;
use crate::rng::GameRng;

/// Longest walk a single tunnel may take
const TUNNEL_STEPS: usize = 2000;

/// Steps a tunnel must walk before it may stop at another corridor
const TUNNEL_MIN_RUN: usize = 10;

const ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Which rooms are already joined, as equivalence classes
#[derive(Debug, Clone)]
pub struct ConnectivityTracker {
    class: Vec<usize>,
}

impl ConnectivityTracker {
    pub fn new(rooms: usize) -> Self {
        Self {
            class: (0..rooms).collect(),
        }
    }

    pub fn are_connected(&self, a: usize, b: usize) -> bool {
        match (self.class.get(a), self.class.get(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    pub fn merge(&mut self, a: usize, b: usize) {
        let (Some(&keep), Some(&old)) = (self.class.get(a), self.class.get(b)) else {
            return;
        };
        for class in &mut self.class {
            if *class == old {
                *class = keep;
            }
        }
    }

    pub fn all_connected(&self) -> bool {
        self.class.windows(2).all(|w| w[0] == w[1])
    }
}

/// How a tunnel walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelEnd {
    /// Reached the target room
    Reached,
    /// Ran into another corridor and stopped there
    Junction,
    /// Ran out of steps
    GaveUp,
}

/// Join every room in the arena
pub fn connect_rooms(
    chunk: &mut Chunk,
    arena: &mut GenArena,
    rng: &mut GameRng,
    params: &TunnelParams,
) -> Result<ConnectivityTracker, GenFailure> {
    let n = arena.room_count();
    let mut tracker = ConnectivityTracker::new(n);
    if n < 2 {
        return Ok(tracker);
    }

    let mut order: Vec<usize> = (0..n).collect();
    rng.shuffle(&mut order);

    for pair in order.windows(2) {
        join(chunk, arena, rng, params, &mut tracker, pair[0], pair[1])?;
    }

    for i in 0..n.saturating_sub(2) {
        let (a, b) = (order[i], order[i + 2]);
        if !tracker.are_connected(a, b) {
            join(chunk, arena, rng, params, &mut tracker, a, b)?;
        }
    }

    // Bounded: every room gets a few tries at the first one
    for _ in 0..3 {
        merge_reachable(chunk, arena, &mut tracker, order[0]);
        if tracker.all_connected() {
            break;
        }
        for &b in &order[1..] {
            if !tracker.are_connected(order[0], b) {
                join(chunk, arena, rng, params, &mut tracker, b, order[0])?;
            }
        }
    }

    if n > 2 {
        let extra = (rng.randint0(n as u32) as usize + 1).min(4);
        for _ in 0..extra {
            let a = rng.randint0(n as u32) as usize;
            let b = rng.randint0(n as u32) as usize;
            if a != b {
                join(chunk, arena, rng, params, &mut tracker, a, b)?;
            }
        }
    }

    for loc in arena.take_doors() {
        if rng.percent(params.jct) {
            try_door(chunk, rng, loc);
        }
    }
    merge_reachable(chunk, arena, &mut tracker, order[0]);
    Ok(tracker)
}

/// Merge every room whose centre `root`'s centre can walk to
///
/// Tunnels that stop at a junction join rooms the tracker never hears
/// about; the dug map is the ground truth.
fn merge_reachable(chunk: &Chunk, arena: &GenArena, tracker: &mut ConnectivityTracker, root: usize) {
    let centres = arena.centres();
    let Some(&start) = centres.get(root) else { return };
    let reached = chunk.reach_map(start);
    for (room, centre) in centres.iter().enumerate() {
        let hit = reached
            .get(centre.x as usize)
            .and_then(|col| col.get(centre.y as usize))
            .copied()
            .unwrap_or(false);
        if hit && !tracker.are_connected(root, room) {
            tracker.merge(root, room);
        }
    }
}

fn join(
    chunk: &mut Chunk,
    arena: &mut GenArena,
    rng: &mut GameRng,
    params: &TunnelParams,
    tracker: &mut ConnectivityTracker,
    a: usize,
    b: usize,
) -> Result<(), GenFailure> {
    let start = anchor(arena, a, rng);
    let end = anchor(arena, b, rng);
    if dig_tunnel(chunk, arena, rng, params, start, end, b)? == TunnelEnd::Reached {
        tracker.merge(a, b);
    }
    Ok(())
}

/// Where a tunnel attaches to a room: one of its doors, or its centre
fn anchor(arena: &GenArena, room: usize, rng: &mut GameRng) -> Loc {
    rng.choose(arena.entrances(room))
        .copied()
        .unwrap_or(arena.centres()[room])
}

fn towards(from: Loc, to: Loc, rng: &mut GameRng) -> (i32, i32) {
    let dx = (to.x - from.x).signum();
    let dy = (to.y - from.y).signum();
    if dx != 0 && dy != 0 {
        if rng.one_in(2) { (dx, 0) } else { (0, dy) }
    } else {
        (dx, dy)
    }
}

fn random_dir(rng: &mut GameRng) -> (i32, i32) {
    ORTHOGONAL[rng.randint0(4) as usize]
}

fn blocks_tunnel(chunk: &Chunk, loc: Loc) -> bool {
    let cell = chunk.cell(loc);
    cell.terrain.is_permanent()
        || cell.has(CellFlags::WALL_SOLID | CellFlags::WALL_INNER | CellFlags::WALL_OUTER)
}

/// Walk a tunnel from `start` towards `end`, then dig it
pub fn dig_tunnel(
    chunk: &mut Chunk,
    arena: &mut GenArena,
    rng: &mut GameRng,
    params: &TunnelParams,
    start: Loc,
    end: Loc,
    target: usize,
) -> Result<TunnelEnd, GenFailure> {
    let mut loc = start;
    let mut dir = towards(start, end, rng);
    let mut door_placed = false;
    let mut outcome = TunnelEnd::GaveUp;

    for step in 0..TUNNEL_STEPS {
        if loc == end {
            outcome = TunnelEnd::Reached;
            break;
        }
        if rng.percent(params.chg) {
            dir = if rng.percent(params.rnd) { random_dir(rng) } else { towards(loc, end, rng) };
        }
        if dir == (0, 0) {
            dir = random_dir(rng);
        }

        let next = loc.offset(dir.0, dir.1);
        if !chunk.in_bounds_fully(next) {
            dir = towards(loc, end, rng);
            continue;
        }
        if next == end || arena.room_of_entrance(next) == Some(target) {
            loc = next;
            outcome = TunnelEnd::Reached;
            break;
        }

        let cell = *chunk.cell(next);
        if cell.terrain.is_permanent() || cell.has(CellFlags::WALL_SOLID | CellFlags::WALL_INNER) {
            dir = random_dir(rng);
            continue;
        }

        if cell.has(CellFlags::WALL_OUTER) {
            let beyond = next.offset(dir.0, dir.1);
            if !chunk.in_bounds_fully(beyond) || blocks_tunnel(chunk, beyond) {
                dir = random_dir(rng);
                continue;
            }
            pierce(chunk, arena, next)?;
            loc = next;
            continue;
        }

        if cell.has(CellFlags::ROOM) {
            arena.add_tunnel(next, TunnelFlags::ROOM_CROSSED)?;
            loc = next;
            continue;
        }

        if cell.terrain.is_wall() {
            arena.add_tunnel(next, TunnelFlags::empty())?;
            door_placed = false;
            loc = next;
            continue;
        }

        // Another corridor
        arena.add_tunnel(next, TunnelFlags::JUNCTION)?;
        if !door_placed {
            arena.add_door(next)?;
            door_placed = true;
        }
        loc = next;
        if step > TUNNEL_MIN_RUN && !rng.percent(params.con) {
            outcome = TunnelEnd::Junction;
            break;
        }
    }

    let (cells, walls) = arena.take_tunnel();
    for (at, flags) in cells {
        if flags.is_empty() && chunk.cell(at).terrain.is_wall() && !chunk.cell(at).terrain.is_permanent() {
            chunk.set_terrain(at, Terrain::Floor);
        }
    }
    for at in walls {
        let terrain = if rng.percent(params.pen) { random_door(rng) } else { Terrain::Floor };
        chunk.set_terrain(at, terrain);
        if terrain.is_door()
            && let Some(room) = nearest_room(arena, at)
        {
            arena.add_entrance(room, at)?;
        }
    }
    Ok(outcome)
}

/// Open an outer wall; its wall neighbours can no longer be pierced
fn pierce(chunk: &mut Chunk, arena: &mut GenArena, at: Loc) -> Result<(), GenFailure> {
    arena.add_wall(at)?;
    chunk.cell_mut(at).flags.remove(CellFlags::WALL_OUTER);
    for n in at.adjacent() {
        if chunk.in_bounds(n) && chunk.cell(n).has(CellFlags::WALL_OUTER) {
            let cell = chunk.cell_mut(n);
            cell.flags.remove(CellFlags::WALL_OUTER);
            cell.flags |= CellFlags::WALL_SOLID;
        }
    }
    Ok(())
}

fn nearest_room(arena: &GenArena, at: Loc) -> Option<usize> {
    arena
        .centres()
        .iter()
        .enumerate()
        .min_by_key(|(_, c)| c.distance(at))
        .map(|(i, _)| i)
}

fn random_door(rng: &mut GameRng) -> Terrain {
    match rng.randint0(10) {
        0 => Terrain::SecretDoor,
        1..=3 => Terrain::OpenDoor,
        _ => Terrain::ClosedDoor,
    }
}

/// Put a door on a corridor cell that sits between two walls
pub(crate) fn try_door(chunk: &mut Chunk, rng: &mut GameRng, loc: Loc) {
    if !chunk.in_bounds_fully(loc) {
        return;
    }
    let cell = chunk.cell(loc);
    if cell.terrain != Terrain::Floor || cell.has(CellFlags::ROOM) {
        return;
    }
    let wall = |dx, dy| chunk.cell(loc.offset(dx, dy)).terrain.is_wall();
    let floor = |dx, dy| chunk.cell(loc.offset(dx, dy)).terrain.is_floor();
    let across = wall(0, -1) && wall(0, 1) && floor(-1, 0) && floor(1, 0);
    let along = wall(-1, 0) && wall(1, 0) && floor(0, -1) && floor(0, 1);
    if across || along {
        let door = random_door(rng);
        chunk.set_terrain(loc, door);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldPos;

    #[test]
    fn test_connectivity_tracker() {
        let mut tracker = ConnectivityTracker::new(5);
        assert!(!tracker.are_connected(0, 1));

        tracker.merge(0, 1);
        assert!(tracker.are_connected(0, 1));
        assert!(!tracker.are_connected(0, 2));

        tracker.merge(1, 2);
        assert!(tracker.are_connected(0, 2));
        assert!(!tracker.all_connected());

        tracker.merge(2, 3);
        tracker.merge(3, 4);
        assert!(tracker.all_connected());
        assert!(!tracker.are_connected(0, 9));
    }

    fn walled_room(chunk: &mut Chunk, arena: &mut GenArena, tl: Loc, br: Loc) -> usize {
        chunk.fill_rect(tl, br, Terrain::Floor, CellFlags::ROOM);
        crate::dungeon::room::draw_outer_walls(chunk, tl, br);
        let centre = Loc::new((tl.x + br.x) / 2, (tl.y + br.y) / 2);
        arena.add_room(centre).unwrap()
    }

    #[test]
    fn test_tunnel_joins_two_rooms() {
        for seed in 0..10 {
            let mut chunk = Chunk::new(WorldPos::new(0, 0, 3), 22, 66);
            let mut arena = GenArena::new(Default::default());
            let mut rng = GameRng::new(seed);
            walled_room(&mut chunk, &mut arena, Loc::new(5, 5), Loc::new(10, 9));
            walled_room(&mut chunk, &mut arena, Loc::new(40, 10), Loc::new(46, 15));

            let params = TunnelParams {
                rnd: 0,
                chg: 10,
                con: 100,
                pen: 0,
                jct: 0,
            };
            let tracker = connect_rooms(&mut chunk, &mut arena, &mut rng, &params).unwrap();
            assert!(tracker.all_connected());
            assert!(chunk.is_fully_connected());
        }
    }

    #[test]
    fn test_tracker_follows_the_dug_map() {
        let mut chunk = Chunk::new(WorldPos::new(0, 0, 3), 22, 66);
        let mut arena = GenArena::new(Default::default());
        for (tl, br) in [((3, 3), (8, 7)), ((20, 3), (25, 7)), ((40, 12), (45, 16))] {
            chunk.fill_rect(Loc::new(tl.0, tl.1), Loc::new(br.0, br.1), Terrain::Floor, CellFlags::ROOM);
            arena.add_room(Loc::new((tl.0 + br.0) / 2, (tl.1 + br.1) / 2)).unwrap();
        }
        // A corridor between the first two rooms only
        for x in 9..20 {
            chunk.set_terrain(Loc::new(x, 5), Terrain::Floor);
        }

        let mut tracker = ConnectivityTracker::new(3);
        merge_reachable(&chunk, &arena, &mut tracker, 0);
        assert!(tracker.are_connected(0, 1));
        assert!(!tracker.are_connected(0, 2));
        assert!(!chunk.is_fully_connected());
    }

    #[test]
    fn test_pierce_solidifies_neighbours() {
        let mut chunk = Chunk::new(WorldPos::new(0, 0, 3), 22, 66);
        let mut arena = GenArena::new(Default::default());
        walled_room(&mut chunk, &mut arena, Loc::new(5, 5), Loc::new(10, 9));
        pierce(&mut chunk, &mut arena, Loc::new(7, 4)).unwrap();
        assert!(!chunk.cell(Loc::new(7, 4)).has(CellFlags::WALL_OUTER));
        assert!(chunk.cell(Loc::new(6, 4)).has(CellFlags::WALL_SOLID));
        assert!(chunk.cell(Loc::new(8, 4)).has(CellFlags::WALL_SOLID));
    }

    #[test]
    fn test_try_door_needs_walls_on_both_sides() {
        let mut chunk = Chunk::new(WorldPos::new(0, 0, 3), 22, 66);
        for x in 3..10 {
            chunk.set_terrain(Loc::new(x, 5), Terrain::Floor);
        }
        let mut rng = GameRng::new(1);
        try_door(&mut chunk, &mut rng, Loc::new(6, 5));
        assert!(chunk.cell(Loc::new(6, 5)).terrain.is_door());

        // An open area takes no door
        chunk.fill_rect(Loc::new(20, 10), Loc::new(24, 14), Terrain::Floor, CellFlags::empty());
        try_door(&mut chunk, &mut rng, Loc::new(22, 12));
        assert_eq!(chunk.cell(Loc::new(22, 12)).terrain, Terrain::Floor);
    }
}
