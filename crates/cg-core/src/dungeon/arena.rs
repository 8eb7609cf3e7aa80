//! Per-attempt generation arena
//!
//! Scratch state a builder fills while laying out one level: room centres,
//! room entrances, door candidates, wall piercings and the tunnel being dug.
//! Every collection is bounded by [`ArenaLimits`]; running past a bound fails
//! the attempt instead of growing.
//!
//! An arena lives for exactly one attempt. [`GenArena::release`] consumes it
//! and settles the artifacts rolled while it was alive.

use bitflags::bitflags;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::cell::Loc;
use super::chunk::Chunk;
use super::errors::GenFailure;
use crate::object::{self, ArtifactKey, ArtifactLedger, Provenance, ProvenanceError};
use crate::{DOOR_MAX, ENTRANCE_MAX, PIT_MAX, ROOM_MAX, TUNNEL_MAX, WALL_MAX};

/// Arena capacities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaLimits {
    pub room_max: usize,
    /// Entrances per room
    pub entrance_max: usize,
    pub door_max: usize,
    pub wall_max: usize,
    pub tunnel_max: usize,
    pub pit_max: usize,
}

impl Default for ArenaLimits {
    fn default() -> Self {
        Self {
            room_max: ROOM_MAX,
            entrance_max: ENTRANCE_MAX,
            door_max: DOOR_MAX,
            wall_max: WALL_MAX,
            tunnel_max: TUNNEL_MAX,
            pit_max: PIT_MAX,
        }
    }
}

bitflags! {
    /// What happened at one tunnel cell
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TunnelFlags: u8 {
        /// Dug through a room wall
        const PIERCED_WALL = 0x01;
        /// Walked across a room
        const ROOM_CROSSED = 0x02;
        /// Met an existing corridor
        const JUNCTION = 0x04;
    }
}

/// Outcome of releasing an arena
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaRelease {
    /// Artifacts promoted to `GeneratedInWorld`
    pub promoted: usize,
    /// Artifacts sent back to `NotCreated`
    pub reverted: usize,
}

/// Scratch state of one generation attempt
#[derive(Debug)]
pub struct GenArena {
    limits: ArenaLimits,
    centres: Vec<Loc>,
    entrances: Vec<Vec<Loc>>,
    ent2room: HashMap<Loc, usize>,
    doors: Vec<Loc>,
    walls: Vec<Loc>,
    tunnel: Vec<(Loc, TunnelFlags)>,
    pits: usize,
    /// This attempt is building a quest level
    pub quest: bool,
    rolled: Vec<ArtifactKey>,
}

impl GenArena {
    pub fn new(limits: ArenaLimits) -> Self {
        Self {
            centres: Vec::with_capacity(limits.room_max),
            entrances: Vec::new(),
            ent2room: HashMap::new(),
            doors: Vec::new(),
            walls: Vec::new(),
            tunnel: Vec::new(),
            pits: 0,
            quest: false,
            rolled: Vec::new(),
            limits,
        }
    }

    pub fn limits(&self) -> &ArenaLimits {
        &self.limits
    }

    /// Record a room centre, returning the room index
    pub fn add_room(&mut self, centre: Loc) -> Result<usize, GenFailure> {
        if self.centres.len() >= self.limits.room_max {
            return Err(GenFailure::ArenaOverflow("rooms"));
        }
        self.centres.push(centre);
        self.entrances.push(Vec::new());
        Ok(self.centres.len() - 1)
    }

    pub fn room_count(&self) -> usize {
        self.centres.len()
    }

    pub fn centres(&self) -> &[Loc] {
        &self.centres
    }

    pub fn rooms_full(&self) -> bool {
        self.centres.len() >= self.limits.room_max
    }

    /// Record an entrance of `room`
    pub fn add_entrance(&mut self, room: usize, loc: Loc) -> Result<(), GenFailure> {
        let Some(list) = self.entrances.get_mut(room) else {
            return Err(GenFailure::builder(format!("entrance for unknown room {}", room)));
        };
        if list.len() >= self.limits.entrance_max {
            return Err(GenFailure::ArenaOverflow("room entrances"));
        }
        list.push(loc);
        self.ent2room.insert(loc, room);
        Ok(())
    }

    pub fn entrances(&self, room: usize) -> &[Loc] {
        self.entrances.get(room).map_or(&[], Vec::as_slice)
    }

    /// Room an entrance belongs to
    pub fn room_of_entrance(&self, loc: Loc) -> Option<usize> {
        self.ent2room.get(&loc).copied()
    }

    /// Record a junction door candidate
    pub fn add_door(&mut self, loc: Loc) -> Result<(), GenFailure> {
        if self.doors.len() >= self.limits.door_max {
            return Err(GenFailure::ArenaOverflow("doors"));
        }
        self.doors.push(loc);
        Ok(())
    }

    pub fn take_doors(&mut self) -> Vec<Loc> {
        std::mem::take(&mut self.doors)
    }

    /// Record a pierced room wall of the current tunnel
    pub fn add_wall(&mut self, loc: Loc) -> Result<(), GenFailure> {
        if self.walls.len() >= self.limits.wall_max {
            return Err(GenFailure::ArenaOverflow("wall piercings"));
        }
        self.walls.push(loc);
        Ok(())
    }

    /// Record a cell of the current tunnel
    pub fn add_tunnel(&mut self, loc: Loc, flags: TunnelFlags) -> Result<(), GenFailure> {
        if self.tunnel.len() >= self.limits.tunnel_max {
            return Err(GenFailure::ArenaOverflow("tunnel grids"));
        }
        self.tunnel.push((loc, flags));
        Ok(())
    }

    /// Hand over the current tunnel and its piercings, starting a new one
    pub fn take_tunnel(&mut self) -> (Vec<(Loc, TunnelFlags)>, Vec<Loc>) {
        (
            std::mem::take(&mut self.tunnel),
            std::mem::take(&mut self.walls),
        )
    }

    pub fn pits(&self) -> usize {
        self.pits
    }

    pub fn can_add_pit(&self) -> bool {
        self.pits < self.limits.pit_max
    }

    pub fn note_pit(&mut self) -> Result<(), GenFailure> {
        if !self.can_add_pit() {
            return Err(GenFailure::ArenaOverflow("pits"));
        }
        self.pits += 1;
        Ok(())
    }

    /// Claim an artifact for this attempt
    pub fn roll_artifact(
        &mut self,
        ledger: &mut ArtifactLedger,
        key: ArtifactKey,
    ) -> Result<(), ProvenanceError> {
        ledger.create(key)?;
        self.rolled.push(key);
        Ok(())
    }

    pub fn rolled(&self) -> &[ArtifactKey] {
        &self.rolled
    }

    /// Consume the arena
    ///
    /// With an accepted, stamped chunk the artifacts it holds become
    /// `GeneratedInWorld`. Anything rolled this attempt that is still
    /// `Created` afterwards never made it onto the level and goes back to
    /// `NotCreated`.
    pub fn release(self, ledger: &mut ArtifactLedger, accepted: Option<&mut Chunk>) -> ArenaRelease {
        let promoted = match accepted {
            Some(chunk) => object::mark_generated_if_ready(chunk, ledger),
            None => 0,
        };

        let mut reverted = 0;
        for key in self.rolled {
            if ledger.state(key) == Provenance::Created
                && ledger.transition(key, Provenance::NotCreated).is_ok()
            {
                reverted += 1;
            }
        }

        tracing::trace!(promoted, reverted, "generation arena released");
        ArenaRelease { promoted, reverted }
    }
}
