//! Player data consulted during generation
//!
//! Only what the pipeline needs: identity, the active quest, which fixed
//! encounters this player has already met, and the difficulty gate.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::monster::RaceId;

/// Unique player identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// An active "kill N of race X" quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub race: RaceId,
    pub cur_num: u16,
    pub max_num: u16,
}

impl Quest {
    pub const fn new(race: RaceId, max_num: u16) -> Self {
        Self {
            race,
            cur_num: 0,
            max_num,
        }
    }

    pub const fn is_complete(&self) -> bool {
        self.cur_num >= self.max_num
    }
}

/// Per-player monster memory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lore {
    spawned: HashSet<RaceId>,
}

impl Lore {
    /// Has a fixed encounter of this race already been generated for the player
    pub fn has_spawned(&self, race: RaceId) -> bool {
        self.spawned.contains(&race)
    }

    pub fn mark_spawned(&mut self, race: RaceId) {
        self.spawned.insert(race);
    }

    pub fn spawned_count(&self) -> usize {
        self.spawned.len()
    }
}

/// A player as seen by the generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub max_depth: i32,
    pub quest: Option<Quest>,
    pub lore: Lore,
    /// Forced-descent characters skip fixed encounters
    pub force_descend: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            max_depth: 0,
            quest: None,
            lore: Lore::default(),
            force_descend: false,
        }
    }

    /// The race this player is currently hunting, if the quest is still open
    pub fn quest_target(&self) -> Option<RaceId> {
        self.quest
            .filter(|q| !q.is_complete())
            .map(|q| q.race)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quest_target() {
        let mut player = Player::new(PlayerId(1), "Tam");
        assert_eq!(player.quest_target(), None);

        player.quest = Some(Quest::new(RaceId(7), 3));
        assert_eq!(player.quest_target(), Some(RaceId(7)));

        player.quest = Some(Quest {
            race: RaceId(7),
            cur_num: 3,
            max_num: 3,
        });
        assert_eq!(player.quest_target(), None);
    }

    #[test]
    fn test_lore_spawned() {
        let mut lore = Lore::default();
        assert!(!lore.has_spawned(RaceId(2)));
        lore.mark_spawned(RaceId(2));
        lore.mark_spawned(RaceId(2));
        assert!(lore.has_spawned(RaceId(2)));
        assert_eq!(lore.spawned_count(), 1);
    }
}
