//! Artifact definitions and provenance
//!
//! Every true artifact, and every randomized artifact per player, moves
//! through a small state machine:
//!
//! ```text
//! NotCreated -> Created -> GeneratedInWorld -> Found -> Abandoned
//!      ^           |              |                        ^
//!      +-----------+              +--- (wipe, preserving) -+-> NotCreated
//!                                 +--- (wipe, retiring) ---+
//! ```
//!
//! `Created` means "rolled by an in-flight generation attempt". Only an
//! accepted, stamped chunk promotes it to `GeneratedInWorld`; a discarded
//! attempt sends it back to `NotCreated`. `Found` and `Abandoned` never revert.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use thiserror::Error;

use crate::player::PlayerId;

/// Index of an artifact in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactId(pub u16);

/// Artifact definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDef {
    pub name: String,
    /// Native depth
    pub level: i32,
    /// 1-in-N roll once a level qualifies
    pub rarity: u32,
    /// Contribution to the object rating
    pub rating: u32,
    /// Rolled separately for every player instead of once for the world
    #[serde(default)]
    pub randomized: bool,
}

/// Provenance table key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKey {
    /// A unique artifact shared by the whole world
    True(ArtifactId),
    /// A randomized artifact, tracked separately for each player
    Randomized { player: PlayerId, id: ArtifactId },
}

impl ArtifactKey {
    pub fn id(&self) -> ArtifactId {
        match *self {
            ArtifactKey::True(id) | ArtifactKey::Randomized { id, .. } => id,
        }
    }

    /// Player a randomized artifact belongs to
    pub fn player(&self) -> Option<PlayerId> {
        match *self {
            ArtifactKey::True(_) => None,
            ArtifactKey::Randomized { player, .. } => Some(player),
        }
    }
}

/// Lifecycle state of one artifact
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Provenance {
    #[default]
    NotCreated,
    Created,
    GeneratedInWorld,
    Found,
    /// Abandoned, sold, or retired with a wiped level
    Abandoned,
}

impl Provenance {
    /// Whether `self -> to` is a legal move
    pub const fn can_become(self, to: Provenance) -> bool {
        use Provenance::*;
        matches!(
            (self, to),
            (NotCreated, Created)
                | (Created, NotCreated)
                | (Created, GeneratedInWorld)
                | (GeneratedInWorld, NotCreated)
                | (GeneratedInWorld, Found)
                | (GeneratedInWorld, Abandoned)
                | (Found, Abandoned)
        )
    }

    /// The artifact exists somewhere in the live world
    pub const fn is_live(self) -> bool {
        matches!(self, Provenance::GeneratedInWorld | Provenance::Found)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Provenance::Abandoned)
    }
}

/// Provenance errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProvenanceError {
    #[error("illegal artifact transition {from} -> {to} for {key:?}")]
    IllegalTransition {
        key: ArtifactKey,
        from: Provenance,
        to: Provenance,
    },
}

/// Serialized form of one ledger row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    key: ArtifactKey,
    state: Provenance,
}

/// Process-wide provenance table
///
/// Keys missing from the table are `NotCreated`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LedgerEntry>", into = "Vec<LedgerEntry>")]
pub struct ArtifactLedger {
    states: HashMap<ArtifactKey, Provenance>,
}

impl From<Vec<LedgerEntry>> for ArtifactLedger {
    fn from(entries: Vec<LedgerEntry>) -> Self {
        Self {
            states: entries.into_iter().map(|e| (e.key, e.state)).collect(),
        }
    }
}

impl From<ArtifactLedger> for Vec<LedgerEntry> {
    fn from(ledger: ArtifactLedger) -> Self {
        let mut entries: Vec<LedgerEntry> = ledger
            .states
            .into_iter()
            .filter(|(_, state)| *state != Provenance::NotCreated)
            .map(|(key, state)| LedgerEntry { key, state })
            .collect();
        entries.sort_by_key(|e| (e.key.player(), e.key.id()));
        entries
    }
}

impl ArtifactLedger {
    pub fn state(&self, key: ArtifactKey) -> Provenance {
        self.states.get(&key).copied().unwrap_or_default()
    }

    /// Move `key` to `to`, returning the previous state
    pub fn transition(
        &mut self,
        key: ArtifactKey,
        to: Provenance,
    ) -> Result<Provenance, ProvenanceError> {
        let from = self.state(key);
        if !from.can_become(to) {
            return Err(ProvenanceError::IllegalTransition { key, from, to });
        }
        if to == Provenance::NotCreated {
            self.states.remove(&key);
        } else {
            self.states.insert(key, to);
        }
        Ok(from)
    }

    /// Claim an artifact for an in-flight generation attempt
    pub fn create(&mut self, key: ArtifactKey) -> Result<(), ProvenanceError> {
        self.transition(key, Provenance::Created).map(|_| ())
    }

    /// A player picked the artifact up
    pub fn find(&mut self, key: ArtifactKey) -> Result<(), ProvenanceError> {
        self.transition(key, Provenance::Found).map(|_| ())
    }

    /// A player sold or abandoned the artifact
    pub fn abandon(&mut self, key: ArtifactKey) -> Result<(), ProvenanceError> {
        self.transition(key, Provenance::Abandoned).map(|_| ())
    }

    /// Can a generation attempt roll this artifact right now
    pub fn is_available(&self, key: ArtifactKey) -> bool {
        self.state(key) == Provenance::NotCreated
    }

    /// Keys currently in `state` (never lists `NotCreated`)
    pub fn keys_in(&self, state: Provenance) -> Vec<ArtifactKey> {
        self.states
            .iter()
            .filter(|(_, s)| **s == state)
            .map(|(k, _)| *k)
            .collect()
    }

    pub fn count_in(&self, state: Provenance) -> usize {
        self.states.values().filter(|s| **s == state).count()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const SWORD: ArtifactKey = ArtifactKey::True(ArtifactId(1));

    #[test]
    fn test_happy_path() {
        let mut ledger = ArtifactLedger::default();
        assert!(ledger.is_available(SWORD));
        ledger.create(SWORD).unwrap();
        assert!(!ledger.is_available(SWORD));
        ledger.transition(SWORD, Provenance::GeneratedInWorld).unwrap();
        ledger.find(SWORD).unwrap();
        ledger.abandon(SWORD).unwrap();
        assert_eq!(ledger.state(SWORD), Provenance::Abandoned);
    }

    #[test]
    fn test_double_create_rejected() {
        let mut ledger = ArtifactLedger::default();
        ledger.create(SWORD).unwrap();
        assert_eq!(
            ledger.create(SWORD),
            Err(ProvenanceError::IllegalTransition {
                key: SWORD,
                from: Provenance::Created,
                to: Provenance::Created,
            })
        );
    }

    #[test]
    fn test_found_never_reverts() {
        let mut ledger = ArtifactLedger::default();
        ledger.create(SWORD).unwrap();
        ledger.transition(SWORD, Provenance::GeneratedInWorld).unwrap();
        ledger.find(SWORD).unwrap();
        assert!(ledger.transition(SWORD, Provenance::NotCreated).is_err());
        assert!(ledger.transition(SWORD, Provenance::Created).is_err());
        assert_eq!(ledger.state(SWORD), Provenance::Found);
    }

    #[test]
    fn test_abandoned_is_terminal() {
        for to in Provenance::iter() {
            assert!(!Provenance::Abandoned.can_become(to));
        }
        assert!(Provenance::Abandoned.is_terminal());
    }

    #[test]
    fn test_randomized_keys_are_per_player() {
        let mut ledger = ArtifactLedger::default();
        let a = ArtifactKey::Randomized {
            player: PlayerId(1),
            id: ArtifactId(5),
        };
        let b = ArtifactKey::Randomized {
            player: PlayerId(2),
            id: ArtifactId(5),
        };
        ledger.create(a).unwrap();
        assert!(ledger.is_available(b));
        assert_eq!(a.player(), Some(PlayerId(1)));
        assert_eq!(SWORD.player(), None);
    }

    #[test]
    fn test_ledger_serde_roundtrip() {
        let mut ledger = ArtifactLedger::default();
        ledger.create(SWORD).unwrap();
        ledger.transition(SWORD, Provenance::GeneratedInWorld).unwrap();
        let rand = ArtifactKey::Randomized {
            player: PlayerId(3),
            id: ArtifactId(2),
        };
        ledger.create(rand).unwrap();

        let json = serde_json::to_string(&ledger).unwrap();
        let back: ArtifactLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
        assert_eq!(back.count_in(Provenance::Created), 1);
    }

    #[test]
    fn test_not_created_is_not_stored() {
        let mut ledger = ArtifactLedger::default();
        ledger.create(SWORD).unwrap();
        ledger.transition(SWORD, Provenance::NotCreated).unwrap();
        assert!(ledger.is_empty());
    }
}
