//! Object instances on generated levels

use serde::{Deserialize, Serialize};

use super::ArtifactKey;
use crate::dungeon::Loc;
use crate::player::PlayerId;

/// Unique identifier for an object within one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    pub fn next(self) -> Self {
        ObjectId(self.0 + 1)
    }
}

/// A catalog object kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectKind {
    pub name: String,
    /// Shallowest depth the kind is generated at
    pub level: i32,
    /// Base contribution to the object rating
    pub rating: u32,
}

/// An object lying on a level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    pub id: ObjectId,
    pub name: String,
    pub loc: Loc,
    /// Generation level of the object
    pub level: i32,
    /// Contribution to the level's object rating
    pub rating: u32,
    /// Set for true and randomized artifacts
    pub artifact: Option<ArtifactKey>,
    /// Player the object was rolled for
    pub owner: Option<PlayerId>,
    /// Counts as a "good" item for the level feeling
    pub good: bool,
}

impl Object {
    /// A plain object; the chunk assigns the id
    pub fn new(name: impl Into<String>, loc: Loc, level: i32, rating: u32) -> Self {
        Self {
            id: ObjectId(0),
            name: name.into(),
            loc,
            level,
            rating,
            artifact: None,
            owner: None,
            good: false,
        }
    }

    /// An artifact object; always counts as good
    pub fn artifact(
        name: impl Into<String>,
        loc: Loc,
        level: i32,
        rating: u32,
        key: ArtifactKey,
    ) -> Self {
        Self {
            artifact: Some(key),
            owner: key.player(),
            good: true,
            ..Self::new(name, loc, level, rating)
        }
    }

    pub fn is_artifact(&self) -> bool {
        self.artifact.is_some()
    }
}
