//! Builder registry
//!
//! Catalog data names its builders; the registry turns those names into
//! callable builders once, when the catalog is loaded.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::dungeon::room::{self, RoomBuilder};
use crate::dungeon::{CaveBuilder, builders};

/// Name to builder tables
#[derive(Clone, Default)]
pub struct BuilderRegistry {
    caves: HashMap<String, Arc<dyn CaveBuilder>>,
    rooms: HashMap<String, Arc<dyn RoomBuilder>>,
}

impl BuilderRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in cave and room builder
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        builders::register_defaults(&mut registry);
        room::register_defaults(&mut registry);
        registry
    }

    /// Register a cave builder, replacing any previous one with the same name
    pub fn register_cave(&mut self, name: impl Into<String>, builder: Arc<dyn CaveBuilder>) {
        self.caves.insert(name.into(), builder);
    }

    pub fn register_room(&mut self, name: impl Into<String>, builder: Arc<dyn RoomBuilder>) {
        self.rooms.insert(name.into(), builder);
    }

    pub fn cave(&self, name: &str) -> Option<Arc<dyn CaveBuilder>> {
        self.caves.get(name).cloned()
    }

    pub fn room(&self, name: &str) -> Option<Arc<dyn RoomBuilder>> {
        self.rooms.get(name).cloned()
    }
}

impl fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut caves: Vec<&String> = self.caves.keys().collect();
        let mut rooms: Vec<&String> = self.rooms.keys().collect();
        caves.sort();
        rooms.sort();
        f.debug_struct("BuilderRegistry")
            .field("caves", &caves)
            .field("rooms", &rooms)
            .finish()
    }
}
