//! Object kinds

use cg_core::object::ObjectKind;

/// An object kind entry
#[derive(Debug, Clone, Copy)]
pub struct ObjectEntry {
    pub name: &'static str,
    /// Shallowest depth the kind appears at
    pub level: i32,
    pub rating: u32,
}

impl ObjectEntry {
    pub fn to_kind(&self) -> ObjectKind {
        ObjectKind {
            name: self.name.to_string(),
            level: self.level,
            rating: self.rating,
        }
    }
}

const fn obj(name: &'static str, level: i32, rating: u32) -> ObjectEntry {
    ObjectEntry {
        name,
        level,
        rating,
    }
}

/// All object kinds
pub static OBJECTS: &[ObjectEntry] = &[
    obj("Ration of Food", 0, 1),
    obj("Wooden Torch", 0, 1),
    obj("Flask of Oil", 1, 1),
    obj("Potion of Cure Light Wounds", 1, 2),
    obj("Scroll of Phase Door", 1, 2),
    obj("Dagger", 1, 2),
    obj("Soft Leather Armour", 1, 2),
    obj("Scroll of Word of Recall", 5, 4),
    obj("Long Sword", 5, 4),
    obj("Wand of Magic Missile", 5, 5),
    obj("Potion of Cure Serious Wounds", 10, 4),
    obj("Metal Cap", 10, 3),
    obj("Ring of Protection", 10, 6),
    obj("Rod of Treasure Location", 15, 6),
    obj("Scroll of Teleportation", 15, 5),
    obj("Potion of Restore Mana", 25, 8),
    obj("Amulet of Slow Digestion", 15, 5),
    obj("Ring of Free Action", 20, 8),
    obj("Lance", 20, 6),
    obj("Rod of Illumination", 20, 7),
    obj("Potion of Healing", 30, 10),
    obj("Wand of Stone to Mud", 30, 8),
    obj("Scroll of Acquirement", 40, 15),
    obj("Mithril Chain Mail", 50, 12),
    obj("Potion of *Healing*", 60, 15),
    obj("Ring of Speed", 75, 25),
];

/// Get an object kind by name
pub fn get_object(name: &str) -> Option<&'static ObjectEntry> {
    OBJECTS.iter().find(|o| o.name == name)
}

/// Get the number of object kinds
pub fn num_objects() -> usize {
    OBJECTS.len()
}
