//! cg-data: Built-in catalog content for cavegen
//!
//! Cave profiles with their room profiles, room templates, vaults, monster
//! races, object kinds and artifacts, as static tables.

pub mod artifacts;
pub mod monsters;
pub mod objects;
pub mod profiles;
pub mod rooms;

use cg_core::catalog::{BuilderRegistry, Catalog, CatalogError, RawCatalog};

pub use artifacts::{ARTIFACTS, ArtifactEntry, get_artifact, num_artifacts};
pub use monsters::{MONSTERS, MonsterEntry, get_monster, num_monsters};
pub use objects::{OBJECTS, ObjectEntry, get_object, num_objects};
pub use profiles::{PROFILES, ProfileEntry, RoomEntry, get_profile, num_profiles};
pub use rooms::{TEMPLATES, TemplateEntry, VAULTS, VaultEntry, get_template, get_vault};

/// The whole built-in catalog in its on-disk form
pub fn raw_catalog() -> RawCatalog {
    RawCatalog {
        profiles: PROFILES.iter().map(ProfileEntry::to_raw).collect(),
        templates: TEMPLATES.iter().map(TemplateEntry::to_template).collect(),
        vaults: VAULTS.iter().map(VaultEntry::to_vault).collect(),
        races: MONSTERS.iter().map(MonsterEntry::to_race).collect(),
        kinds: OBJECTS.iter().map(ObjectEntry::to_kind).collect(),
        artifacts: ARTIFACTS.iter().map(ArtifactEntry::to_def).collect(),
    }
}

/// The built-in catalog, loaded against the default builders
pub fn default_catalog() -> Result<Catalog, CatalogError> {
    Catalog::load(raw_catalog(), &BuilderRegistry::with_defaults())
}

fn rows(rows: &[&str]) -> Vec<String> {
    rows.iter().map(|r| r.to_string()).collect()
}
