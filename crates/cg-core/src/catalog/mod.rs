//! Generation catalog
//!
//! Everything the generator reads but never changes: cave profiles with
//! their room profiles, vaults, room templates, monster races, object kinds
//! and artifacts. A [`Catalog`] is built once from a [`RawCatalog`] and then
//! shared behind an `Arc`.

mod profile;
mod registry;
mod vault;

use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::monster::{MonsterRace, RaceId};
use crate::object::{ArtifactDef, ArtifactId, ObjectKind};
use crate::rng::GameRng;

pub use profile::{
    CaveProfile, RawCaveProfile, RawRoomProfile, RoomProfile, StreamerParams, TunnelParams,
};
pub use registry::BuilderRegistry;
pub use vault::{Layout, RoomTemplate, Vault, VaultKind};

/// Profile every catalog must define
pub const CLASSIC_PROFILE: &str = "classic";

/// Catalog errors; all of them mean the content is unusable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("profile {profile} uses unknown builder {builder}")]
    UnknownBuilder { profile: String, builder: String },

    #[error("room profile {room} in {profile} uses unknown room builder {builder}")]
    UnknownRoomBuilder {
        profile: String,
        room: String,
        builder: String,
    },

    #[error("no cave profile named {0}")]
    MissingProfile(String),

    #[error("duplicate {kind} {name}")]
    Duplicate { kind: &'static str, name: String },

    #[error("layout {name}: {reason}")]
    BadLayout { name: String, reason: String },

    #[error("catalog JSON error: {0}")]
    Json(String),
}

/// Catalog content as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCatalog {
    pub profiles: Vec<RawCaveProfile>,
    pub templates: Vec<RoomTemplate>,
    pub vaults: Vec<Vault>,
    pub races: Vec<MonsterRace>,
    pub kinds: Vec<ObjectKind>,
    pub artifacts: Vec<ArtifactDef>,
}

impl RawCatalog {
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(text).map_err(|e| CatalogError::Json(e.to_string()))
    }
}

/// Loaded, immutable catalog
#[derive(Debug)]
pub struct Catalog {
    profiles: Vec<Arc<CaveProfile>>,
    by_name: HashMap<String, usize>,
    templates: Vec<RoomTemplate>,
    vaults: Vec<Vault>,
    races: Vec<MonsterRace>,
    kinds: Vec<ObjectKind>,
    artifacts: Vec<ArtifactDef>,
}

impl Catalog {
    /// Resolve builder names and check the content
    pub fn load(raw: RawCatalog, registry: &BuilderRegistry) -> Result<Self, CatalogError> {
        let mut profiles = Vec::with_capacity(raw.profiles.len());
        let mut by_name = HashMap::new();

        for p in raw.profiles {
            let builder = registry
                .cave(&p.builder)
                .ok_or_else(|| CatalogError::UnknownBuilder {
                    profile: p.name.clone(),
                    builder: p.builder.clone(),
                })?;

            let rooms = p
                .rooms
                .into_iter()
                .map(|r| {
                    let room_builder =
                        registry
                            .room(&r.builder)
                            .ok_or_else(|| CatalogError::UnknownRoomBuilder {
                                profile: p.name.clone(),
                                room: r.name.clone(),
                                builder: r.builder.clone(),
                            })?;
                    Ok(RoomProfile {
                        name: r.name,
                        builder: room_builder,
                        rating: r.rating,
                        height: r.height,
                        width: r.width,
                        level: r.level,
                        pit: r.pit,
                        rarity: r.rarity,
                        cutoff: r.cutoff,
                    })
                })
                .collect::<Result<Vec<_>, CatalogError>>()?;

            if by_name.insert(p.name.clone(), profiles.len()).is_some() {
                return Err(CatalogError::Duplicate {
                    kind: "cave profile",
                    name: p.name,
                });
            }

            profiles.push(Arc::new(CaveProfile {
                name: p.name,
                builder,
                block_size: p.block_size.max(1),
                dun_rooms: p.dun_rooms,
                dun_unusual: p.dun_unusual.max(1),
                max_rarity: p.max_rarity,
                tunnel: p.tunnel,
                streamer: p.streamer,
                up: p.up,
                down: p.down,
                min_level: p.min_level,
                alloc: p.alloc,
                lit: p.lit,
                rooms,
            }));
        }

        if !by_name.contains_key(CLASSIC_PROFILE) {
            return Err(CatalogError::MissingProfile(CLASSIC_PROFILE.to_string()));
        }

        check_unique("vault", raw.vaults.iter().map(|v| v.name.as_str()))?;
        check_unique("room template", raw.templates.iter().map(|t| t.name.as_str()))?;
        check_unique("monster race", raw.races.iter().map(|r| r.name.as_str()))?;
        check_unique("artifact", raw.artifacts.iter().map(|a| a.name.as_str()))?;
        for v in &raw.vaults {
            v.validate()?;
        }
        for t in &raw.templates {
            t.validate()?;
        }

        tracing::info!(
            profiles = profiles.len(),
            vaults = raw.vaults.len(),
            templates = raw.templates.len(),
            races = raw.races.len(),
            artifacts = raw.artifacts.len(),
            "catalog loaded"
        );

        Ok(Self {
            profiles,
            by_name,
            templates: raw.templates,
            vaults: raw.vaults,
            races: raw.races,
            kinds: raw.kinds,
            artifacts: raw.artifacts,
        })
    }

    /// Profiles in catalog order
    pub fn profiles(&self) -> &[Arc<CaveProfile>] {
        &self.profiles
    }

    pub fn profile(&self, name: &str) -> Option<&Arc<CaveProfile>> {
        self.by_name.get(name).map(|&i| &self.profiles[i])
    }

    /// A profile that must exist
    pub fn require(&self, name: &str) -> Result<Arc<CaveProfile>, CatalogError> {
        self.profile(name)
            .cloned()
            .ok_or_else(|| CatalogError::MissingProfile(name.to_string()))
    }

    /// Allocation weight of an optional profile; 0 when absent
    pub fn alloc_of(&self, name: &str) -> i32 {
        self.profile(name).map_or(0, |p| p.alloc)
    }

    pub fn race(&self, id: RaceId) -> Option<&MonsterRace> {
        self.races.get(id.0 as usize)
    }

    pub fn races(&self) -> impl Iterator<Item = (RaceId, &MonsterRace)> {
        self.races
            .iter()
            .enumerate()
            .map(|(i, r)| (RaceId(i as u16), r))
    }

    pub fn race_by_name(&self, name: &str) -> Option<RaceId> {
        self.races().find(|(_, r)| r.name == name).map(|(id, _)| id)
    }

    pub fn kinds(&self) -> &[ObjectKind] {
        &self.kinds
    }

    pub fn artifact(&self, id: ArtifactId) -> Option<&ArtifactDef> {
        self.artifacts.get(id.0 as usize)
    }

    pub fn artifacts(&self) -> impl Iterator<Item = (ArtifactId, &ArtifactDef)> {
        self.artifacts
            .iter()
            .enumerate()
            .map(|(i, a)| (ArtifactId(i as u16), a))
    }

    pub fn vaults(&self) -> &[Vault] {
        &self.vaults
    }

    pub fn templates(&self) -> &[RoomTemplate] {
        &self.templates
    }

    /// A vault of `kind` allowed at `depth`, each candidate equally likely
    pub fn pick_vault(&self, kind: VaultKind, depth: i32, rng: &mut GameRng) -> Option<&Vault> {
        pick_uniform(
            self.vaults
                .iter()
                .filter(|v| v.kind == kind && v.allowed_at(depth)),
            rng,
        )
    }

    /// A room template allowed at `depth`, each candidate equally likely
    pub fn pick_template(&self, depth: i32, rng: &mut GameRng) -> Option<&RoomTemplate> {
        pick_uniform(self.templates.iter().filter(|t| t.allowed_at(depth)), rng)
    }
}

/// Single-pass uniform reservoir pick
fn pick_uniform<'a, T>(items: impl Iterator<Item = &'a T>, rng: &mut GameRng) -> Option<&'a T> {
    let mut choice = None;
    for (seen, item) in items.enumerate() {
        if rng.one_in(seen as u32 + 1) {
            choice = Some(item);
        }
    }
    choice
}

fn check_unique<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(CatalogError::Duplicate {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
