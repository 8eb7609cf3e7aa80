//! cg-save: Persistence for cavegen worlds
//!
//! Saves what must outlive a process: the artifact provenance ledger and the
//! players (quest and lore). Levels themselves are regenerated on demand and
//! are never saved.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cg_core::object::ArtifactLedger;
use cg_core::player::Player;
use cg_core::world::{Turn, World};

/// Current save file format version
pub const SAVE_VERSION: u32 = 1;

/// First two bytes of a gzip stream
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Save/restore errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Save file not found")]
    NotFound,

    #[error("Incompatible save version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Invalid save file header")]
    InvalidHeader,
}

/// How a save file is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveFormat {
    #[default]
    Pretty,
    Compact,
    /// Compact JSON inside a gzip stream
    Gzip,
}

/// Save file header for versioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveHeader {
    /// Magic identifier
    pub magic: String,
    /// Save format version
    pub version: u32,
    /// World turn at save time
    pub turn: Turn,
    /// Number of players in the file
    pub players: usize,
    /// Unix time of the save
    pub timestamp: i64,
}

impl SaveHeader {
    const MAGIC: &'static str = "CGRS";

    pub fn new(world: &World) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: SAVE_VERSION,
            turn: world.turn,
            players: world.players().count(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.magic != Self::MAGIC {
            return Err(SaveError::InvalidHeader);
        }
        if self.version != SAVE_VERSION {
            return Err(SaveError::IncompatibleVersion {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// Complete save file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFile {
    pub header: SaveHeader,
    pub ledger: ArtifactLedger,
    pub players: Vec<Player>,
}

impl SaveFile {
    /// Snapshot the persistent parts of a world
    pub fn from_world(world: &World) -> Self {
        let mut players: Vec<Player> = world.players().cloned().collect();
        players.sort_by_key(|p| p.id);
        Self {
            header: SaveHeader::new(world),
            ledger: world.artifacts.clone(),
            players,
        }
    }

    /// Put the saved ledger, players and clock back into `world`
    pub fn restore_into(self, world: &mut World) -> Result<(), SaveError> {
        self.header.validate()?;
        world.turn = self.header.turn;
        world.artifacts = self.ledger;
        for player in self.players {
            world.add_player(player);
        }
        Ok(())
    }
}

/// Encode a save file
pub fn to_bytes(save: &SaveFile, format: SaveFormat) -> Result<Vec<u8>, SaveError> {
    match format {
        SaveFormat::Pretty => Ok(serde_json::to_vec_pretty(save)?),
        SaveFormat::Compact => Ok(serde_json::to_vec(save)?),
        SaveFormat::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            serde_json::to_writer(&mut encoder, save)?;
            Ok(encoder.finish()?)
        }
    }
}

/// Decode a save file, gzipped or not, and check its header
pub fn from_bytes(bytes: &[u8]) -> Result<SaveFile, SaveError> {
    let save: SaveFile = if bytes.starts_with(&GZIP_MAGIC) {
        let mut json = Vec::new();
        GzDecoder::new(bytes).read_to_end(&mut json)?;
        serde_json::from_slice(&json)?
    } else {
        serde_json::from_slice(bytes)?
    };
    save.header.validate()?;
    Ok(save)
}

/// Save a world to a file
pub fn save_world(
    world: &World,
    path: impl AsRef<Path>,
    format: SaveFormat,
) -> Result<(), SaveError> {
    let save = SaveFile::from_world(world);
    let bytes = to_bytes(&save, format)?;
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    tracing::info!(
        path = %path.as_ref().display(),
        players = save.header.players,
        artifacts = save.ledger.len(),
        "world saved"
    );
    Ok(())
}

/// Load a save file
pub fn load_save(path: impl AsRef<Path>) -> Result<SaveFile, SaveError> {
    let file = File::open(path).map_err(|_| SaveError::NotFound)?;
    let mut bytes = Vec::new();
    BufReader::new(file).read_to_end(&mut bytes)?;
    from_bytes(&bytes)
}

/// Load a save file straight into `world`
pub fn load_world(path: impl AsRef<Path>, world: &mut World) -> Result<(), SaveError> {
    load_save(path)?.restore_into(world)
}

/// Load only the header from a save file (for listing saves)
pub fn load_header(path: impl AsRef<Path>) -> Result<SaveHeader, SaveError> {
    Ok(load_save(path)?.header)
}

/// Check if a save file exists
pub fn save_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Delete a save file
pub fn delete_save(path: impl AsRef<Path>) -> Result<(), SaveError> {
    std::fs::remove_file(path)?;
    Ok(())
}

fn save_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("cavegen");
    path.push("saves");
    path
}

/// Get the default save path for a world name
pub fn default_save_path(name: &str) -> PathBuf {
    let mut path = save_dir();
    std::fs::create_dir_all(&path).ok();
    path.push(format!("{}.json", name));
    path
}

/// List all save files in the default save directory, newest first
pub fn list_saves() -> Result<Vec<(PathBuf, SaveHeader)>, SaveError> {
    let dir = save_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut saves = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_save = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".json") || n.ends_with(".json.gz"));
        if is_save && let Ok(header) = load_header(&path) {
            saves.push((path, header));
        }
    }

    saves.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp));
    Ok(saves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cg_core::monster::RaceId;
    use cg_core::object::{ArtifactId, ArtifactKey, Provenance};
    use cg_core::player::{PlayerId, Quest};

    fn world() -> World {
        let mut world = World::new(3);
        world.advance(99);

        let mut player = Player::new(PlayerId(7), "Beren");
        player.quest = Some(Quest::new(RaceId(4), 2));
        player.lore.mark_spawned(RaceId(2));
        world.add_player(player);

        let found = ArtifactKey::True(ArtifactId(0));
        world.artifacts.create(found).unwrap();
        world.artifacts.transition(found, Provenance::GeneratedInWorld).unwrap();
        world.artifacts.find(found).unwrap();
        world
            .artifacts
            .create(ArtifactKey::Randomized {
                player: PlayerId(7),
                id: ArtifactId(3),
            })
            .unwrap();
        world
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join("cavegen_test_save.json");
        let original = world();
        save_world(&original, &path, SaveFormat::Pretty).unwrap();
        assert!(save_exists(&path));

        let mut restored = World::new(0);
        load_world(&path, &mut restored).unwrap();
        assert_eq!(restored.turn, 100);
        assert_eq!(restored.artifacts, original.artifacts);
        let player = restored.player(PlayerId(7)).unwrap();
        assert_eq!(player.quest_target(), Some(RaceId(4)));
        assert!(player.lore.has_spawned(RaceId(2)));

        delete_save(&path).unwrap();
        assert!(!save_exists(&path));
    }

    #[test]
    fn test_gzip_detected_on_load() {
        let save = SaveFile::from_world(&world());
        let bytes = to_bytes(&save, SaveFormat::Gzip).unwrap();
        assert!(bytes.starts_with(&GZIP_MAGIC));

        let decoded = from_bytes(&bytes).unwrap();
        assert_eq!(decoded.ledger, save.ledger);
        assert_eq!(decoded.header, save.header);

        let compact = to_bytes(&save, SaveFormat::Compact).unwrap();
        assert!(!compact.contains(&b'\n'));
        assert_eq!(from_bytes(&compact).unwrap().players.len(), 1);
    }

    #[test]
    fn test_header_validation() {
        let header = SaveHeader::new(&world());
        assert!(header.validate().is_ok());
        assert_eq!(header.players, 1);

        let mut bad_header = header.clone();
        bad_header.magic = "XXXX".to_string();
        assert!(matches!(
            bad_header.validate(),
            Err(SaveError::InvalidHeader)
        ));

        let mut old_header = header;
        old_header.version = 999;
        assert!(matches!(
            old_header.validate(),
            Err(SaveError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn test_restore_rejects_bad_header() {
        let mut save = SaveFile::from_world(&world());
        save.header.version = 0;
        let mut target = World::new(1);
        assert!(save.restore_into(&mut target).is_err());
        assert!(target.artifacts.is_empty());
        assert_eq!(target.players().count(), 0);
    }

    #[test]
    fn test_load_nonexistent() {
        let result = load_save("/nonexistent/path/save.json");
        assert!(matches!(result, Err(SaveError::NotFound)));
    }
}
