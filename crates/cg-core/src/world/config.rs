//! Generation configuration
//!
//! Capacity constants and server switches that shape every generated level.
//! Loaded from JSON or from a plain `key = value` file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dungeon::ArenaLimits;
use crate::{DUNGEON_HGT, DUNGEON_WID, FEELING_TOTAL, LEVEL_MONSTER_MAX};

/// Configuration errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Malformed line: {0}")]
    Malformed(String),

    #[error("JSON error: {0}")]
    Json(String),
}

/// Server-wide generation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Most monsters an accepted level may hold
    pub level_monster_max: usize,
    /// Bounds of the per-attempt generation arena
    pub limits: ArenaLimits,
    /// Hidden feeling cells scattered on each level
    pub feeling_total: usize,
    /// Wiping a level returns its artifacts to the pool instead of retiring them
    pub preserve_artifacts: bool,
    /// Surface levels are generated fully lit
    pub surface_daylight: bool,
    /// Upper bound for builder-chosen dimensions
    pub max_height: usize,
    pub max_width: usize,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            level_monster_max: LEVEL_MONSTER_MAX,
            limits: ArenaLimits::default(),
            feeling_total: FEELING_TOTAL,
            preserve_artifacts: true,
            surface_daylight: true,
            max_height: DUNGEON_HGT,
            max_width: DUNGEON_WID,
        }
    }
}

impl GenConfig {
    /// Load a config file; `.json` files are read as JSON, anything else as `key = value`
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        if path.extension().is_some_and(|e| e == "json") {
            Self::from_json(&contents)
        } else {
            Self::parse_config(&contents)
        }
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(contents).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Parse `key = value` lines; `#` starts a comment, unknown keys are errors
    pub fn parse_config(contents: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for line in contents.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Malformed(line.to_string()));
            };
            config.set_option(key.trim(), value.trim())?;
        }

        Ok(config)
    }

    /// Set a single option by name
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "level_monster_max" => self.level_monster_max = parse_num(key, value)?,
            "feeling_total" => self.feeling_total = parse_num(key, value)?,
            "preserve_artifacts" => self.preserve_artifacts = parse_bool(key, value)?,
            "surface_daylight" => self.surface_daylight = parse_bool(key, value)?,
            "max_height" => self.max_height = parse_num(key, value)?,
            "max_width" => self.max_width = parse_num(key, value)?,
            "room_max" => self.limits.room_max = parse_num(key, value)?,
            "entrance_max" => self.limits.entrance_max = parse_num(key, value)?,
            "door_max" => self.limits.door_max = parse_num(key, value)?,
            "wall_max" => self.limits.wall_max = parse_num(key, value)?,
            "tunnel_max" => self.limits.tunnel_max = parse_num(key, value)?,
            "pit_max" => self.limits.pit_max = parse_num(key, value)?,
            _ => return Err(ConfigError::UnknownOption(key.to_string())),
        }
        Ok(())
    }
}

fn parse_num(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
