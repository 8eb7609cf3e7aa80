//! Vaults and room templates
//!
//! Both are fixed layouts written as rows of text:
//!
//! | char | meaning |
//! |------|---------|
//! | ` `  | leave the cell alone |
//! | `#`  | inner granite wall |
//! | `%`  | outer granite wall (tunnels may pierce) |
//! | `X`  | permanent wall |
//! | `.`  | floor |
//! | `+`  | secret door |
//! | `'`  | closed door |
//! | `~`  | water |
//! | `*`  | object |
//! | `&`  | monster, a few levels out of depth |
//! | `@`  | monster, far out of depth |
//! | `9`  | good object |
//! | `8`  | good object guarded by a monster |

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::CatalogError;

/// Characters a layout may use
const LAYOUT_CHARS: &str = " #%X.+'~*&@98";

/// Vault classes, each drawn by its own room builder
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum VaultKind {
    Interesting,
    Lesser,
    Greater,
}

/// A vault layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub name: String,
    pub kind: VaultKind,
    pub rating: u32,
    pub min_lev: i32,
    pub max_lev: i32,
    pub rows: Vec<String>,
}

/// A room template layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTemplate {
    pub name: String,
    #[serde(default)]
    pub rating: u32,
    #[serde(default)]
    pub min_lev: i32,
    #[serde(default = "default_max_lev")]
    pub max_lev: i32,
    pub rows: Vec<String>,
}

fn default_max_lev() -> i32 {
    crate::MAX_DEPTH
}

/// Shared view of a text layout
pub trait Layout {
    fn name(&self) -> &str;
    fn rows(&self) -> &[String];

    fn height(&self) -> usize {
        self.rows().len()
    }

    fn width(&self) -> usize {
        self.rows().first().map_or(0, |r| r.chars().count())
    }

    /// Rectangular, non-empty and only known characters
    fn validate(&self) -> Result<(), CatalogError> {
        let bad = |reason: &str| CatalogError::BadLayout {
            name: self.name().to_string(),
            reason: reason.to_string(),
        };
        let width = self.width();
        if width == 0 {
            return Err(bad("empty layout"));
        }
        for row in self.rows() {
            if row.chars().count() != width {
                return Err(bad("rows differ in width"));
            }
            if let Some(c) = row.chars().find(|c| !LAYOUT_CHARS.contains(*c)) {
                return Err(bad(&format!("unknown layout character {:?}", c)));
            }
        }
        Ok(())
    }

    fn allowed_at(&self, depth: i32) -> bool;
}

impl Layout for Vault {
    fn name(&self) -> &str {
        &self.name
    }

    fn rows(&self) -> &[String] {
        &self.rows
    }

    fn allowed_at(&self, depth: i32) -> bool {
        self.min_lev <= depth && depth <= self.max_lev
    }
}

impl Layout for RoomTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn rows(&self) -> &[String] {
        &self.rows
    }

    fn allowed_at(&self, depth: i32) -> bool {
        self.min_lev <= depth && depth <= self.max_lev
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault(rows: &[&str]) -> Vault {
        Vault {
            name: "test".to_string(),
            kind: VaultKind::Lesser,
            rating: 10,
            min_lev: 5,
            max_lev: 30,
            rows: rows.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_dimensions() {
        let v = vault(&["%%%%%", "%.9.%", "%%%%%"]);
        assert_eq!(v.height(), 3);
        assert_eq!(v.width(), 5);
        assert!(v.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_ragged_rows() {
        let v = vault(&["%%%%", "%.%"]);
        assert!(matches!(v.validate(), Err(CatalogError::BadLayout { .. })));
    }

    #[test]
    fn test_validate_rejects_unknown_char() {
        let v = vault(&["%%%", "%Q%", "%%%"]);
        assert!(v.validate().is_err());
        assert!(vault(&[]).validate().is_err());
    }

    #[test]
    fn test_depth_window() {
        let v = vault(&["."]);
        assert!(!v.allowed_at(4));
        assert!(v.allowed_at(5));
        assert!(v.allowed_at(30));
        assert!(!v.allowed_at(31));
    }
}
