//! Room templates and vaults
//!
//! Layout characters are decoded by the room builders in `cg-core`; see
//! `cg_core::catalog::Vault` for the legend.

use cg_core::MAX_DEPTH;
use cg_core::catalog::{RoomTemplate, Vault, VaultKind};

use crate::rows;

/// A room template entry
#[derive(Debug, Clone, Copy)]
pub struct TemplateEntry {
    pub name: &'static str,
    pub rating: u32,
    pub min_lev: i32,
    pub max_lev: i32,
    pub rows: &'static [&'static str],
}

impl TemplateEntry {
    pub fn to_template(&self) -> RoomTemplate {
        RoomTemplate {
            name: self.name.to_string(),
            rating: self.rating,
            min_lev: self.min_lev,
            max_lev: self.max_lev,
            rows: rows(self.rows),
        }
    }
}

/// A vault entry
#[derive(Debug, Clone, Copy)]
pub struct VaultEntry {
    pub name: &'static str,
    pub kind: VaultKind,
    pub rating: u32,
    pub min_lev: i32,
    pub max_lev: i32,
    pub rows: &'static [&'static str],
}

impl VaultEntry {
    pub fn to_vault(&self) -> Vault {
        Vault {
            name: self.name.to_string(),
            kind: self.kind,
            rating: self.rating,
            min_lev: self.min_lev,
            max_lev: self.max_lev,
            rows: rows(self.rows),
        }
    }
}

/// All room templates
pub static TEMPLATES: &[TemplateEntry] = &[
    TemplateEntry {
        name: "pillared chamber",
        rating: 1,
        min_lev: 1,
        max_lev: MAX_DEPTH,
        rows: &[
            "%%%%%%%%%%%%%",
            "%...........%",
            "%.#..#.#..#.%",
            "%.....*.....%",
            "%.#..#.#..#.%",
            "%...........%",
            "%%%%%%%%%%%%%",
        ],
    },
    TemplateEntry {
        name: "inner room",
        rating: 3,
        min_lev: 3,
        max_lev: MAX_DEPTH,
        rows: &[
            "%%%%%%%%%%%%%%%",
            "%.............%",
            "%.###########.%",
            "%.#....&....#.%",
            "%.#.9.....*.'.%",
            "%.#....&....#.%",
            "%.###########.%",
            "%.............%",
            "%%%%%%%%%%%%%%%",
        ],
    },
];

/// All vaults
pub static VAULTS: &[VaultEntry] = &[
    VaultEntry {
        name: "shrine",
        kind: VaultKind::Interesting,
        rating: 5,
        min_lev: 5,
        max_lev: MAX_DEPTH,
        rows: &[
            "%%%%%%%%%%%%%",
            "%...........%",
            "%.####+####.%",
            "%.#...&...#.%",
            "%.#.9...*.#.%",
            "%.#...&...#.%",
            "%.#########.%",
            "%...........%",
            "%%%%%%%%%%%%%",
        ],
    },
    VaultEntry {
        name: "pillared hall",
        kind: VaultKind::Interesting,
        rating: 3,
        min_lev: 1,
        max_lev: MAX_DEPTH,
        rows: &[
            "%%%%%%%%%%%%%%%%%",
            "%...............%",
            "%.#.#.#.#.#.#.#.%",
            "%.......&.......%",
            "%.#.#.#.#.#.#.#.%",
            "%...*.......*...%",
            "%%%%%%%%%%%%%%%%%",
        ],
    },
    VaultEntry {
        name: "lesser hoard",
        kind: VaultKind::Lesser,
        rating: 15,
        min_lev: 15,
        max_lev: MAX_DEPTH,
        rows: &[
            "XXXXXXXXXXXXXXX",
            "X.............X",
            "X.XXXXX+XXXXX.X",
            "X.X*..&9&..*X.X",
            "X.XXXXXXXXXXX.X",
            "X.............X",
            "XXXXXXX'XXXXXXX",
        ],
    },
    VaultEntry {
        name: "guard post",
        kind: VaultKind::Lesser,
        rating: 20,
        min_lev: 20,
        max_lev: MAX_DEPTH,
        rows: &[
            "XXXXXX'XXXXXX",
            "X...........X",
            "X.#########.X",
            "X.#.8...8.#.X",
            "X.#...@...+.X",
            "X.#.8...8.#.X",
            "X.#########.X",
            "X...........X",
            "XXXXXXXXXXXXX",
        ],
    },
    VaultEntry {
        name: "dragon's lair",
        kind: VaultKind::Greater,
        rating: 40,
        min_lev: 30,
        max_lev: MAX_DEPTH,
        rows: &[
            "XXXXXXXXXXXXXXXXXXXXXXXXX",
            "X.......................X",
            "X.XXXXXXXXXXX+XXXXXXXXX.X",
            "X.X&.....*.....*.....&X.X",
            "X.X.XXXXXXX+XXXXXXXXX.X.X",
            "X.X.X9..@...8...@..9X.X.X",
            "X.X.XXXXXXXXXXXXXXXXX.X.X",
            "X.X&.........*.......&X.X",
            "X.XXXXXXXXXXXXXXXXXXXXX.X",
            "X.......................X",
            "XXXXXXXXXXXX'XXXXXXXXXXXX",
        ],
    },
];

/// Get a room template by name
pub fn get_template(name: &str) -> Option<&'static TemplateEntry> {
    TEMPLATES.iter().find(|t| t.name == name)
}

/// Get a vault by name
pub fn get_vault(name: &str) -> Option<&'static VaultEntry> {
    VAULTS.iter().find(|v| v.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cg_core::catalog::Layout;

    #[test]
    fn test_layouts_validate() {
        for t in TEMPLATES {
            assert!(t.to_template().validate().is_ok(), "{}", t.name);
        }
        for v in VAULTS {
            assert!(v.to_vault().validate().is_ok(), "{}", v.name);
        }
    }

    #[test]
    fn test_permanent_vaults_have_a_door_outside() {
        for v in VAULTS.iter().filter(|v| v.rows[0].contains('X')) {
            let first = v.rows[0];
            let last = v.rows[v.rows.len() - 1];
            assert!(
                first.contains('\'') || last.contains('\''),
                "{} is sealed",
                v.name
            );
        }
    }

    #[test]
    fn test_every_vault_kind_present() {
        for kind in [VaultKind::Interesting, VaultKind::Lesser, VaultKind::Greater] {
            assert!(VAULTS.iter().any(|v| v.kind == kind), "{}", kind);
        }
    }
}
