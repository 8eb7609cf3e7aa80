//! Level feelings
//!
//! Two scores summarize a level: how much treasure it holds relative to its
//! depth and how dangerous its monsters are. Lower object scores mean better
//! loot; higher monster scores mean a quieter level.

use crate::GOOD_ITEM_FEELING;

/// Object rating thresholds, best band first
const OBJ_FEELING_BANDS: [(u64, u8); 7] = [
    (16_000_000, 20),
    (4_000_000, 30),
    (1_000_000, 40),
    (250_000, 50),
    (62_500, 60),
    (15_625, 70),
    (3_900, 80),
];
const OBJ_FEELING_LOWEST: u8 = 90;

/// Monster rating thresholds, most dangerous first
const MON_FEELING_BANDS: [(u64, u8); 8] = [
    (7_000, 1),
    (4_500, 2),
    (2_500, 3),
    (1_500, 4),
    (800, 5),
    (400, 6),
    (150, 7),
    (50, 8),
];
const MON_FEELING_LOWEST: u8 = 9;

fn band(ratio: u64, bands: &[(u64, u8)], lowest: u8) -> u8 {
    bands
        .iter()
        .find(|(threshold, _)| ratio > *threshold)
        .map_or(lowest, |&(_, score)| score)
}

/// Object feeling; 0 on the surface and on fixed levels
pub fn obj_feeling(rating: u64, depth: i32, good_item: bool, random: bool) -> u8 {
    if depth <= 0 || !random {
        return 0;
    }
    if good_item {
        return GOOD_ITEM_FEELING;
    }
    band(rating / depth as u64, &OBJ_FEELING_BANDS, OBJ_FEELING_LOWEST)
}

/// Monster feeling; 0 on the surface and on fixed levels
pub fn mon_feeling(rating: u64, depth: i32, random: bool) -> u8 {
    if depth <= 0 || !random {
        return 0;
    }
    band(rating / depth as u64, &MON_FEELING_BANDS, MON_FEELING_LOWEST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_object_bands() {
        assert_eq!(obj_feeling(0, 10, false, true), 90);
        assert_eq!(obj_feeling(39_010, 10, false, true), 80);
        assert_eq!(obj_feeling(160_000_010, 10, false, true), 20);
        assert_eq!(obj_feeling(0, 10, true, true), GOOD_ITEM_FEELING);
    }

    #[test]
    fn test_monster_bands() {
        assert_eq!(mon_feeling(0, 5, true), 9);
        assert_eq!(mon_feeling(255, 5, true), 8);
        assert_eq!(mon_feeling(35_005, 5, true), 1);
    }

    #[test]
    fn test_surface_and_fixed_levels_score_zero() {
        assert_eq!(obj_feeling(1_000_000, 0, true, true), 0);
        assert_eq!(mon_feeling(1_000_000, 0, true), 0);
        assert_eq!(obj_feeling(1_000_000, 20, true, false), 0);
        assert_eq!(mon_feeling(1_000_000, 20, false), 0);
    }

    proptest! {
        #[test]
        fn prop_obj_feeling_monotone(a in 0u64..100_000_000, b in 0u64..100_000_000, depth in 1i32..128) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(obj_feeling(hi, depth, false, true) <= obj_feeling(lo, depth, false, true));
        }

        #[test]
        fn prop_mon_feeling_monotone(a in 0u64..2_000_000, b in 0u64..2_000_000, depth in 1i32..128) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(mon_feeling(hi, depth, true) <= mon_feeling(lo, depth, true));
        }

        #[test]
        fn prop_total_in_range(obj in any::<u64>(), mon in any::<u64>(), depth in 0i32..128, good in any::<bool>(), random in any::<bool>()) {
            let total = u32::from(obj_feeling(obj, depth, good, random)) + u32::from(mon_feeling(mon, depth, random));
            prop_assert!(total <= 100);
        }
    }
}
