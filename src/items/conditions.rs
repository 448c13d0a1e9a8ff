//! Item-conditional stat bounds: a compile-time table mapping item id to a
//! sequence of bound vectors, tightened further when that item is worn.
//!
//! The full table is catalog content belonging to the (out-of-scope) static
//! item database; this module keeps a representative subset grounded in
//! `examples/original_source/wakautosolver/item_conditions.py`, enough to
//! exercise [`get_conditions`] and the feasibility analyzer's `ImpossibleStat`
//! path end to end.

use crate::attributes::{SetMaximums, SetMinimums};
use crate::items::types::ItemId;
use std::collections::HashMap;
use std::sync::OnceLock;

enum Bound {
    Min(SetMinimums),
    Max(SetMaximums),
}

/// (item_id, bounds) pairs. Multiple items may share one condition list, so
/// we flatten to one row per item rather than nesting groups.
fn raw_conditions() -> &'static [(i32, &'static [Bound])] {
    // Salty cape: 40 <= block <= 50.
    static BLOCK_40_50: &[Bound] = &[
        Bound::Min(SetMinimums {
            block: 40,
            ..nearest_min()
        }),
        Bound::Max(SetMaximums {
            block: 50,
            ..nearest_max()
        }),
    ];
    // Lord Zaens's Cape, Hairlarious Cloak, Excarnus Veil: 40 <= crit <= 50.
    static CRIT_40_50: &[Bound] = &[
        Bound::Min(SetMinimums {
            crit: 40,
            ..nearest_min()
        }),
        Bound::Max(SetMaximums {
            crit: 50,
            ..nearest_max()
        }),
    ];
    // Horned Headgear, Hagen Daz's Helmet: 400 <= distance_mastery <= 500.
    static DISTANCE_400_500: &[Bound] = &[
        Bound::Min(SetMinimums {
            distance_mastery: 400,
            ..nearest_min()
        }),
        Bound::Max(SetMaximums {
            distance_mastery: 500,
            ..nearest_max()
        }),
    ];
    // Amon Amarth Breastplate: 400 <= lock <= 500.
    static LOCK_400_500: &[Bound] = &[
        Bound::Min(SetMinimums {
            lock: 400,
            ..nearest_min()
        }),
        Bound::Max(SetMaximums {
            lock: 500,
            ..nearest_max()
        }),
    ];
    // Breastplate of Shadows and kin: 500 <= lock <= 600.
    static LOCK_500_600: &[Bound] = &[
        Bound::Min(SetMinimums {
            lock: 500,
            ..nearest_min()
        }),
        Bound::Max(SetMaximums {
            lock: 600,
            ..nearest_max()
        }),
    ];
    // Jeering Epaulettes: 500 <= dodge <= 600.
    static DODGE_500_600: &[Bound] = &[
        Bound::Min(SetMinimums {
            dodge: 500,
            ..nearest_min()
        }),
        Bound::Max(SetMaximums {
            dodge: 600,
            ..nearest_max()
        }),
    ];
    // DigiArv Belt and kin: ap <= 11.
    static AP_LE_11: &[Bound] = &[Bound::Max(SetMaximums {
        ap: 11,
        ..nearest_max()
    })];

    const fn nearest_min() -> SetMinimums {
        SetMinimums {
            ap: crate::attributes::DUMMY_MIN,
            mp: crate::attributes::DUMMY_MIN,
            wp: crate::attributes::DUMMY_MIN,
            ra: crate::attributes::DUMMY_MIN,
            crit: crate::attributes::DUMMY_MIN,
            crit_mastery: crate::attributes::DUMMY_MIN,
            elemental_mastery: crate::attributes::DUMMY_MIN,
            one_element_mastery: crate::attributes::DUMMY_MIN,
            two_element_mastery: crate::attributes::DUMMY_MIN,
            three_element_mastery: crate::attributes::DUMMY_MIN,
            distance_mastery: crate::attributes::DUMMY_MIN,
            rear_mastery: crate::attributes::DUMMY_MIN,
            heal_mastery: crate::attributes::DUMMY_MIN,
            berserk_mastery: crate::attributes::DUMMY_MIN,
            melee_mastery: crate::attributes::DUMMY_MIN,
            fire_mastery: crate::attributes::DUMMY_MIN,
            earth_mastery: crate::attributes::DUMMY_MIN,
            water_mastery: crate::attributes::DUMMY_MIN,
            air_mastery: crate::attributes::DUMMY_MIN,
            control: crate::attributes::DUMMY_MIN,
            block: crate::attributes::DUMMY_MIN,
            fd: crate::attributes::DUMMY_MIN,
            heals_performed: crate::attributes::DUMMY_MIN,
            lock: crate::attributes::DUMMY_MIN,
            dodge: crate::attributes::DUMMY_MIN,
        }
    }

    const fn nearest_max() -> SetMaximums {
        SetMaximums {
            ap: crate::attributes::DUMMY_MAX,
            mp: crate::attributes::DUMMY_MAX,
            wp: crate::attributes::DUMMY_MAX,
            ra: crate::attributes::DUMMY_MAX,
            crit: crate::attributes::DUMMY_MAX,
            crit_mastery: crate::attributes::DUMMY_MAX,
            elemental_mastery: crate::attributes::DUMMY_MAX,
            one_element_mastery: crate::attributes::DUMMY_MAX,
            two_element_mastery: crate::attributes::DUMMY_MAX,
            three_element_mastery: crate::attributes::DUMMY_MAX,
            distance_mastery: crate::attributes::DUMMY_MAX,
            rear_mastery: crate::attributes::DUMMY_MAX,
            heal_mastery: crate::attributes::DUMMY_MAX,
            berserk_mastery: crate::attributes::DUMMY_MAX,
            melee_mastery: crate::attributes::DUMMY_MAX,
            fire_mastery: crate::attributes::DUMMY_MAX,
            earth_mastery: crate::attributes::DUMMY_MAX,
            water_mastery: crate::attributes::DUMMY_MAX,
            air_mastery: crate::attributes::DUMMY_MAX,
            control: crate::attributes::DUMMY_MAX,
            block: crate::attributes::DUMMY_MAX,
            fd: crate::attributes::DUMMY_MAX,
            heals_performed: crate::attributes::DUMMY_MAX,
            lock: crate::attributes::DUMMY_MAX,
            dodge: crate::attributes::DUMMY_MAX,
        }
    }

    &[
        (27293, BLOCK_40_50),
        (27294, BLOCK_40_50),
        (27445, CRIT_40_50),
        (27446, CRIT_40_50),
        (26302, CRIT_40_50),
        (26322, CRIT_40_50),
        (27695, CRIT_40_50),
        (26292, DISTANCE_400_500),
        (26313, DISTANCE_400_500),
        (27747, DISTANCE_400_500),
        (27443, LOCK_400_500),
        (27444, LOCK_400_500),
        (26299, LOCK_500_600),
        (26318, LOCK_500_600),
        (26953, LOCK_500_600),
        (26954, LOCK_500_600),
        (27297, LOCK_500_600),
        (27298, LOCK_500_600),
        (26290, LOCK_500_600),
        (26311, LOCK_500_600),
        (26304, DODGE_500_600),
        (26324, DODGE_500_600),
        (27439, AP_LE_11),
        (27440, AP_LE_11),
    ]
}

fn cache() -> &'static HashMap<i32, (SetMinimums, SetMaximums)> {
    static CACHE: OnceLock<HashMap<i32, (SetMinimums, SetMaximums)>> = OnceLock::new();
    CACHE.get_or_init(|| {
        let mut map = HashMap::new();
        for (id, bounds) in raw_conditions() {
            let mut mins = SetMinimums::default();
            let mut maxs = SetMaximums::default();
            for bound in *bounds {
                match bound {
                    Bound::Min(m) => mins = mins & *m,
                    Bound::Max(m) => maxs = maxs & *m,
                }
            }
            map.insert(*id, (mins, maxs));
        }
        map
    })
}

/// Returns the intersection of all mins and all maxs registered for `item_id`,
/// or `None` if the item carries no condition.
pub fn get_conditions(item_id: ItemId) -> Option<(SetMinimums, SetMaximums)> {
    cache().get(&item_id.0).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_item_has_bounded_condition() {
        let (mins, maxs) = get_conditions(ItemId(27293)).expect("salty cape condition");
        assert_eq!(mins.block, 40);
        assert_eq!(maxs.block, 50);
    }

    #[test]
    fn unknown_item_has_no_condition() {
        assert!(get_conditions(ItemId(1)).is_none());
    }

    #[test]
    fn max_only_condition_leaves_min_at_sentinel() {
        let (mins, maxs) = get_conditions(ItemId(27439)).expect("ap-capped belt");
        assert_eq!(mins.ap, crate::attributes::DUMMY_MIN);
        assert_eq!(maxs.ap, 11);
    }

    #[test]
    fn cache_is_stable_across_calls() {
        let a = get_conditions(ItemId(27445));
        let b = get_conditions(ItemId(27445));
        assert_eq!(a, b);
    }
}
