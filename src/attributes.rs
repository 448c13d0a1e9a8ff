//! Attribute model: [`Stats`] and the [`SetMinimums`]/[`SetMaximums`] bound
//! vectors used to express hard floors/ceilings on derived character stats.
//!
//! All three types share the same 25 numeric fields and are generated by one
//! macro so field lists never drift out of sync between the value type and
//! its two bound-vector counterparts.

use serde::{Deserialize, Serialize};

/// Sentinel used by [`SetMinimums`] in place of `-infinity`.
pub const DUMMY_MIN: i32 = -1_000_000;
/// Sentinel used by [`SetMaximums`] in place of `+infinity`.
pub const DUMMY_MAX: i32 = 1_000_000;

macro_rules! define_stats {
    ($($field:ident),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
        pub struct Stats {
            $(pub $field: i32,)+
        }

        impl Stats {
            pub const FIELD_NAMES: &'static [&'static str] = &[$(stringify!($field)),+];
        }

        impl std::ops::Add for Stats {
            type Output = Stats;
            fn add(self, other: Stats) -> Stats {
                Stats { $($field: self.$field + other.$field),+ }
            }
        }

        impl std::ops::Sub for Stats {
            type Output = Stats;
            fn sub(self, other: Stats) -> Stats {
                Stats { $($field: self.$field - other.$field),+ }
            }
        }

        impl std::iter::Sum for Stats {
            fn sum<I: Iterator<Item = Stats>>(iter: I) -> Stats {
                iter.fold(Stats::default(), |acc, s| acc + s)
            }
        }

        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub struct SetMinimums {
            $(pub $field: i32,)+
        }

        impl Default for SetMinimums {
            fn default() -> Self {
                SetMinimums { $($field: DUMMY_MIN),+ }
            }
        }

        impl std::ops::BitAnd for SetMinimums {
            type Output = SetMinimums;
            /// Tighter bound wins: `min1 ∧ min2 = element-wise max`.
            fn bitand(self, other: SetMinimums) -> SetMinimums {
                SetMinimums { $($field: self.$field.max(other.$field)),+ }
            }
        }

        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub struct SetMaximums {
            $(pub $field: i32,)+
        }

        impl Default for SetMaximums {
            fn default() -> Self {
                SetMaximums { $($field: DUMMY_MAX),+ }
            }
        }

        impl std::ops::BitAnd for SetMaximums {
            type Output = SetMaximums;
            /// Tighter bound wins: `max1 ∧ max2 = element-wise min`.
            fn bitand(self, other: SetMaximums) -> SetMaximums {
                SetMaximums { $($field: self.$field.min(other.$field)),+ }
            }
        }
    };
}

define_stats!(
    ap,
    mp,
    wp,
    ra,
    crit,
    crit_mastery,
    elemental_mastery,
    one_element_mastery,
    two_element_mastery,
    three_element_mastery,
    distance_mastery,
    rear_mastery,
    heal_mastery,
    berserk_mastery,
    melee_mastery,
    fire_mastery,
    earth_mastery,
    water_mastery,
    air_mastery,
    control,
    block,
    fd,
    heals_performed,
    lock,
    dodge,
);

impl SetMinimums {
    /// True if any field natively-unhandled by the feasibility analyzer
    /// (everything but ap/mp/ra/crit) deviates from the sentinel.
    pub fn unhandled(&self) -> bool {
        self.wp != DUMMY_MIN
            || self.crit_mastery != DUMMY_MIN
            || self.elemental_mastery != DUMMY_MIN
            || self.one_element_mastery != DUMMY_MIN
            || self.two_element_mastery != DUMMY_MIN
            || self.three_element_mastery != DUMMY_MIN
            || self.distance_mastery != DUMMY_MIN
            || self.rear_mastery != DUMMY_MIN
            || self.heal_mastery != DUMMY_MIN
            || self.berserk_mastery != DUMMY_MIN
            || self.melee_mastery != DUMMY_MIN
            || self.fire_mastery != DUMMY_MIN
            || self.earth_mastery != DUMMY_MIN
            || self.water_mastery != DUMMY_MIN
            || self.air_mastery != DUMMY_MIN
            || self.control != DUMMY_MIN
            || self.block != DUMMY_MIN
            || self.fd != DUMMY_MIN
            || self.heals_performed != DUMMY_MIN
            || self.lock != DUMMY_MIN
            || self.dodge != DUMMY_MIN
    }
}

impl SetMaximums {
    pub fn unhandled(&self) -> bool {
        self.wp != DUMMY_MAX
            || self.crit_mastery != DUMMY_MAX
            || self.elemental_mastery != DUMMY_MAX
            || self.one_element_mastery != DUMMY_MAX
            || self.two_element_mastery != DUMMY_MAX
            || self.three_element_mastery != DUMMY_MAX
            || self.distance_mastery != DUMMY_MAX
            || self.rear_mastery != DUMMY_MAX
            || self.heal_mastery != DUMMY_MAX
            || self.berserk_mastery != DUMMY_MAX
            || self.melee_mastery != DUMMY_MAX
            || self.fire_mastery != DUMMY_MAX
            || self.earth_mastery != DUMMY_MAX
            || self.water_mastery != DUMMY_MAX
            || self.air_mastery != DUMMY_MAX
            || self.control != DUMMY_MAX
            || self.block != DUMMY_MAX
            || self.fd != DUMMY_MAX
            || self.heals_performed != DUMMY_MAX
            || self.lock != DUMMY_MAX
            || self.dodge != DUMMY_MAX
    }
}

/// `mins <= stats <= maxs`, element-wise.
pub fn satisfies(mins: &SetMinimums, stats: &Stats, maxs: &SetMaximums) -> bool {
    mins.ap <= stats.ap
        && stats.ap <= maxs.ap
        && mins.mp <= stats.mp
        && stats.mp <= maxs.mp
        && mins.wp <= stats.wp
        && stats.wp <= maxs.wp
        && mins.ra <= stats.ra
        && stats.ra <= maxs.ra
        && mins.crit <= stats.crit
        && stats.crit <= maxs.crit
        && mins.crit_mastery <= stats.crit_mastery
        && stats.crit_mastery <= maxs.crit_mastery
        && mins.elemental_mastery <= stats.elemental_mastery
        && stats.elemental_mastery <= maxs.elemental_mastery
        && mins.one_element_mastery <= stats.one_element_mastery
        && stats.one_element_mastery <= maxs.one_element_mastery
        && mins.two_element_mastery <= stats.two_element_mastery
        && stats.two_element_mastery <= maxs.two_element_mastery
        && mins.three_element_mastery <= stats.three_element_mastery
        && stats.three_element_mastery <= maxs.three_element_mastery
        && mins.distance_mastery <= stats.distance_mastery
        && stats.distance_mastery <= maxs.distance_mastery
        && mins.rear_mastery <= stats.rear_mastery
        && stats.rear_mastery <= maxs.rear_mastery
        && mins.heal_mastery <= stats.heal_mastery
        && stats.heal_mastery <= maxs.heal_mastery
        && mins.berserk_mastery <= stats.berserk_mastery
        && stats.berserk_mastery <= maxs.berserk_mastery
        && mins.melee_mastery <= stats.melee_mastery
        && stats.melee_mastery <= maxs.melee_mastery
        && mins.fire_mastery <= stats.fire_mastery
        && stats.fire_mastery <= maxs.fire_mastery
        && mins.earth_mastery <= stats.earth_mastery
        && stats.earth_mastery <= maxs.earth_mastery
        && mins.water_mastery <= stats.water_mastery
        && stats.water_mastery <= maxs.water_mastery
        && mins.air_mastery <= stats.air_mastery
        && stats.air_mastery <= maxs.air_mastery
        && mins.control <= stats.control
        && stats.control <= maxs.control
        && mins.block <= stats.block
        && stats.block <= maxs.block
        && mins.fd <= stats.fd
        && stats.fd <= maxs.fd
        && mins.heals_performed <= stats.heals_performed
        && stats.heals_performed <= maxs.heals_performed
        && mins.lock <= stats.lock
        && stats.lock <= maxs.lock
        && mins.dodge <= stats.dodge
        && stats.dodge <= maxs.dodge
}

/// Applies the two-handed weapon transform: `ap += 2, mp -= 2`.
pub fn apply_wield_two_handed(stats: Stats) -> Stats {
    Stats {
        ap: stats.ap + 2,
        mp: stats.mp - 2,
        ..stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_elementwise() {
        let a = Stats {
            ap: 1,
            mp: 2,
            ..Default::default()
        };
        let b = Stats {
            ap: 3,
            crit: 5,
            ..Default::default()
        };
        let sum = a + b;
        assert_eq!(sum.ap, 4);
        assert_eq!(sum.mp, 2);
        assert_eq!(sum.crit, 5);
    }

    #[test]
    fn sub_is_elementwise() {
        let a = Stats {
            ap: 5,
            ..Default::default()
        };
        let b = Stats {
            ap: 2,
            ..Default::default()
        };
        assert_eq!((a - b).ap, 3);
    }

    #[test]
    fn min_defaults_to_sentinel() {
        let m = SetMinimums::default();
        assert_eq!(m.ap, DUMMY_MIN);
        assert!(!m.unhandled());
    }

    #[test]
    fn intersection_is_tighter_max_for_minimums() {
        let a = SetMinimums {
            ap: 5,
            ..Default::default()
        };
        let b = SetMinimums {
            ap: 8,
            ..Default::default()
        };
        let i = a & b;
        assert_eq!(i.ap, 8);
    }

    #[test]
    fn intersection_is_tighter_min_for_maximums() {
        let a = SetMaximums {
            ap: 12,
            ..Default::default()
        };
        let b = SetMaximums {
            ap: 9,
            ..Default::default()
        };
        let i = a & b;
        assert_eq!(i.ap, 9);
    }

    #[test]
    fn intersection_law_holds() {
        let a = SetMinimums {
            ap: 5,
            wp: 2,
            ..Default::default()
        };
        let b = SetMinimums {
            ap: 8,
            wp: 1,
            ..Default::default()
        };
        let i = a & b;
        // For minimums, "tighter" means larger, so the intersection must
        // dominate both inputs rather than be dominated by them.
        assert!(i.ap >= a.ap && i.ap >= b.ap);
        assert!(i.wp >= a.wp && i.wp >= b.wp);
    }

    #[test]
    fn unhandled_excludes_ap_mp_ra_crit() {
        let m = SetMinimums {
            ap: 99,
            mp: 99,
            ra: 99,
            crit: 99,
            ..Default::default()
        };
        assert!(!m.unhandled());

        let m2 = SetMinimums {
            wp: 1,
            ..Default::default()
        };
        assert!(m2.unhandled());
    }

    #[test]
    fn satisfies_checks_all_fields() {
        let mins = SetMinimums {
            ap: 5,
            ..Default::default()
        };
        let maxs = SetMaximums::default();
        let ok = Stats {
            ap: 10,
            ..Default::default()
        };
        let bad = Stats {
            ap: 1,
            ..Default::default()
        };
        assert!(satisfies(&mins, &ok, &maxs));
        assert!(!satisfies(&mins, &bad, &maxs));
    }

    #[test]
    fn wield_two_handed_transform() {
        let s = Stats {
            ap: 6,
            mp: 4,
            ..Default::default()
        };
        let s2 = apply_wield_two_handed(s);
        assert_eq!(s2.ap, 8);
        assert_eq!(s2.mp, 2);
    }

    #[test]
    fn sum_iterator_folds_from_zero() {
        let items = vec![
            Stats {
                ap: 2,
                ..Default::default()
            },
            Stats {
                ap: 3,
                mp: 1,
                ..Default::default()
            },
        ];
        let total: Stats = items.into_iter().sum();
        assert_eq!(total.ap, 5);
        assert_eq!(total.mp, 1);
    }
}
