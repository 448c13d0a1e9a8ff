//! Solve configuration: character identity, constraint bounds, tuning knobs,
//! and the externally visible error kinds.

use crate::attributes::{SetMaximums, SetMinimums, Stats};
use crate::catalog::SourceKind;
use crate::items::ItemId;
use thiserror::Error;

/// The three externally visible failure kinds (spec §7).
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("infeasible: {0}")]
    Infeasible(String),
    #[error("search completed with no satisfying set")]
    NoSolution,
    #[error("invalid configuration: {0}")]
    ConfigError(String),
    #[error("internal solver error: {0}")]
    Internal(String),
}

/// Playable class. `short_code` matches the original's condensed naming used
/// by the passive/sublimation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassId {
    Feca,
    Osamodas,
    Enutrof,
    Sram,
    Xelor,
    Ecaflip,
    Eniripsa,
    Iop,
    Cra,
    Sadida,
    Sacrier,
    Pandawa,
    Rogue,
    Masqueraider,
    Ouginak,
    Foggernaut,
    Eliotrope,
    Huppermage,
}

impl ClassId {
    pub fn short_code(&self) -> &'static str {
        match self {
            ClassId::Feca => "Feca",
            ClassId::Osamodas => "Osa",
            ClassId::Enutrof => "Enu",
            ClassId::Sram => "Sram",
            ClassId::Xelor => "Xel",
            ClassId::Ecaflip => "Eca",
            ClassId::Eniripsa => "Eni",
            ClassId::Iop => "Iop",
            ClassId::Cra => "Cra",
            ClassId::Sadida => "Sadi",
            ClassId::Sacrier => "Sac",
            ClassId::Pandawa => "Panda",
            ClassId::Rogue => "Rogue",
            ClassId::Masqueraider => "Masq",
            ClassId::Ouginak => "Ougi",
            ClassId::Foggernaut => "Fog",
            ClassId::Eliotrope => "Elio",
            ClassId::Huppermage => "Hupper",
        }
    }

    /// `w_e` in the scoring formula: Huppermages weight elemental mastery
    /// at 1.2x, everyone else at 1x.
    pub fn elemental_weight(&self) -> f64 {
        match self {
            ClassId::Huppermage => 1.2,
            _ => 1.0,
        }
    }
}

/// Class passives recognized by the scoring pre-modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Passive {
    Motivation,
    Carnage,
    Memory,
    SramToTheBone,
    Bravery,
    ArtfulLocker,
    ArtfulDodge,
    InflexibilityII,
    NeutralityI,
    NeutralityII,
    NeutralityIII,
}

/// Sublimations. `Elementalism` is carried over from the original
/// implementation though the distilled passive list omitted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sublimation {
    Elementalism,
}

/// How a negative berserk/rear mastery value is weighted into the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegPolicy {
    Zero,
    Half,
    Full,
}

impl NegPolicy {
    fn scale(&self, value: i32) -> f64 {
        if value >= 0 {
            return value as f64;
        }
        match self {
            NegPolicy::Zero => 0.0,
            NegPolicy::Half => value as f64 * 0.5,
            NegPolicy::Full => value as f64,
        }
    }

    /// Applies the negative-value policy; positive values always pass
    /// through unscaled.
    pub fn weight(&self, value: i32) -> f64 {
        self.scale(value)
    }
}

/// One of the four elements a build can be filtered on for the per-element
/// mastery scoring term (spec §4.3: "element-filtered per-element masteries
/// averaged over #elements"). Ported from the original's `ElementsEnum`
/// bitset; represented here as a plain `Vec<Element>` since the crate has no
/// use for bitwise set operations beyond membership and count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Fire,
    Earth,
    Water,
    Air,
}

/// Which masteries feed the scoring formula (spec §4.3).
#[derive(Debug, Clone)]
pub struct StatPriorities {
    pub melee: bool,
    pub distance: bool,
    pub heal: bool,
    /// Count the `mastery_N_elements` fields for N <= this, 1..=3.
    pub num_mastery: u8,
    pub berserk_policy: NegPolicy,
    pub rear_policy: NegPolicy,
    /// Elements the build leans on; the per-element mastery term averages
    /// the selected elements' mastery fields over their count. Empty means
    /// the term contributes nothing, matching the original's `bit_count()`
    /// guard.
    pub elements: Vec<Element>,
}

impl Default for StatPriorities {
    fn default() -> Self {
        StatPriorities {
            melee: false,
            distance: false,
            heal: false,
            num_mastery: 3,
            berserk_policy: NegPolicy::Zero,
            rear_policy: NegPolicy::Zero,
            elements: Vec::new(),
        }
    }
}

/// The ALS-bracket tolerance map: level window width below `level`.
/// Falls back to 14 for brackets not listed, matching the original's
/// `.get(lv, 14)`.
pub fn default_tolerance(level: u16) -> u16 {
    const BRACKETS: &[(u16, u16)] = &[
        (20, 20),
        (35, 35),
        (50, 50),
        (65, 30),
        (80, 30),
        (95, 30),
        (110, 30),
        (125, 15),
        (140, 15),
        (155, 15),
        (170, 15),
        (185, 15),
        (200, 14),
        (215, 15),
        (230, 14),
    ];
    BRACKETS
        .iter()
        .find(|(bracket, _)| *bracket == level)
        .map(|(_, tol)| *tol)
        .unwrap_or(14)
}

/// Immutable solve request. Constructed by the caller, validated once at
/// the top of [`crate::solve::solve`].
#[derive(Debug, Clone)]
pub struct SolveConfig {
    pub level: u16,
    pub base_stats: Stats,
    pub set_minimums: SetMinimums,
    pub set_maximums: SetMaximums,
    pub priorities: StatPriorities,
    pub forced_item_ids: Vec<ItemId>,
    pub forbidden_item_ids: Vec<ItemId>,
    pub forbidden_names: Vec<String>,
    /// Whole catalog sources to forbid (arch/horde/pvp/ultimate_boss),
    /// resolved against `SourceTags` at the top of `solve()` and folded
    /// into the effective `forbidden_item_ids`.
    pub forbidden_sources: Vec<SourceKind>,
    pub allowed_rarities: Vec<u8>,
    pub class: ClassId,
    pub passives: Vec<Passive>,
    pub sublimations: Vec<Sublimation>,
    pub two_handed: bool,
    pub skip_shields: bool,
    pub use_light_weapon_expert: bool,
    pub unraveling: bool,
    pub dry_run: bool,
    pub exhaustive: bool,
    pub search_depth: usize,
    pub hard_cap_depth: usize,
    pub tolerance: u16,
    pub single_threaded: bool,
}

impl SolveConfig {
    /// Fills in the adaptive defaults (§6 tuning knobs) for everything but
    /// the character-specific fields.
    pub fn new(level: u16, class: ClassId) -> Self {
        SolveConfig {
            level,
            base_stats: Stats::default(),
            set_minimums: SetMinimums::default(),
            set_maximums: SetMaximums::default(),
            priorities: StatPriorities::default(),
            forced_item_ids: Vec::new(),
            forbidden_item_ids: Vec::new(),
            forbidden_names: Vec::new(),
            forbidden_sources: Vec::new(),
            allowed_rarities: vec![1, 2, 3, 4, 5, 6, 7],
            class,
            passives: Vec::new(),
            sublimations: Vec::new(),
            two_handed: false,
            skip_shields: true,
            use_light_weapon_expert: false,
            unraveling: false,
            dry_run: false,
            exhaustive: false,
            search_depth: 1,
            hard_cap_depth: 35,
            tolerance: default_tolerance(level),
            single_threaded: false,
        }
    }

    /// Structural sanity checks that don't require the catalog.
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.level < 1 || self.level > 230 {
            return Err(SolveError::ConfigError(format!(
                "level {} out of range 1..230",
                self.level
            )));
        }
        if self.allowed_rarities.iter().any(|r| !(1..=7).contains(r)) {
            return Err(SolveError::ConfigError(
                "allowed_rarities must be within 1..=7".into(),
            ));
        }
        let conflict = self
            .forced_item_ids
            .iter()
            .any(|id| self.forbidden_item_ids.contains(id));
        if conflict {
            return Err(SolveError::ConfigError(
                "an item id is both forced and forbidden".into(),
            ));
        }
        if (self.tolerance as i32) > self.level as i32 {
            return Err(SolveError::ConfigError(
                "tolerance cannot exceed level (would underflow the level window)".into(),
            ));
        }
        Ok(())
    }

    pub fn low_bound(&self) -> u16 {
        self.level.saturating_sub(self.tolerance).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_matches_known_brackets() {
        assert_eq!(default_tolerance(20), 20);
        assert_eq!(default_tolerance(200), 14);
        assert_eq!(default_tolerance(230), 14);
    }

    #[test]
    fn tolerance_falls_back_for_unlisted_level() {
        assert_eq!(default_tolerance(231), 14);
        assert_eq!(default_tolerance(1), 14);
    }

    #[test]
    fn validate_rejects_level_out_of_range() {
        let mut cfg = SolveConfig::new(230, ClassId::Iop);
        cfg.level = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_forced_forbidden_overlap() {
        let mut cfg = SolveConfig::new(100, ClassId::Iop);
        cfg.forced_item_ids.push(ItemId(1));
        cfg.forbidden_item_ids.push(ItemId(1));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = SolveConfig::new(200, ClassId::Sram);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn neg_policy_passes_through_positive_values() {
        assert_eq!(NegPolicy::Zero.weight(10), 10.0);
        assert_eq!(NegPolicy::Zero.weight(-10), 0.0);
        assert_eq!(NegPolicy::Half.weight(-10), -5.0);
        assert_eq!(NegPolicy::Full.weight(-10), -10.0);
    }

    #[test]
    fn huppermage_gets_boosted_elemental_weight() {
        assert_eq!(ClassId::Huppermage.elemental_weight(), 1.2);
        assert_eq!(ClassId::Iop.elemental_weight(), 1.0);
    }
}
