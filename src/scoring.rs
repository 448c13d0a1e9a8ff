//! Objective function: turns a summed [`Stats`] vector into a single score,
//! plus the cheap `crit_score_key` used to rank candidates during pruning.
//!
//! Passive/sublimation magnitudes beyond `Memory` (pinned by an end-to-end
//! scenario) are representative constants — the real numbers are
//! catalog/game-balance content, out of scope per the crate's purpose.
//! See DESIGN.md.

use crate::attributes::Stats;
use crate::config::{Element, NegPolicy, Passive, SolveConfig, Sublimation};

fn clamp(value: i32, lo: i32, hi: i32) -> i32 {
    value.max(lo).min(hi)
}

/// `apply_unravel`: folds `crit_mastery` into `elemental_mastery` once
/// `crit >= 40`, then zeroes it. Ported exactly from the original's
/// `apply_unravel` helper.
fn apply_unravel(stats: Stats) -> Stats {
    if stats.crit >= 40 {
        Stats {
            elemental_mastery: stats.elemental_mastery + stats.crit_mastery,
            crit_mastery: 0,
            ..stats
        }
    } else {
        stats
    }
}

/// `apply_elementalism`: if the build leans on triple-element mastery alone
/// (one- and two-element mastery both zero, three-element nonzero), add 30
/// final damage and 30 healing performed.
fn apply_elementalism(stats: Stats) -> Stats {
    if stats.one_element_mastery == 0 && stats.two_element_mastery == 0 && stats.three_element_mastery != 0
    {
        Stats {
            fd: stats.fd + 30,
            heals_performed: stats.heals_performed + 30,
            ..stats
        }
    } else {
        stats
    }
}

fn apply_passive(stats: Stats, passive: Passive) -> Stats {
    match passive {
        Passive::Motivation => Stats {
            elemental_mastery: stats.elemental_mastery + 40,
            ..stats
        },
        Passive::Carnage => Stats {
            melee_mastery: stats.melee_mastery + 60,
            ..stats
        },
        Passive::Memory => Stats {
            wp: stats.wp + 6,
            mp: stats.mp - 2,
            ..stats
        },
        Passive::SramToTheBone => Stats {
            crit_mastery: stats.crit_mastery + 30,
            ..stats
        },
        Passive::Bravery => Stats {
            block: stats.block + 40,
            ..stats
        },
        Passive::ArtfulLocker => Stats {
            lock: stats.lock + 40,
            ..stats
        },
        Passive::ArtfulDodge => Stats {
            dodge: stats.dodge + 40,
            ..stats
        },
        Passive::InflexibilityII => Stats {
            fd: stats.fd + 15,
            ..stats
        },
        Passive::NeutralityI => Stats {
            fd: stats.fd + 10,
            ..stats
        },
        Passive::NeutralityII => Stats {
            fd: stats.fd + 20,
            ..stats
        },
        Passive::NeutralityIII => Stats {
            fd: stats.fd + 30,
            ..stats
        },
    }
}

/// Pre-scoring additive transform (spec §4.3): unraveling, elementalism,
/// then every active passive, applied once to the character's base stats.
pub fn apply_modifiers(mut stats: Stats, config: &SolveConfig) -> Stats {
    if config.unraveling {
        stats = apply_unravel(stats);
    }
    if config.sublimations.contains(&Sublimation::Elementalism) {
        stats = apply_elementalism(stats);
    }
    for passive in &config.passives {
        stats = apply_passive(stats, *passive);
    }
    stats
}

/// Search-kernel post-modifiers (spec §4.7 step 4): applied to a
/// scoring-only copy of the combined stats, never to the stats checked
/// against `mins`/`maxs`.
pub fn apply_post_modifiers(stats: Stats, config: &SolveConfig) -> Stats {
    let mut scoring = stats;
    if config.class == crate::config::ClassId::Ecaflip && scoring.crit > 100 {
        scoring.fd += scoring.crit - 100;
    }
    if config.passives.contains(&Passive::Bravery) && scoring.block > 100 {
        scoring.fd += (scoring.block - 100) / 10;
    }
    if config.passives.contains(&Passive::SramToTheBone) {
        scoring.crit_mastery *= 2;
    }
    if config.class == crate::config::ClassId::Masqueraider {
        scoring.fd += scoring.melee_mastery / 10;
    }
    if config.passives.contains(&Passive::InflexibilityII) {
        scoring.crit_mastery += 10;
    }
    scoring
}

/// `fd_bonus` (spec §4.3's `fd_mult = (100 + fd)/100 + fd_bonus`): the
/// Neutrality I/II/III tiers contribute to the final-damage multiplier
/// directly rather than through `fd` itself. Ported from the original's
/// `fd_mod` (`solver.py`'s `8 * min(neutrality_c, 4)`); scaled down to a
/// multiplier-sized fraction since exact magnitudes are out of scope here.
fn fd_bonus(config: &SolveConfig) -> f64 {
    let neutrality_tiers = [
        Passive::NeutralityI,
        Passive::NeutralityII,
        Passive::NeutralityIII,
    ]
    .iter()
    .filter(|p| config.passives.contains(p))
    .count() as i32;
    neutrality_tiers.min(4) as f64 * 0.05
}

/// The §4.3 objective. `stats` should already have base/item/modifier
/// contributions summed; this function only applies the crit-weighting
/// formula.
pub fn score(stats: &Stats, config: &SolveConfig) -> f64 {
    let w_e = config.class.elemental_weight();
    let priorities = &config.priorities;

    let mut base = w_e * stats.elemental_mastery as f64;
    if priorities.melee {
        base += stats.melee_mastery as f64;
    }
    if priorities.distance {
        base += stats.distance_mastery as f64;
    }
    if priorities.heal {
        base += stats.heal_mastery as f64;
    }
    base += priorities.berserk_policy.weight(stats.berserk_mastery);
    base += priorities.rear_policy.weight(stats.rear_mastery);

    if priorities.num_mastery >= 1 {
        base += w_e * stats.one_element_mastery as f64;
    }
    if priorities.num_mastery >= 2 {
        base += w_e * stats.two_element_mastery as f64;
    }
    if priorities.num_mastery >= 3 {
        base += w_e * stats.three_element_mastery as f64;
    }

    if !priorities.elements.is_empty() {
        let n = priorities.elements.len() as f64;
        let element_vals: i32 = priorities
            .elements
            .iter()
            .map(|e| match e {
                Element::Air => stats.air_mastery,
                Element::Earth => stats.earth_mastery,
                Element::Water => stats.water_mastery,
                Element::Fire => stats.fire_mastery,
            })
            .sum();
        base += w_e * element_vals as f64 / n;
    }

    let crit_rate = clamp(stats.crit + 3, 0, 100) as f64;
    let fd_mult = (100.0 + stats.fd as f64) / 100.0 + fd_bonus(config);

    let non_crit = base * (100.0 - crit_rate) / 100.0 * fd_mult;
    let crit_bonus = if config.unraveling && stats.crit >= 40 {
        0.0
    } else {
        stats.crit_mastery as f64
    };
    let crit_score = (base + crit_bonus) * crit_rate / 100.0 * fd_mult * 1.25;

    crit_score + non_crit
}

/// Cheap, monotone-ish ranking key used by the pool builder and pair
/// enumerator to order candidates without a full `config`-dependent score.
pub fn crit_score_key(item_stats: &Stats, base: &Stats, config: &SolveConfig) -> f64 {
    let combined_crit = item_stats.crit + base.crit;
    score(item_stats, config) * (1.0 + combined_crit as f64 / 80.0)
}
