//! Feasibility analyzer: proves the requested stat floors are reachable
//! before the pool builder and search kernel do any real work.
//!
//! Two proofs run in sequence (AP+MP, then per-stat); either one failing
//! raises `SolveError::Infeasible`. A third check rejects forced/included
//! items whose condition table entry already violates the configured
//! minimums (`ImpossibleStat`, folded into the same error kind).

use crate::catalog::Catalog;
use crate::config::{SolveConfig, SolveError};
use crate::items::{self, Item, ItemId, Slot};
use std::collections::HashSet;

/// Per-slot earliest level at which a non-relic/non-epic item in that slot
/// is known to carry at least one point of AP or MP (spec §4.4 table).
const AP_MP_UNLOCK: &[(Slot, u16)] = &[
    (Slot::Neck, 20),
    (Slot::Back, 20),
    (Slot::FirstWeapon, 50),
    (Slot::Chest, 50),
    (Slot::Legs, 50),
];
const HEAD_MP_UNLOCK: u16 = 230;

/// Proves the combined `ap + mp` floor is reachable. Returns the item id of
/// the level-200 first-weapon relic to auto-force, if forcing it is the
/// only way to close a one-point gap.
pub fn analyze_ap_mp_reachability(
    config: &SolveConfig,
    catalog: &dyn Catalog,
    forced: &[&Item],
) -> Result<Option<ItemId>, SolveError> {
    let forced_ap_mp: i32 = forced.iter().map(|it| it.stats.ap + it.stats.mp).sum();
    let needed =
        (config.set_minimums.ap + config.set_minimums.mp) - (config.base_stats.ap + config.base_stats.mp) - forced_ap_mp;
    if needed <= 0 {
        return Ok(None);
    }

    let forced_slots: HashSet<Slot> = forced.iter().map(|it| it.slot).collect();

    let mut found = 0i32;
    for (slot, unlock_level) in AP_MP_UNLOCK {
        if !forced_slots.contains(slot) && config.level >= *unlock_level {
            found += 1;
        }
    }
    if !forced_slots.contains(&Slot::Head) && config.level >= HEAD_MP_UNLOCK {
        found += 1;
    }

    let epic_forced = forced.iter().any(|it| it.rarity.is_epic());
    if config.allowed_rarities.contains(&7) && !epic_forced {
        found += 1;
    }

    let relic_forced = forced.iter().any(|it| it.rarity.is_relic());
    let relic_available = config.allowed_rarities.contains(&5) && !relic_forced && config.level >= 50;
    if relic_available {
        found += 1;
    }

    if found >= needed {
        return Ok(None);
    }

    let level_200_relic = catalog
        .items()
        .iter()
        .find(|it| it.slot == Slot::FirstWeapon && it.rarity.is_relic() && it.level == 200);

    if let (Some(relic_item), true) = (level_200_relic, relic_available) {
        if found + 1 >= needed {
            return Ok(Some(relic_item.item_id));
        }
    }

    Err(SolveError::Infeasible(format!(
        "ap+mp reachability: needed {needed}, found {found}"
    )))
}

/// Shared `(needed, found)` pair underlying [`analyze_ap_mp_reachability`],
/// reused by the pool builder to decide whether AP+MP is "tight" (spec
/// §4.5 step 1: every non-relic/epic item must then contribute to the
/// floor, not just the relic/epic auto-force path).
pub fn ap_mp_found_needed(config: &SolveConfig, forced: &[&Item]) -> (i32, i32) {
    let forced_ap_mp: i32 = forced.iter().map(|it| it.stats.ap + it.stats.mp).sum();
    let needed =
        (config.set_minimums.ap + config.set_minimums.mp) - (config.base_stats.ap + config.base_stats.mp) - forced_ap_mp;

    let forced_slots: HashSet<Slot> = forced.iter().map(|it| it.slot).collect();
    let mut found = 0i32;
    for (slot, unlock_level) in AP_MP_UNLOCK {
        if !forced_slots.contains(slot) && config.level >= *unlock_level {
            found += 1;
        }
    }
    if !forced_slots.contains(&Slot::Head) && config.level >= HEAD_MP_UNLOCK {
        found += 1;
    }

    let epic_forced = forced.iter().any(|it| it.rarity.is_epic());
    if config.allowed_rarities.contains(&7) && !epic_forced {
        found += 1;
    }
    let relic_forced = forced.iter().any(|it| it.rarity.is_relic());
    if config.allowed_rarities.contains(&5) && !relic_forced && config.level >= 50 {
        found += 1;
    }
    (needed, found)
}

/// True when AP+MP has no slack: every findable point is needed to clear
/// the floor, so the pool builder must not discard items that contribute
/// nothing to it.
pub fn is_ap_mp_tight(config: &SolveConfig, forced: &[&Item]) -> bool {
    let (needed, found) = ap_mp_found_needed(config, forced);
    needed > 0 && found <= needed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedStat {
    Ap,
    Mp,
    Ra,
    Wp,
}

impl TrackedStat {
    fn name(&self) -> &'static str {
        match self {
            TrackedStat::Ap => "ap",
            TrackedStat::Mp => "mp",
            TrackedStat::Ra => "ra",
            TrackedStat::Wp => "wp",
        }
    }

    fn of_stats(&self, stats: &crate::attributes::Stats) -> i32 {
        match self {
            TrackedStat::Ap => stats.ap,
            TrackedStat::Mp => stats.mp,
            TrackedStat::Ra => stats.ra,
            TrackedStat::Wp => stats.wp,
        }
    }

    fn of_mins(&self, mins: &crate::attributes::SetMinimums) -> i32 {
        match self {
            TrackedStat::Ap => mins.ap,
            TrackedStat::Mp => mins.mp,
            TrackedStat::Ra => mins.ra,
            TrackedStat::Wp => mins.wp,
        }
    }
}

/// Proves a single tracked stat's floor is reachable, using the same
/// per-slot unlock table as the AP+MP proof (the original keeps one table
/// per stat; we share one here since the catalog-level unlock levels for
/// ra/wp are catalog content out of scope for this crate).
pub fn analyze_stat_reachability(
    stat: TrackedStat,
    config: &SolveConfig,
    catalog: &dyn Catalog,
    forced: &[&Item],
) -> Result<(), SolveError> {
    let forced_contribution: i32 = forced.iter().map(|it| stat.of_stats(&it.stats)).sum();
    let needed = stat.of_mins(&config.set_minimums) - stat.of_stats(&config.base_stats) - forced_contribution;
    if needed <= 0 {
        return Ok(());
    }

    let forced_slots: HashSet<Slot> = forced.iter().map(|it| it.slot).collect();
    let mut found = 0i32;
    for (slot, unlock_level) in AP_MP_UNLOCK {
        if !forced_slots.contains(slot) && config.level >= *unlock_level {
            found += 1;
        }
    }

    let epic_forced = forced.iter().any(|it| it.rarity.is_epic());
    if config.allowed_rarities.contains(&7) && !epic_forced {
        found += 1;
    }
    let relic_forced = forced.iter().any(|it| it.rarity.is_relic());
    if config.allowed_rarities.contains(&5) && !relic_forced && config.level >= 50 {
        found += 1;
    }

    if found < needed {
        return Err(SolveError::Infeasible(format!(
            "{} reachability: needed {needed}, found {found}",
            stat.name()
        )));
    }
    let _ = catalog;
    Ok(())
}

/// Rejects a set of forced items that could never coexist: a forced
/// two-hander (or anything else with `disables_second_weapon`) alongside a
/// forced item in `SecondWeapon` (spec §3 invariants, scenario 5).
pub fn check_forced_weapon_conflict(forced: &[&Item]) -> Result<(), SolveError> {
    let two_hander_forced = forced.iter().any(|it| it.disables_second_weapon);
    let second_weapon_forced = forced.iter().any(|it| it.slot == Slot::SecondWeapon);
    if two_hander_forced && second_weapon_forced {
        return Err(SolveError::Infeasible(
            "forced two-handed weapon disables second_weapon, which is also forced".into(),
        ));
    }
    Ok(())
}

/// Rejects a forced/included item whose condition maxs are already
/// tighter than the configured minimums in some field (`ImpossibleStat`).
pub fn check_item_condition_conflicts(config: &SolveConfig, items_to_check: &[&Item]) -> Result<(), SolveError> {
    for item in items_to_check {
        if let Some((_, maxs)) = items::get_conditions(item.item_id) {
            if !crate::attributes::satisfies(&config.set_minimums, &mins_as_stats(&config.set_minimums), &maxs) {
                return Err(SolveError::Infeasible(format!(
                    "item {:?} condition conflicts with configured minimums",
                    item.item_id
                )));
            }
        }
    }
    Ok(())
}

fn mins_as_stats(mins: &crate::attributes::SetMinimums) -> crate::attributes::Stats {
    crate::attributes::Stats {
        ap: mins.ap,
        mp: mins.mp,
        wp: mins.wp,
        ra: mins.ra,
        crit: mins.crit,
        crit_mastery: mins.crit_mastery,
        elemental_mastery: mins.elemental_mastery,
        one_element_mastery: mins.one_element_mastery,
        two_element_mastery: mins.two_element_mastery,
        three_element_mastery: mins.three_element_mastery,
        distance_mastery: mins.distance_mastery,
        rear_mastery: mins.rear_mastery,
        heal_mastery: mins.heal_mastery,
        berserk_mastery: mins.berserk_mastery,
        melee_mastery: mins.melee_mastery,
        fire_mastery: mins.fire_mastery,
        earth_mastery: mins.earth_mastery,
        water_mastery: mins.water_mastery,
        air_mastery: mins.air_mastery,
        control: mins.control,
        block: mins.block,
        fd: mins.fd,
        heals_performed: mins.heals_performed,
        lock: mins.lock,
        dodge: mins.dodge,
    }
}
