//! Relic/epic pair enumerator (spec §4.6): the cross product of candidate
//! relics and epics, reconciled against forced items and the four
//! nation (sword, ring) couplings, ranked and deduped before the search
//! kernel ever sees them.

use crate::attributes::Stats;
use crate::catalog::Catalog;
use crate::config::SolveConfig;
use crate::items::{Item, ItemId, Slot};
use crate::pool::{Pools, NATION_PAIR_IDS};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct RelicEpicPair {
    pub relic: Option<Item>,
    pub epic: Option<Item>,
}

impl RelicEpicPair {
    pub fn stats(&self) -> Stats {
        let mut s = Stats::default();
        if let Some(r) = &self.relic {
            s = s + r.stats;
        }
        if let Some(e) = &self.epic {
            s = s + e.stats;
        }
        s
    }

    pub fn disables_second_weapon(&self) -> bool {
        self.relic.as_ref().is_some_and(|i| i.disables_second_weapon)
            || self.epic.as_ref().is_some_and(|i| i.disables_second_weapon)
    }

    pub fn items(&self) -> Vec<&Item> {
        [&self.relic, &self.epic].into_iter().flatten().collect()
    }

    fn dedupe_key(&self) -> (String, bool, i32, i32, i32, i32) {
        let mut positions: Vec<&str> = self.items().iter().map(|i| slot_name(i.slot)).collect();
        positions.sort_unstable();
        let s = self.stats();
        (positions.join("-"), self.disables_second_weapon(), s.ap, s.mp, s.ra, s.wp)
    }
}

fn slot_name(slot: Slot) -> &'static str {
    match slot {
        Slot::FirstWeapon => "FIRST_WEAPON",
        Slot::SecondWeapon => "SECOND_WEAPON",
        Slot::Head => "HEAD",
        Slot::Chest => "CHEST",
        Slot::Legs => "LEGS",
        Slot::Belt => "BELT",
        Slot::Back => "BACK",
        Slot::Shoulders => "SHOULDERS",
        Slot::Neck => "NECK",
        Slot::LeftHand => "LEFT_HAND",
        Slot::Accessory => "ACCESSORY",
        Slot::Mount => "MOUNT",
        Slot::Pet => "PET",
        Slot::Costume => "COSTUME",
    }
}

/// Sample mean/stdev, or `None` when there aren't enough samples (or the
/// samples have zero spread) to normalize against.
fn distribution(samples: &[f64]) -> Option<(f64, f64)> {
    if samples.len() < 2 {
        return None;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (samples.len() as f64 - 1.0);
    let std = variance.sqrt();
    if std == 0.0 {
        None
    } else {
        Some((mean, std))
    }
}

/// `(unknown_penalty, z_score_sum, raw_score_sum)`, ranked descending:
/// known (penalty 0) beats unknown (penalty -1), then higher combined
/// z-score, then higher raw `crit_score_key` sum.
fn rank_key(pair: &RelicEpicPair, pools: &Pools, config: &SolveConfig) -> (i32, f64, f64) {
    let mut unknown = 0;
    let mut z_sum = 0.0;
    let mut raw_sum = 0.0;
    for item in pair.items() {
        let key = crate::scoring::crit_score_key(&item.stats, &config.base_stats, config);
        raw_sum += key;
        let samples = pools.slot_score_samples.get(&item.slot);
        match samples.and_then(|s| distribution(s)) {
            Some((mean, std)) => z_sum += (key - mean) / std,
            None => unknown = -1,
        }
    }
    (unknown, z_sum, raw_sum)
}

fn cmp_desc(a: &(i32, f64, f64), b: &(i32, f64, f64)) -> std::cmp::Ordering {
    b.0.cmp(&a.0)
        .then_with(|| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal))
        .then_with(|| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal))
}

/// Whether forced occupancy leaves room for `pair` (spec §4.6: same-slot
/// relic+epic only valid in `LeftHand`, and any non-relic/epic forced item
/// in that slot eats into the shared cardinality).
fn valid(
    pair: &RelicEpicPair,
    forced_slot_counts: &HashMap<Slot, usize>,
    forced_relic: Option<&Item>,
    forced_epic: Option<&Item>,
) -> bool {
    match (&pair.relic, &pair.epic) {
        (Some(relic), Some(epic)) if relic.slot == epic.slot => {
            if relic.slot != Slot::LeftHand {
                return false;
            }
            let mut k = 0;
            if Some(relic.item_id) != forced_relic.map(|i| i.item_id) {
                k += 1;
            }
            if Some(epic.item_id) != forced_epic.map(|i| i.item_id) {
                k += 1;
            }
            let occupied = forced_slot_counts.get(&Slot::LeftHand).copied().unwrap_or(0);
            2 - occupied as i32 >= k
        }
        _ => {
            for item in pair.items() {
                let is_forced_re = Some(item.item_id) == forced_relic.map(|i| i.item_id)
                    || Some(item.item_id) == forced_epic.map(|i| i.item_id);
                if is_forced_re {
                    continue;
                }
                let slot_max = if item.slot == Slot::LeftHand { 1 } else { 0 };
                if forced_slot_counts.get(&item.slot).copied().unwrap_or(0) as i32 > slot_max {
                    return false;
                }
            }
            true
        }
    }
}

/// Nation sword/ring couplings found in `catalog`, valid only when neither
/// a relic nor an epic is already forced and the level window reaches 200
/// (spec §3 invariants, §4.6).
fn nation_pairs(catalog: &dyn Catalog, config: &SolveConfig, forced_relic: Option<&Item>, forced_epic: Option<&Item>) -> Vec<RelicEpicPair> {
    if forced_relic.is_some() || forced_epic.is_some() {
        return Vec::new();
    }
    if !(config.low_bound() <= 200 && config.level >= 200) {
        return Vec::new();
    }
    let mut out = Vec::new();
    for (sword_id, ring_id) in NATION_PAIR_IDS {
        let sword = catalog.find(ItemId(sword_id));
        let ring = catalog.find(ItemId(ring_id));
        if let (Some(sword), Some(ring)) = (sword, ring) {
            if config.forbidden_item_ids.contains(&sword.item_id) || config.forbidden_item_ids.contains(&ring.item_id) {
                continue;
            }
            out.push(RelicEpicPair {
                relic: Some(sword.clone()),
                epic: Some(ring.clone()),
            });
        }
    }
    out
}

/// Builds, ranks, dedupes, and (unless exhaustive) truncates the
/// relic/epic pair list handed to the search kernel.
pub fn enumerate_pairs(
    pools: &Pools,
    config: &SolveConfig,
    catalog: &dyn Catalog,
    forced_relic: Option<&Item>,
    forced_epic: Option<&Item>,
    other_forced_slot_counts: &HashMap<Slot, usize>,
) -> Vec<RelicEpicPair> {
    let relics: Vec<Option<Item>> = if pools.relics.is_empty() {
        vec![None]
    } else {
        pools.relics.iter().cloned().map(Some).collect()
    };
    let epics: Vec<Option<Item>> = if pools.epics.is_empty() {
        vec![None]
    } else {
        pools.epics.iter().cloned().map(Some).collect()
    };

    let mut candidates: Vec<RelicEpicPair> = Vec::new();
    for relic in &relics {
        for epic in &epics {
            candidates.push(RelicEpicPair {
                relic: relic.clone(),
                epic: epic.clone(),
            });
        }
    }
    candidates.extend(nation_pairs(catalog, config, forced_relic, forced_epic));

    candidates.retain(|p| valid(p, other_forced_slot_counts, forced_relic, forced_epic));

    // Reject pairs whose relic/epic would collide on the weapon slots in
    // a way that isn't just "same slot, both LeftHand".
    candidates.retain(|p| match (&p.relic, &p.epic) {
        (Some(relic), Some(epic)) => {
            if relic.slot == epic.slot && relic.slot != Slot::LeftHand {
                return false;
            }
            if relic.disables_second_weapon && epic.slot == Slot::SecondWeapon {
                return false;
            }
            if epic.disables_second_weapon && relic.slot == Slot::SecondWeapon {
                return false;
            }
            true
        }
        _ => true,
    });

    candidates.sort_by(|a, b| cmp_desc(&rank_key(a, pools, config), &rank_key(b, pools, config)));

    let mut seen: HashMap<(String, bool, i32, i32, i32, i32), ()> = HashMap::new();
    let mut deduped = Vec::with_capacity(candidates.len());
    for pair in candidates {
        if seen.insert(pair.dedupe_key(), ()).is_none() {
            deduped.push(pair);
        }
    }

    if !config.exhaustive {
        deduped.truncate(config.hard_cap_depth);
    }
    deduped
}
