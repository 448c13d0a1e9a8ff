//! Search kernel (spec §4.7): for one relic/epic pair, walks the Cartesian
//! product of the remaining slots' candidate pools, checks the combined
//! bounds, and keeps the best 5 satisfying sets found for that pair.

use crate::attributes::{apply_wield_two_handed, satisfies, Stats};
use crate::config::SolveConfig;
use crate::items::{self, Item, ItemId, Slot};
use crate::pairs::RelicEpicPair;
use crate::pool::Pools;
use crate::scoring::{apply_post_modifiers, score};
use std::collections::HashMap;

/// A fully assembled, bound-satisfying set plus its objective score. Items
/// are sorted by id, which doubles as the tie-break key used by `topk`.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub score: f64,
    pub items: Vec<Item>,
}

const REM_SLOTS_TEMPLATE: &[Slot] = &[
    Slot::Legs,
    Slot::Back,
    Slot::Head,
    Slot::Chest,
    Slot::Shoulders,
    Slot::Belt,
    Slot::LeftHand,
    Slot::LeftHand,
    Slot::Neck,
    Slot::Accessory,
    Slot::Mount,
    Slot::Pet,
];

fn remove_one(list: &mut Vec<Slot>, slot: Slot) {
    if let Some(pos) = list.iter().position(|s| *s == slot) {
        list.remove(pos);
    }
}

fn combinations(items: &[Item], k: usize) -> Vec<Vec<Item>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    if k > items.len() {
        return Vec::new();
    }
    if k == 1 {
        return items.iter().map(|i| vec![i.clone()]).collect();
    }
    // Only ever called with k in {0, 1, 2} (LeftHand cardinality).
    let mut out = Vec::new();
    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            out.push(vec![items[i].clone(), items[j].clone()]);
        }
    }
    out
}

fn cartesian_product(groups: Vec<Vec<Vec<Item>>>) -> Vec<Vec<Item>> {
    let mut acc: Vec<Vec<Item>> = vec![Vec::new()];
    for group in groups {
        if group.is_empty() {
            return Vec::new();
        }
        let mut next = Vec::with_capacity(acc.len() * group.len());
        for combo in &acc {
            for option in &group {
                let mut c = combo.clone();
                c.extend(option.iter().cloned());
                next.push(c);
            }
        }
        acc = next;
    }
    acc
}

/// `ordered_keep_by_key` for a single-item weapon fallback pool: highest
/// score first, at most one per (ap, mp, ra, wp).
fn rank_and_keep_unique(mut items: Vec<Item>, config: &SolveConfig) -> Vec<Item> {
    items.sort_by(|a, b| {
        score(&b.stats, config)
            .partial_cmp(&score(&a.stats, config))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|i| seen.insert((i.stats.ap, i.stats.mp, i.stats.ra, i.stats.wp)))
        .collect()
}

/// Bounded top-5 insertion, keeping only sets that beat the current worst
/// of an already-full list of 5 (spec §4.7 step 6 / §4.8).
fn insert_bounded(best: &mut Vec<Candidate>, candidate: Candidate) {
    let worst_kept = if best.len() > 0 && best.len() < 3 {
        best.iter().map(|c| c.score).fold(f64::INFINITY, f64::min)
    } else {
        0.0
    };
    if candidate.score > worst_kept {
        best.push(candidate);
        best.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        best.truncate(5);
    }
}

/// Runs the search kernel for one relic/epic pair. `other_forced` excludes
/// the relic/epic themselves; `other_forced_slot_counts` is its per-slot
/// tally (shared with [`crate::pairs::enumerate_pairs`]'s validity check).
pub fn search_pair(
    pools: &Pools,
    pair: &RelicEpicPair,
    config: &SolveConfig,
    other_forced: &[&Item],
) -> Vec<Candidate> {
    let other_forced_slot_counts: HashMap<Slot, usize> = {
        let mut m = HashMap::new();
        for item in other_forced {
            *m.entry(item.slot).or_insert(0) += 1;
        }
        m
    };

    let mut rem_slots: Vec<Slot> = REM_SLOTS_TEMPLATE.to_vec();

    let pair_items = pair.items();
    let accessory_covered = pair_items.iter().any(|i| i.slot == Slot::Accessory);
    if !pools.per_slot.contains_key(&Slot::Accessory) && !accessory_covered {
        remove_one(&mut rem_slots, Slot::Accessory);
    }

    for (slot, count) in &other_forced_slot_counts {
        for _ in 0..*count {
            remove_one(&mut rem_slots, *slot);
        }
    }

    for item in &pair_items {
        let is_weapon = item.slot == Slot::FirstWeapon || item.slot == Slot::SecondWeapon;
        if !is_weapon && !rem_slots.contains(&item.slot) {
            return Vec::new();
        }
    }

    let mut main_hand_disabled = false;
    let mut off_hand_disabled = false;
    let combined: Vec<&Item> = other_forced.iter().copied().chain(pair_items.iter().copied()).collect();
    for item in &combined {
        if item.slot == Slot::FirstWeapon {
            main_hand_disabled = true;
            if item.disables_second_weapon {
                off_hand_disabled = true;
            }
        } else if item.slot == Slot::SecondWeapon {
            off_hand_disabled = true;
        } else if item.rarity.is_epic() || item.rarity.is_relic() {
            remove_one(&mut rem_slots, item.slot);
        }
    }

    let mut weapons: Vec<Vec<Item>> = Vec::new();
    let weapons_remaining = !(main_hand_disabled && off_hand_disabled);
    if weapons_remaining {
        if main_hand_disabled {
            let off_hand_only: Vec<Item> = rank_and_keep_unique(pools.off_hands.clone(), config);
            weapons = off_hand_only.into_iter().map(|i| vec![i]).collect();
        } else if off_hand_disabled {
            let main_hand_only: Vec<Item> = rank_and_keep_unique(pools.one_handers.clone(), config);
            weapons = main_hand_only.into_iter().map(|i| vec![i]).collect();
        } else {
            weapons = pools.weapon_candidates.iter().map(|w| w.items.clone()).collect();
        }
    }

    let left_hand_k = rem_slots.iter().filter(|s| **s == Slot::LeftHand).count();
    let left_hand_pool = pools.per_slot.get(&Slot::LeftHand).cloned().unwrap_or_default();
    let ring_pairs = combinations(&left_hand_pool, left_hand_k);
    if left_hand_k > 0 && ring_pairs.is_empty() {
        return Vec::new();
    }

    let mut groups: Vec<Vec<Vec<Item>>> = vec![ring_pairs];
    for slot in &rem_slots {
        if *slot == Slot::LeftHand {
            continue;
        }
        match pools.per_slot.get(slot) {
            Some(candidates) => groups.push(candidates.iter().map(|i| vec![i.clone()]).collect()),
            None => return Vec::new(),
        }
    }
    if weapons_remaining {
        groups.push(weapons);
    }

    let re_stats = pair.stats();
    let base_with_pair = config.base_stats + re_stats;

    let mut re_mins = config.set_minimums;
    let mut re_maxs = config.set_maximums;
    for item in &pair_items {
        if let Some((mins, maxs)) = items::get_conditions(item.item_id) {
            re_mins = re_mins & mins;
            re_maxs = re_maxs & maxs;
        }
    }

    let mut best: Vec<Candidate> = Vec::new();

    for combo in cartesian_product(groups) {
        let mut all_items: Vec<Item> = other_forced.iter().map(|i| (*i).clone()).collect();
        all_items.extend(combo);

        let mut statline = base_with_pair;
        for item in &all_items {
            statline = statline + item.stats;
        }

        let disables_second = all_items.iter().any(|i| i.disables_second_weapon) || pair_items.iter().any(|i| i.disables_second_weapon);
        if config.two_handed && disables_second {
            statline = apply_wield_two_handed(statline);
        }

        if statline.crit < -10 {
            continue;
        }

        let mut mns = re_mins;
        let mut mxs = re_maxs;
        for item in &all_items {
            if let Some((mins, maxs)) = items::get_conditions(item.item_id) {
                mns = mns & mins;
                mxs = mxs & maxs;
            }
        }

        if !satisfies(&mns, &statline, &mxs) {
            continue;
        }

        let scoring_stats = apply_post_modifiers(statline, config);
        let total_score = score(&scoring_stats, config);

        let mut finished: Vec<Item> = all_items;
        finished.extend(pair_items.iter().map(|i| (*i).clone()));
        finished.sort_by_key(|i| i.item_id.0);

        insert_bounded(&mut best, Candidate { score: total_score, items: finished });
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassId;
    use crate::items::Rarity;

    fn item(id: i32, slot: Slot, stats: Stats) -> Item {
        Item {
            item_id: ItemId(id),
            name: format!("item-{id}"),
            slot,
            level: 200,
            rarity: Rarity::Common,
            type_id: 0,
            disables_second_weapon: false,
            is_shield: false,
            stats,
        }
    }

    fn empty_pools() -> Pools {
        Pools::default()
    }

    #[test]
    fn returns_empty_when_relic_slot_not_in_remaining_slots() {
        let cfg = SolveConfig::new(200, ClassId::Iop);
        let mut pools = empty_pools();
        pools.per_slot.insert(Slot::Head, vec![]);
        let relic = item(1, Slot::Head, Stats::default());
        let other_forced = item(2, Slot::Head, Stats::default());
        let pair = RelicEpicPair {
            relic: Some(relic),
            epic: None,
        };
        let result = search_pair(&pools, &pair, &cfg, &[&other_forced]);
        assert!(result.is_empty());
    }

    #[test]
    fn global_crit_floor_rejects_statline_below_negative_ten() {
        let cfg = SolveConfig::new(200, ClassId::Iop);
        let mut pools = empty_pools();
        let mut next_id = 100;
        for slot in [Slot::Legs, Slot::Back, Slot::Head, Slot::Chest, Slot::Shoulders, Slot::Belt, Slot::Neck, Slot::Mount, Slot::Pet] {
            pools.per_slot.insert(slot, vec![item(next_id, slot, Stats::default())]);
            next_id += 1;
        }
        pools.per_slot.insert(
            Slot::LeftHand,
            vec![item(10, Slot::LeftHand, Stats::default()), item(11, Slot::LeftHand, Stats::default())],
        );
        pools.off_hands = vec![item(20, Slot::SecondWeapon, Stats::default())];
        let relic = item(1, Slot::FirstWeapon, Stats { crit: -50, ..Default::default() });
        let pair = RelicEpicPair {
            relic: Some(relic),
            epic: None,
        };
        let result = search_pair(&pools, &pair, &cfg, &[]);
        assert!(result.is_empty());
    }

    #[test]
    fn items_in_result_are_sorted_by_id() {
        let cfg = SolveConfig::new(200, ClassId::Iop);
        let mut pools = empty_pools();
        for slot in [Slot::Legs, Slot::Back, Slot::Head, Slot::Chest, Slot::Shoulders, Slot::Belt, Slot::Neck, Slot::Mount, Slot::Pet] {
            pools.per_slot.insert(slot, vec![item(100, slot, Stats::default())]);
        }
        pools.per_slot.insert(
            Slot::LeftHand,
            vec![item(10, Slot::LeftHand, Stats::default()), item(11, Slot::LeftHand, Stats::default())],
        );
        let relic = item(5, Slot::FirstWeapon, Stats { elemental_mastery: 100, ..Default::default() });
        let epic = item(3, Slot::SecondWeapon, Stats::default());
        let pair = RelicEpicPair {
            relic: Some(relic),
            epic: Some(epic),
        };
        let result = search_pair(&pools, &pair, &cfg, &[]);
        assert!(!result.is_empty());
        let ids: Vec<i32> = result[0].items.iter().map(|i| i.item_id.0).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    /// With neither hand disabled, the loadout search must come from
    /// `pools.weapon_candidates` rather than re-deriving one/two-hander
    /// combos directly, so a two-hander excluded from `weapon_candidates`
    /// by `skip_shields` (the default) never appears in a returned set.
    #[test]
    fn two_hander_never_wins_when_weapon_candidates_excludes_it() {
        let cfg = SolveConfig::new(200, ClassId::Iop);
        let mut pools = empty_pools();
        for slot in [Slot::Legs, Slot::Back, Slot::Head, Slot::Chest, Slot::Shoulders, Slot::Belt, Slot::Neck, Slot::Mount, Slot::Pet] {
            pools.per_slot.insert(slot, vec![item(100 + slot as i32, slot, Stats::default())]);
        }
        pools.per_slot.insert(
            Slot::LeftHand,
            vec![item(10, Slot::LeftHand, Stats::default()), item(11, Slot::LeftHand, Stats::default())],
        );
        let mut two_hander = item(30, Slot::FirstWeapon, Stats { elemental_mastery: 10_000, ..Default::default() });
        two_hander.disables_second_weapon = true;
        pools.two_handers = vec![two_hander];
        let one_hander = item(31, Slot::FirstWeapon, Stats::default());
        pools.one_handers = vec![one_hander.clone()];
        let off_hand = item(32, Slot::SecondWeapon, Stats::default());
        pools.off_hands = vec![off_hand.clone()];
        pools.weapon_candidates = vec![crate::pool::WeaponLoadout {
            items: vec![one_hander, off_hand],
        }];

        let relic = item(1, Slot::Head, Stats::default());
        let pair = RelicEpicPair {
            relic: Some(relic),
            epic: None,
        };
        let result = search_pair(&pools, &pair, &cfg, &[]);
        assert!(!result.is_empty());
        for candidate in &result {
            assert!(!candidate.items.iter().any(|i| i.item_id == ItemId(30)));
        }
    }
}
