//! Pool builder: turns the raw catalog into per-slot candidate lists,
//! assembled weapon loadouts, and relic/epic candidate pools (spec §4.5).
//!
//! Everything here is a pure function of `(catalog, tags, config, forced)`;
//! the resulting [`Pools`] is handed unmodified to the pair enumerator and
//! search kernel.

use crate::attributes::Stats;
use crate::catalog::{Catalog, SourceTags};
use crate::config::{ClassId, Passive, SolveConfig};
use crate::feasibility::is_ap_mp_tight;
use crate::items::{self, Item, ItemId, Slot};
use crate::scoring::crit_score_key;
use std::collections::{HashMap, HashSet};

/// One fully-assembled weapon loadout: a two-hander alone, or a one-hander
/// paired with a dagger/shield.
#[derive(Debug, Clone)]
pub struct WeaponLoadout {
    pub items: Vec<Item>,
}

impl WeaponLoadout {
    pub fn stats(&self) -> Stats {
        self.items.iter().map(|i| i.stats).sum()
    }

    pub fn disables_second_weapon(&self) -> bool {
        self.items.iter().any(|i| i.disables_second_weapon)
    }

    fn score(&self, config: &SolveConfig) -> f64 {
        self.items
            .iter()
            .map(|i| crate::scoring::score(&i.stats, config))
            .sum()
    }

    /// Composite dedup key: whether it's a pair, then the combined
    /// always-simmed attributes (ap/mp/ra/wp).
    fn dedupe_key(&self) -> (bool, i32, i32, i32, i32) {
        let s = self.stats();
        (self.items.len() > 1, s.ap, s.mp, s.ra, s.wp)
    }
}

pub const SYNTHETIC_DAGGER_NAME: &str = "Light Weapon Expert Dagger";

#[derive(Debug, Clone, Default)]
pub struct Pools {
    /// Every selectable slot except `FirstWeapon`/`SecondWeapon`, which are
    /// folded into `weapon_candidates` instead.
    pub per_slot: HashMap<Slot, Vec<Item>>,
    pub weapon_candidates: Vec<WeaponLoadout>,
    /// One-handed first-weapon candidates, ranked and deduped. Kept
    /// alongside `weapon_candidates` for the main-hand/off-hand-disabled
    /// fallback paths in the search kernel (spec §4.7).
    pub one_handers: Vec<Item>,
    pub two_handers: Vec<Item>,
    pub off_hands: Vec<Item>,
    pub relics: Vec<Item>,
    pub epics: Vec<Item>,
    /// `crit_score_key` samples per slot, used by the pair enumerator to
    /// z-score normalize a relic/epic item against "what's normal" for its
    /// slot (spec §4.6). `FirstWeapon` samples combine one-handers and
    /// two-handers; `SecondWeapon` combines daggers and shields.
    pub slot_score_samples: HashMap<Slot, Vec<f64>>,
}

/// Per-slot earliest level at which a common item contributes to ap+mp
/// (shared with [`crate::feasibility`]'s reachability table).
const COMMON_AP_MP_SLOTS: &[(Slot, u16)] = &[
    (Slot::Neck, 20),
    (Slot::Back, 20),
    (Slot::FirstWeapon, 50),
    (Slot::Chest, 50),
    (Slot::Legs, 50),
];

/// Three hard-coded relics/epics the original keeps usable past their
/// nominal level window (Gelano, Bagus Shushu, Mopy King Gloves).
fn level_override(item_id: ItemId, level: u16) -> Option<bool> {
    match item_id.0 {
        9723 => Some((65..=140).contains(&level)),
        27281 => Some((125..=185).contains(&level)),
        27814 => Some((215..=230).contains(&level)),
        _ => None,
    }
}

fn level_window_ok(item: &Item, config: &SolveConfig) -> bool {
    if item.slot.rarity_exempt() {
        return true;
    }
    if let Some(ok) = level_override(item.item_id, config.level) {
        return ok;
    }
    item.level <= config.level && item.level >= config.low_bound()
}

/// Whether `item` contributes "enough" ap+mp to count as a common major
/// item, per the original's `missing_common_major`.
fn missing_common_major(item: &Item, config: &SolveConfig) -> bool {
    let mut required = 0;
    if item.rarity.is_relic() || item.rarity.is_epic() {
        required += 1;
    }
    if let Some((_, unlock)) = COMMON_AP_MP_SLOTS.iter().find(|(slot, _)| *slot == item.slot) {
        if *unlock <= config.level {
            required += 1;
        }
    }
    item.stats.ap + item.stats.mp < required
}

/// Whether the item's condition maxs are already tighter than the
/// configured minimums in some field (would make it unusable regardless
/// of anything else).
fn condition_conflicts_requested_stats(item: &Item, config: &SolveConfig) -> bool {
    match items::get_conditions(item.item_id) {
        Some((_, maxs)) => {
            maxs.ap < config.set_minimums.ap
                || maxs.mp < config.set_minimums.mp
                || maxs.wp < config.set_minimums.wp
                || maxs.ra < config.set_minimums.ra
                || maxs.crit < config.set_minimums.crit
                || maxs.crit_mastery < config.set_minimums.crit_mastery
                || maxs.elemental_mastery < config.set_minimums.elemental_mastery
                || maxs.block < config.set_minimums.block
                || maxs.lock < config.set_minimums.lock
                || maxs.dodge < config.set_minimums.dodge
                || maxs.distance_mastery < config.set_minimums.distance_mastery
        }
        None => false,
    }
}

fn initial_filter(item: &Item, config: &SolveConfig, tags: &SourceTags, ap_mp_tight: bool) -> bool {
    if config.forbidden_item_ids.contains(&item.item_id) {
        return false;
    }
    if config.forbidden_names.contains(&item.name) {
        return false;
    }
    if tags.is_implicitly_forbidden(item.item_id, &config.forced_item_ids) {
        return false;
    }
    if let Some((mins, maxs)) = items::get_conditions(item.item_id) {
        if mins.unhandled() || maxs.unhandled() {
            return false;
        }
    }
    if !item.slot.rarity_exempt() && !config.allowed_rarities.contains(&item.rarity.code()) {
        return false;
    }
    if condition_conflicts_requested_stats(item, config) {
        return false;
    }
    if ap_mp_tight && !item.rarity.is_relic() && !item.rarity.is_epic() && missing_common_major(item, config) {
        return false;
    }
    true
}

/// Sim-key fields: which attributes must match for two items to be
/// considered interchangeable by the constraint checker and objective
/// (spec §4.5 step 4). Config-dependent fields are appended only when
/// they're actually decisive.
fn sim_key(item: &Item, config: &SolveConfig) -> Vec<i32> {
    let s = &item.stats;
    let mut key = vec![item.disables_second_weapon as i32, s.ap, s.mp, s.ra, s.wp];
    if config.unraveling || config.class == ClassId::Ecaflip {
        key.push(s.crit);
    }
    if config.unraveling {
        key.push(s.crit_mastery);
    }
    if config.passives.contains(&Passive::Bravery) {
        key.push(s.block);
    }
    key
}

/// Keeps at most `k` items per sim-key, preserving order (so callers
/// should sort by descending rank first).
fn dedupe_keep_by_key<T, K: std::hash::Hash + Eq>(items: Vec<T>, key: impl Fn(&T) -> K, k: usize) -> Vec<T> {
    let mut seen: HashMap<K, usize> = HashMap::new();
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let k_val = key(&item);
        let count = seen.entry(k_val).or_insert(0);
        if *count < k {
            *count += 1;
            out.push(item);
        }
    }
    out
}

fn cardinality(slot: Slot) -> usize {
    if slot == Slot::LeftHand {
        2
    } else {
        1
    }
}

/// Diversity augmentation (spec §4.5 step 5): after trimming to
/// `search_depth + k`, make sure at least `k` items covering each of
/// ap/mp/ra/wp at thresholds {0, 1, 2} survive, pulling back from the
/// full ranked backup list. Capped at 3 passes (spec §9 open question).
fn augment_for_diversity(kept: &mut Vec<Item>, backup: &[Item], k: usize, config: &SolveConfig) {
    const MAX_PASSES: usize = 3;
    let getters: [fn(&Stats) -> i32; 4] = [|s| s.ap, |s| s.mp, |s| s.ra, |s| s.wp];

    for _ in 0..MAX_PASSES {
        let mut added = false;
        for getter in &getters {
            for threshold in [0, 1, 2] {
                let have = kept.iter().filter(|i| getter(&i.stats) >= threshold).count();
                if have >= k {
                    continue;
                }
                let mut need = k - have;
                for candidate in backup {
                    if need == 0 {
                        break;
                    }
                    if getter(&candidate.stats) < threshold {
                        continue;
                    }
                    if kept.iter().any(|i| i.item_id == candidate.item_id) {
                        continue;
                    }
                    kept.push(candidate.clone());
                    need -= 1;
                    added = true;
                }
            }
        }
        if !added {
            break;
        }
    }

    if kept.iter().all(|i| missing_common_major(i, config)) {
        if let Some(item) = backup.iter().find(|i| !missing_common_major(i, config)) {
            kept.push(item.clone());
        }
    }
}

/// Rank (desc `crit_score_key`), sim-key dedupe, then (unless exhaustive)
/// trim to `search_depth + k` with diversity augmentation.
fn rank_and_trim(mut items: Vec<Item>, slot: Slot, config: &SolveConfig) -> Vec<Item> {
    let k = cardinality(slot);
    items.sort_by(|a, b| {
        crit_score_key(&b.stats, &config.base_stats, config)
            .partial_cmp(&crit_score_key(&a.stats, &config.base_stats, config))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let backup = dedupe_keep_by_key(items.clone(), |i| sim_key(i, config), k);

    if config.exhaustive {
        return backup;
    }

    let mut kept: Vec<Item> = backup.iter().take(config.search_depth + k).cloned().collect();
    augment_for_diversity(&mut kept, &backup, k, config);

    kept.sort_by(|a, b| {
        crit_score_key(&b.stats, &config.base_stats, config)
            .partial_cmp(&crit_score_key(&a.stats, &config.base_stats, config))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    dedupe_keep_by_key(kept, |i| sim_key(i, config), k)
}

fn synthetic_light_weapon_expert(config: &SolveConfig) -> Item {
    Item {
        item_id: items::SYNTHETIC_LIGHT_WEAPON_EXPERT_DAGGER,
        name: SYNTHETIC_DAGGER_NAME.to_string(),
        slot: Slot::SecondWeapon,
        level: config.level,
        rarity: crate::items::Rarity::Common,
        type_id: 0,
        disables_second_weapon: false,
        is_shield: false,
        stats: Stats {
            elemental_mastery: (config.level as f64 * 1.5) as i32,
            ..Stats::default()
        },
    }
}

/// Builds the relic or epic candidate pool for one rarity tier, honoring
/// a forced item of that tier if present.
fn build_relic_epic_pool(
    catalog: &dyn Catalog,
    config: &SolveConfig,
    tags: &SourceTags,
    ap_mp_tight: bool,
    forced_of_tier: Option<&Item>,
    want_relic: bool,
    nation_ids: &HashSet<i32>,
) -> Vec<Item> {
    if let Some(item) = forced_of_tier {
        return vec![item.clone()];
    }
    let mut pool: Vec<Item> = catalog
        .items()
        .iter()
        .filter(|i| if want_relic { i.rarity.is_relic() } else { i.rarity.is_epic() })
        .filter(|i| !nation_ids.contains(&i.item_id.0))
        .filter(|i| initial_filter(i, config, tags, ap_mp_tight))
        .filter(|i| level_window_ok(i, config))
        .cloned()
        .collect();
    pool.sort_by(|a, b| {
        crit_score_key(&b.stats, &config.base_stats, config)
            .partial_cmp(&crit_score_key(&a.stats, &config.base_stats, config))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    dedupe_keep_by_key(pool, |i| (i.slot, sim_key(i, config)), 1)
}

/// The four (sword, ring) nation pair item ids (spec §3 invariants).
pub const NATION_PAIR_IDS: [(i32, i32); 4] = [
    (26494, 26575),
    (26495, 26576),
    (26496, 26577),
    (26497, 26578),
];

pub fn build_pools(
    catalog: &dyn Catalog,
    tags: &SourceTags,
    config: &SolveConfig,
    forced: &[&Item],
) -> Pools {
    let ap_mp_tight = is_ap_mp_tight(config, forced);
    let nation_ids: HashSet<i32> = NATION_PAIR_IDS.iter().flat_map(|(s, r)| [*s, *r]).collect();

    let forced_relic = forced.iter().find(|i| i.rarity.is_relic()).copied();
    let forced_epic = forced.iter().find(|i| i.rarity.is_epic()).copied();

    let relics = build_relic_epic_pool(catalog, config, tags, ap_mp_tight, forced_relic, true, &nation_ids);
    let epics = build_relic_epic_pool(catalog, config, tags, ap_mp_tight, forced_epic, false, &nation_ids);

    let forced_slot_counts: HashMap<Slot, usize> = {
        let mut m = HashMap::new();
        for item in forced {
            *m.entry(item.slot).or_insert(0) += 1;
        }
        m
    };
    let off_hand_disabled_by_forced = forced.iter().any(|i| i.disables_second_weapon);

    let mut buckets: HashMap<Slot, Vec<Item>> = HashMap::new();
    for item in catalog.items() {
        if item.rarity.is_relic() || item.rarity.is_epic() {
            continue;
        }
        if !initial_filter(item, config, tags, ap_mp_tight) {
            continue;
        }
        if !level_window_ok(item, config) {
            continue;
        }
        let cap = cardinality(item.slot);
        if forced_slot_counts.get(&item.slot).copied().unwrap_or(0) >= cap {
            continue;
        }
        if item.slot == Slot::SecondWeapon && off_hand_disabled_by_forced {
            continue;
        }
        buckets.entry(item.slot).or_default().push(item.clone());
    }

    let first_weapon = buckets.remove(&Slot::FirstWeapon).unwrap_or_default();
    let second_weapon = buckets.remove(&Slot::SecondWeapon).unwrap_or_default();

    let one_handers: Vec<Item> = first_weapon.iter().filter(|i| !i.disables_second_weapon).cloned().collect();
    let two_handers: Vec<Item> = first_weapon.iter().filter(|i| i.disables_second_weapon).cloned().collect();
    let mut daggers: Vec<Item> = second_weapon.iter().filter(|i| !i.is_shield).cloned().collect();
    let shields: Vec<Item> = if config.skip_shields {
        Vec::new()
    } else {
        second_weapon.iter().filter(|i| i.is_shield).cloned().collect()
    };

    if config.use_light_weapon_expert {
        daggers.push(synthetic_light_weapon_expert(config));
    }

    let mut per_slot: HashMap<Slot, Vec<Item>> = HashMap::new();
    for (slot, items) in buckets {
        per_slot.insert(slot, rank_and_trim(items, slot, config));
    }

    let one_handers = rank_and_trim(one_handers, Slot::FirstWeapon, config);
    let off_hands: Vec<Item> = {
        let mut v = daggers;
        v.extend(shields);
        rank_and_trim(v, Slot::SecondWeapon, config)
    };
    let two_handers = rank_and_trim(two_handers, Slot::FirstWeapon, config);

    let mut weapon_candidates: Vec<WeaponLoadout> = Vec::new();
    if !config.skip_shields {
        for item in &two_handers {
            weapon_candidates.push(WeaponLoadout { items: vec![item.clone()] });
        }
    }
    for one in &one_handers {
        for off in &off_hands {
            weapon_candidates.push(WeaponLoadout {
                items: vec![one.clone(), off.clone()],
            });
        }
    }

    weapon_candidates.sort_by(|a, b| {
        b.score(config).partial_cmp(&a.score(config)).unwrap_or(std::cmp::Ordering::Equal)
    });
    weapon_candidates = dedupe_keep_by_key(weapon_candidates, |w| w.dedupe_key(), 1);

    let mut slot_score_samples: HashMap<Slot, Vec<f64>> = HashMap::new();
    for (slot, items) in &per_slot {
        slot_score_samples.insert(
            *slot,
            items.iter().map(|i| crit_score_key(&i.stats, &config.base_stats, config)).collect(),
        );
    }
    let weapon_samples = |items: &[Item]| -> Vec<f64> {
        items.iter().map(|i| crit_score_key(&i.stats, &config.base_stats, config)).collect()
    };
    let mut first_weapon_samples = weapon_samples(&one_handers);
    first_weapon_samples.extend(weapon_samples(&two_handers));
    slot_score_samples.insert(Slot::FirstWeapon, first_weapon_samples);
    slot_score_samples.insert(Slot::SecondWeapon, weapon_samples(&off_hands));

    Pools {
        per_slot,
        weapon_candidates,
        one_handers,
        two_handers,
        off_hands,
        relics,
        epics,
        slot_score_samples,
    }
}
