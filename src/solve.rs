//! Solve entry point: the `Configuring -> PoolBuild -> Feasibility ->
//! PairEnumerate -> Search -> Rank -> Done` state machine (spec §4.9),
//! instrumented with one `tracing` span per state.

use crate::catalog::{Catalog, SourceTags};
use crate::config::{SolveConfig, SolveError};
use crate::feasibility;
use crate::items::{Item, Slot};
use crate::pairs::{self, RelicEpicPair};
use crate::pool;
use crate::scoring::apply_modifiers;
use crate::search::{self, Candidate};
use crate::topk;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::info_span;

/// One top-5 entry: an item set plus its objective score.
#[derive(Debug, Clone)]
pub struct Solution {
    pub score: f64,
    pub items: Vec<Item>,
}

impl From<Candidate> for Solution {
    fn from(c: Candidate) -> Self {
        Solution {
            score: c.score,
            items: c.items,
        }
    }
}

/// Called once per completed relic/epic pair in the sequential (single
/// threaded host) path; `(completed, total)`.
pub type ProgressCallback<'a> = dyn Fn(usize, usize) + 'a;

/// Runs the full state machine against a caller-supplied catalog, returning
/// the top (up to) 5 ranked item sets.
pub fn solve(
    config: &SolveConfig,
    catalog: &dyn Catalog,
    tags: &SourceTags,
    progress: Option<&ProgressCallback<'_>>,
) -> Result<Vec<Solution>, SolveError> {
    let _configuring = info_span!("configuring").entered();
    config.validate()?;

    let forced_items: Vec<&Item> = config
        .forced_item_ids
        .iter()
        .filter_map(|id| catalog.find(*id))
        .collect();
    if forced_items.len() != config.forced_item_ids.len() {
        return Err(SolveError::ConfigError(
            "a forced item id was not found in the catalog".into(),
        ));
    }
    drop(_configuring);

    let effective_base = apply_modifiers(config.base_stats, config);
    let mut effective_config = config.clone();
    effective_config.base_stats = effective_base;
    if !effective_config.forbidden_sources.is_empty() {
        let source_forbidden = tags.resolve_forbidden_sources(&effective_config.forbidden_sources);
        for id in source_forbidden {
            if !effective_config.forbidden_item_ids.contains(&id) {
                effective_config.forbidden_item_ids.push(id);
            }
        }
    }
    let config = &effective_config;

    {
        let _feasibility = info_span!("feasibility").entered();
        feasibility::check_forced_weapon_conflict(&forced_items)?;
        feasibility::check_item_condition_conflicts(config, &forced_items)?;
        feasibility::analyze_ap_mp_reachability(config, catalog, &forced_items)?;
        for stat in [
            feasibility::TrackedStat::Ap,
            feasibility::TrackedStat::Mp,
            feasibility::TrackedStat::Ra,
            feasibility::TrackedStat::Wp,
        ] {
            feasibility::analyze_stat_reachability(stat, config, catalog, &forced_items)?;
        }
    }

    if config.dry_run {
        return Ok(Vec::new());
    }

    let pools = {
        let _pool_build = info_span!("pool_build").entered();
        pool::build_pools(catalog, tags, config, &forced_items)
    };

    let forced_relic = forced_items.iter().find(|i| i.rarity.is_relic()).copied();
    let forced_epic = forced_items.iter().find(|i| i.rarity.is_epic()).copied();
    let other_forced: Vec<&Item> = forced_items
        .iter()
        .filter(|i| !i.rarity.is_relic() && !i.rarity.is_epic())
        .copied()
        .collect();
    let other_forced_slot_counts: HashMap<Slot, usize> = {
        let mut m = HashMap::new();
        for item in &other_forced {
            *m.entry(item.slot).or_insert(0) += 1;
        }
        m
    };

    let pairs: Vec<RelicEpicPair> = {
        let _pair_enumerate = info_span!("pair_enumerate").entered();
        pairs::enumerate_pairs(&pools, config, catalog, forced_relic, forced_epic, &other_forced_slot_counts)
    };

    let per_pair: Vec<Vec<Candidate>> = {
        let _search = info_span!("search").entered();
        if config.single_threaded {
            let total = pairs.len();
            let mut results = Vec::with_capacity(total);
            for (i, pair) in pairs.iter().enumerate() {
                results.push(search::search_pair(&pools, pair, config, &other_forced));
                if let Some(cb) = progress {
                    cb(i + 1, total);
                }
            }
            results
        } else {
            pairs
                .par_iter()
                .map(|pair| search::search_pair(&pools, pair, config, &other_forced))
                .collect()
        }
    };

    let ranked = {
        let _rank = info_span!("rank").entered();
        topk::merge(per_pair)
    };

    if ranked.is_empty() {
        return Err(SolveError::NoSolution);
    }

    let _done = info_span!("done").entered();
    Ok(ranked.into_iter().map(Solution::from).collect())
}
