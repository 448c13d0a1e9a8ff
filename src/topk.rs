//! Top-K aggregator (spec §4.8): merges every relic/epic pair's bounded
//! 5-candidate list into the solve's final top-5, tie-breaking on the
//! lexicographically sorted item-id list.

use crate::search::Candidate;

/// Tie-break key: the candidate's sorted item ids, compared
/// lexicographically (spec §9 open question resolution).
fn tie_break_key(candidate: &Candidate) -> Vec<i32> {
    candidate.items.iter().map(|i| i.item_id.0).collect()
}

fn cmp_candidates(a: &Candidate, b: &Candidate) -> std::cmp::Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then_with(|| tie_break_key(a).cmp(&tie_break_key(b)))
}

/// Folds every pair's candidate list into one globally ranked top-5.
pub fn merge(per_pair: Vec<Vec<Candidate>>) -> Vec<Candidate> {
    let mut all: Vec<Candidate> = per_pair.into_iter().flatten().collect();
    all.sort_by(cmp_candidates);
    all.truncate(5);
    all
}
