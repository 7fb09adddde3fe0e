// Candidate aggregation — turn ranked neighbors into a deduplicated item list.
//
// Neighbors are walked most-similar first, and each neighbor's history in
// insertion order. An item qualifies when the target hasn't rated it and the
// neighbor rated it at or above the threshold. The first neighbor to surface
// an item wins; later duplicates are dropped.
//
// Resolution against the catalog is a separate async step so the ordering
// logic stays pure. Candidates missing from the catalog are skipped, and
// resolution stops once the cap is reached.

use std::collections::HashSet;

use anyhow::Result;
use tracing::debug;

use crate::db::models::{Item, RatingHistory};
use crate::db::RatingStore;

use super::neighbors::RankedNeighbor;

/// Item ids worth recommending, in preference order, without duplicates.
///
/// Never yields an id from `target_history`. Not capped: catalog lookups
/// may still reject some of these.
pub fn candidate_ids<'a>(
    target_history: &RatingHistory,
    neighbors: &[RankedNeighbor<'a>],
    rating_threshold: f64,
) -> Vec<&'a str> {
    let mut seen: HashSet<&str> = target_history.item_ids().collect();
    let mut candidates = Vec::new();

    for neighbor in neighbors {
        let history: &'a RatingHistory = neighbor.history;
        for (item_id, rating) in history.iter() {
            if rating >= rating_threshold && !seen.contains(item_id) {
                seen.insert(item_id);
                candidates.push(item_id);
            }
        }
    }

    candidates
}

/// Resolve candidates to catalog items, keeping at most `result_cap`.
///
/// Store errors propagate immediately; a missing item is not an error.
pub async fn aggregate(
    store: &dyn RatingStore,
    target_history: &RatingHistory,
    neighbors: &[RankedNeighbor<'_>],
    rating_threshold: f64,
    result_cap: usize,
) -> Result<Vec<Item>> {
    let candidates = candidate_ids(target_history, neighbors, rating_threshold);
    debug!(candidates = candidates.len(), "Resolving candidate items");

    let mut items = Vec::with_capacity(result_cap.min(candidates.len()));
    for item_id in candidates {
        if items.len() >= result_cap {
            break;
        }
        match store.get_item(item_id).await? {
            Some(item) => items.push(item),
            None => debug!(item_id, "Candidate missing from catalog, skipping"),
        }
    }

    Ok(items)
}
