// Pairwise reader similarity.
//
// Only items both readers have rated count. Each shared item contributes
// MAX_RATING minus the absolute rating gap, and the sum is averaged over the
// shared items. Identical tastes score 5, opposite tastes on every shared
// item score 0, and no overlap at all scores 0.

use crate::db::models::{RatingHistory, MAX_RATING};

/// Affinity between two rating histories, in `0.0..=5.0`. Symmetric.
pub fn score(a: &RatingHistory, b: &RatingHistory) -> f64 {
    // Walk the smaller history and probe the larger one.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let mut agreements: Vec<f64> = small
        .iter()
        .filter_map(|(item_id, rating_small)| {
            large
                .get(item_id)
                .map(|rating_large| MAX_RATING - (rating_small - rating_large).abs())
        })
        .collect();

    if agreements.is_empty() {
        return 0.0;
    }

    // Summing in sorted order makes score(a, b) bit-identical to score(b, a).
    agreements.sort_by(f64::total_cmp);
    agreements.iter().sum::<f64>() / agreements.len() as f64
}
