// Neighbor ranking — score every other reader against the target.
//
// This is a whole-population scan: O(readers × history size) per request,
// with no pre-indexing. Readers scoring 0 (no overlap, or total
// disagreement) are dropped before sorting.

use crate::db::models::{RatingHistory, UserHistory};

use super::similarity;

/// A reader considered for recommendations, with their affinity to the target.
///
/// Lives only for one recommendation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedNeighbor<'a> {
    pub user_id: &'a str,
    pub similarity: f64,
    pub history: &'a RatingHistory,
}

/// Rank `population` by similarity to the target, most similar first.
///
/// The target itself is excluded by id. Only readers with a score strictly
/// greater than zero are kept. Equal scores keep population order (the sort
/// is stable).
pub fn rank_neighbors<'a>(
    target_id: &str,
    target_history: &RatingHistory,
    population: &'a [UserHistory],
) -> Vec<RankedNeighbor<'a>> {
    let mut neighbors: Vec<RankedNeighbor<'a>> = population
        .iter()
        .filter(|user| user.user_id != target_id)
        .filter_map(|user| {
            let similarity = similarity::score(target_history, &user.history);
            (similarity > 0.0).then_some(RankedNeighbor {
                user_id: &user.user_id,
                similarity,
                history: &user.history,
            })
        })
        .collect();

    neighbors.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, entries: &[(&str, f64)]) -> UserHistory {
        UserHistory {
            user_id: id.to_string(),
            history: entries.iter().map(|&(item, r)| (item, r)).collect(),
        }
    }

    #[test]
    fn test_excludes_target_and_zero_scores() {
        let target: RatingHistory = [("b1", 5.0), ("b2", 3.0)].into_iter().collect();
        let population = vec![
            user("me", &[("b1", 5.0), ("b2", 3.0)]),
            user("stranger", &[("b7", 5.0)]),
            user("opposite", &[("b1", 0.0)]),
            user("close", &[("b1", 4.0)]),
        ];

        let ranked = rank_neighbors("me", &target, &population);
        let ids: Vec<&str> = ranked.iter().map(|n| n.user_id).collect();
        assert_eq!(ids, vec!["close"]);
        assert!((ranked[0].similarity - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_sorted_descending() {
        let target: RatingHistory = [("b1", 5.0), ("b2", 3.0)].into_iter().collect();
        let population = vec![
            user("b", &[("b1", 1.0)]),
            user("a", &[("b1", 5.0), ("b2", 3.0), ("b3", 5.0)]),
            user("c", &[("b2", 1.0)]),
        ];

        let ranked = rank_neighbors("me", &target, &population);
        let ids: Vec<&str> = ranked.iter().map(|n| n.user_id).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].similarity >= w[1].similarity));
    }

    #[test]
    fn test_ties_keep_population_order() {
        let target: RatingHistory = [("b1", 4.0)].into_iter().collect();
        let population = vec![
            user("first", &[("b1", 3.0)]),
            user("second", &[("b1", 5.0)]),
            user("third", &[("b1", 3.0)]),
        ];

        let ranked = rank_neighbors("me", &target, &population);
        let ids: Vec<&str> = ranked.iter().map(|n| n.user_id).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_population() {
        let target: RatingHistory = [("b1", 4.0)].into_iter().collect();
        assert!(rank_neighbors("me", &target, &[]).is_empty());
    }
}
