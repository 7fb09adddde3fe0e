// Popularity ranking — independent of any reader's history.

use crate::db::models::Item;

/// The `n` most popular items, most popular first.
///
/// Items with equal popularity keep their catalog order (stable sort).
pub fn top_popular(mut catalog: Vec<Item>, n: usize) -> Vec<Item> {
    catalog.sort_by(|a, b| b.popularity_count.cmp(&a.popularity_count));
    catalog.truncate(n);
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_and_truncates() {
        let catalog = vec![
            Item::new("low", "Low", 1),
            Item::new("tie-a", "Tie A", 5),
            Item::new("high", "High", 40),
            Item::new("tie-b", "Tie B", 5),
        ];
        let ids: Vec<String> = top_popular(catalog, 3).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["high", "tie-a", "tie-b"]);
    }

    #[test]
    fn test_n_larger_than_catalog() {
        let catalog = vec![Item::new("only", "Only", 0)];
        assert_eq!(top_popular(catalog, 10).len(), 1);
    }

    #[test]
    fn test_zero_n() {
        let catalog = vec![Item::new("only", "Only", 3)];
        assert!(top_popular(catalog, 0).is_empty());
    }
}
