// RatingStore trait — the narrow read/write interface the recommender uses.
//
// The recommender holds an `Arc<dyn RatingStore>` and never touches SQL.
// All methods are async so a synchronous backend (rusqlite behind a Mutex)
// and a natively async one fit behind the same interface. Every read is a
// snapshot; no locking discipline across calls is assumed.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Item, RatingHistory, StoreStats, UserHistory};

#[async_trait]
pub trait RatingStore: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    /// Row counts for readers, items, and ratings.
    async fn stats(&self) -> Result<StoreStats>;

    // --- Rating histories ---

    /// A reader's history, or `None` if the reader is unknown.
    async fn get_history(&self, user_id: &str) -> Result<Option<RatingHistory>>;

    /// Every reader with their history (whole-population scan).
    async fn list_users(&self) -> Result<Vec<UserHistory>>;

    /// Record a reader with an empty history if they don't exist yet.
    async fn ensure_user(&self, user_id: &str) -> Result<()>;

    /// Merge one rating into a reader's history (upsert), creating the reader if absent.
    async fn merge_history(&self, user_id: &str, item_id: &str, rating: f64) -> Result<()>;

    // --- Catalog ---

    /// Look up a catalog item, or `None` if it doesn't exist.
    async fn get_item(&self, item_id: &str) -> Result<Option<Item>>;

    /// The `limit` most popular items, most popular first.
    async fn list_items_by_popularity_desc(&self, limit: usize) -> Result<Vec<Item>>;

    /// Insert or replace a catalog item.
    async fn upsert_item(&self, item: &Item) -> Result<()>;
}
