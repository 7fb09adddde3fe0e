// SqliteStore — rusqlite backend implementing the RatingStore trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across an .await on anything else.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{Item, RatingHistory, StoreStats, UserHistory};
use super::traits::RatingStore;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl RatingStore for SqliteStore {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn stats(&self) -> Result<StoreStats> {
        let conn = self.conn.lock().await;
        super::queries::store_stats(&conn)
    }

    async fn get_history(&self, user_id: &str) -> Result<Option<RatingHistory>> {
        let conn = self.conn.lock().await;
        super::queries::get_history(&conn, user_id)
    }

    async fn list_users(&self) -> Result<Vec<UserHistory>> {
        let conn = self.conn.lock().await;
        super::queries::list_users(&conn)
    }

    async fn ensure_user(&self, user_id: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::ensure_user(&conn, user_id)
    }

    async fn merge_history(&self, user_id: &str, item_id: &str, rating: f64) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::merge_history(&conn, user_id, item_id, rating)
    }

    async fn get_item(&self, item_id: &str) -> Result<Option<Item>> {
        let conn = self.conn.lock().await;
        super::queries::get_item(&conn, item_id)
    }

    async fn list_items_by_popularity_desc(&self, limit: usize) -> Result<Vec<Item>> {
        let conn = self.conn.lock().await;
        super::queries::list_items_by_popularity_desc(&conn, limit)
    }

    async fn upsert_item(&self, item: &Item) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::upsert_item(&conn, item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;

    async fn test_store() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        SqliteStore::new(conn)
    }

    #[tokio::test]
    async fn test_trait_history_roundtrip() {
        let store = test_store().await;
        assert!(store.get_history("u1").await.unwrap().is_none());
        store.merge_history("u1", "b1", 4.0).await.unwrap();
        let history = store.get_history("u1").await.unwrap().unwrap();
        assert_eq!(history.get("b1"), Some(4.0));
    }

    #[tokio::test]
    async fn test_trait_list_users() {
        let store = test_store().await;
        store.merge_history("u1", "b1", 4.0).await.unwrap();
        store.merge_history("u2", "b1", 2.0).await.unwrap();
        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].user_id, "u2");
    }

    #[tokio::test]
    async fn test_trait_items() {
        let store = test_store().await;
        store
            .upsert_item(&Item::new("b1", "Emma", 3).with_author("Jane Austen"))
            .await
            .unwrap();
        let item = store.get_item("b1").await.unwrap().unwrap();
        assert_eq!(item.title, "Emma");
        let popular = store.list_items_by_popularity_desc(10).await.unwrap();
        assert_eq!(popular.len(), 1);
    }

    #[tokio::test]
    async fn test_trait_table_count_and_stats() {
        let store = test_store().await;
        assert_eq!(store.table_count().await.unwrap(), 4);
        assert_eq!(store.stats().await.unwrap(), StoreStats::default());
    }
}
