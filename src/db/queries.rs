// Database queries — CRUD operations for readers, ratings, and the catalog.
//
// Every SQL statement lives here. The rest of the crate goes through the
// RatingStore trait, which SqliteStore forwards to these functions.

use anyhow::{Context, Result};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{Item, RatingHistory, StoreStats, UserHistory};

// --- Rating histories ---

/// Load one reader's history in first-insertion order.
///
/// Returns `None` when the reader has never been recorded.
pub fn get_history(conn: &Connection, user_id: &str) -> Result<Option<RatingHistory>> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM users WHERE id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;
    if !exists {
        return Ok(None);
    }

    let mut stmt =
        conn.prepare("SELECT item_id, rating FROM ratings WHERE user_id = ?1 ORDER BY seq")?;
    let rows = stmt.query_map(params![user_id], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
    })?;

    let mut history = RatingHistory::new();
    for row in rows {
        let (item_id, rating) = row?;
        history.insert(item_id, rating);
    }
    Ok(Some(history))
}

/// Load every reader with their history, readers in creation order.
pub fn list_users(conn: &Connection) -> Result<Vec<UserHistory>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, r.item_id, r.rating
         FROM users u
         LEFT JOIN ratings r ON r.user_id = u.id
         ORDER BY u.rowid, r.seq",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, Option<f64>>(2)?,
        ))
    })?;

    let mut users: Vec<UserHistory> = Vec::new();
    for row in rows {
        let (user_id, item_id, rating) = row?;
        let is_same_user = users.last().is_some_and(|u| u.user_id == user_id);
        if !is_same_user {
            users.push(UserHistory {
                user_id,
                history: RatingHistory::new(),
            });
        }
        // LEFT JOIN yields NULLs for a reader with no ratings.
        if let (Some(item_id), Some(rating), Some(current)) = (item_id, rating, users.last_mut()) {
            current.history.insert(item_id, rating);
        }
    }
    Ok(users)
}

/// Record a reader with an empty history. A no-op if the reader exists.
pub fn ensure_user(conn: &Connection, user_id: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO users (id) VALUES (?1)",
        params![user_id],
    )?;
    Ok(())
}

/// Merge a single rating into a reader's history, creating the reader if needed.
///
/// An existing rating for the same item is overwritten; its position in the
/// history is unchanged. No other entry is touched.
pub fn merge_history(conn: &Connection, user_id: &str, item_id: &str, rating: f64) -> Result<()> {
    let tx = conn
        .unchecked_transaction()
        .context("Failed to begin rating transaction")?;
    tx.execute(
        "INSERT OR IGNORE INTO users (id) VALUES (?1)",
        params![user_id],
    )?;
    tx.execute(
        "INSERT INTO ratings (user_id, item_id, rating, rated_at)
         VALUES (?1, ?2, ?3, datetime('now'))
         ON CONFLICT(user_id, item_id) DO UPDATE SET
            rating = ?3,
            rated_at = datetime('now')",
        params![user_id, item_id, rating],
    )?;
    tx.commit().context("Failed to commit rating")?;
    Ok(())
}

// --- Catalog ---

const ITEM_COLUMNS: &str = "id, title, author, metadata, popularity_count";

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    let metadata_json: String = row.get(3)?;
    let metadata = serde_json::from_str(&metadata_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    Ok(Item {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        metadata,
        popularity_count: u64::try_from(row.get::<_, i64>(4)?)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, Box::new(e)))?,
    })
}

/// Look up a single item by id.
pub fn get_item(conn: &Connection, item_id: &str) -> Result<Option<Item>> {
    let mut stmt = conn.prepare(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"))?;
    let item = stmt.query_row(params![item_id], item_from_row).optional()?;
    Ok(item)
}

/// The `limit` most popular items. Ties keep catalog insertion order.
pub fn list_items_by_popularity_desc(conn: &Connection, limit: usize) -> Result<Vec<Item>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS} FROM items
         ORDER BY popularity_count DESC, rowid ASC
         LIMIT ?1"
    ))?;
    let rows = stmt.query_map(params![limit], item_from_row)?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

/// Insert or replace a catalog item.
pub fn upsert_item(conn: &Connection, item: &Item) -> Result<()> {
    let metadata_json = serde_json::to_string(&item.metadata)?;
    let popularity_count = i64::try_from(item.popularity_count).with_context(|| {
        format!(
            "Popularity count {} for item {} is too large to store",
            item.popularity_count, item.id
        )
    })?;
    conn.execute(
        "INSERT INTO items (id, title, author, metadata, popularity_count)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
            title = ?2,
            author = ?3,
            metadata = ?4,
            popularity_count = ?5",
        params![
            item.id,
            item.title,
            item.author,
            metadata_json,
            popularity_count,
        ],
    )
    .with_context(|| format!("Failed to save item {}", item.id))?;
    Ok(())
}

// --- Stats ---

pub fn store_stats(conn: &Connection) -> Result<StoreStats> {
    let count = |table: &str| -> Result<u64> {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })?;
        Ok(u64::try_from(n)?)
    };
    Ok(StoreStats {
        users: count("users")?,
        items: count("items")?,
        ratings: count("ratings")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    #[test]
    fn test_unknown_user_has_no_history() {
        let conn = test_conn();
        assert!(get_history(&conn, "nobody").unwrap().is_none());
    }

    #[test]
    fn test_merge_creates_user_and_keeps_order() {
        let conn = test_conn();
        merge_history(&conn, "u1", "b2", 3.0).unwrap();
        merge_history(&conn, "u1", "b1", 5.0).unwrap();
        merge_history(&conn, "u1", "b2", 4.5).unwrap();

        let history = get_history(&conn, "u1").unwrap().unwrap();
        let entries: Vec<(&str, f64)> = history.iter().collect();
        assert_eq!(entries, vec![("b2", 4.5), ("b1", 5.0)]);
    }

    #[test]
    fn test_ensure_user_keeps_existing_history() {
        let conn = test_conn();
        ensure_user(&conn, "fresh").unwrap();
        assert!(get_history(&conn, "fresh").unwrap().unwrap().is_empty());

        merge_history(&conn, "u1", "b1", 5.0).unwrap();
        ensure_user(&conn, "u1").unwrap();
        assert_eq!(get_history(&conn, "u1").unwrap().unwrap().get("b1"), Some(5.0));
    }

    #[test]
    fn test_merge_leaves_other_users_alone() {
        let conn = test_conn();
        merge_history(&conn, "u1", "b1", 5.0).unwrap();
        merge_history(&conn, "u2", "b1", 1.0).unwrap();

        assert_eq!(get_history(&conn, "u1").unwrap().unwrap().get("b1"), Some(5.0));
        assert_eq!(get_history(&conn, "u2").unwrap().unwrap().get("b1"), Some(1.0));
    }

    #[test]
    fn test_list_users_in_creation_order() {
        let conn = test_conn();
        merge_history(&conn, "zed", "b1", 2.0).unwrap();
        merge_history(&conn, "amy", "b2", 4.0).unwrap();
        merge_history(&conn, "zed", "b3", 5.0).unwrap();
        conn.execute("INSERT INTO users (id) VALUES ('idle')", [])
            .unwrap();

        let users = list_users(&conn).unwrap();
        let ids: Vec<&str> = users.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(ids, vec!["zed", "amy", "idle"]);
        assert_eq!(users[0].history.len(), 2);
        assert!(users[2].history.is_empty());
    }

    #[test]
    fn test_item_roundtrip_with_metadata() {
        let conn = test_conn();
        let mut item = Item::new("b1", "Dune", 7).with_author("Frank Herbert");
        item.metadata
            .insert("genre".to_string(), serde_json::json!("science fiction"));
        upsert_item(&conn, &item).unwrap();

        assert_eq!(get_item(&conn, "b1").unwrap(), Some(item));
        assert!(get_item(&conn, "b404").unwrap().is_none());
    }

    #[test]
    fn test_popularity_roundtrips_through_integer_column() {
        let conn = test_conn();
        upsert_item(&conn, &Item::new("big", "Big", i64::MAX as u64)).unwrap();
        let item = get_item(&conn, "big").unwrap().unwrap();
        assert_eq!(item.popularity_count, i64::MAX as u64);
    }

    #[test]
    fn test_popularity_beyond_column_range_is_rejected() {
        let conn = test_conn();
        let err = upsert_item(&conn, &Item::new("huge", "Huge", u64::MAX)).unwrap_err();
        assert!(format!("{err:#}").contains("huge"));
        assert!(get_item(&conn, "huge").unwrap().is_none());
    }

    #[test]
    fn test_popularity_order_with_ties() {
        let conn = test_conn();
        upsert_item(&conn, &Item::new("a", "A", 3)).unwrap();
        upsert_item(&conn, &Item::new("b", "B", 9)).unwrap();
        upsert_item(&conn, &Item::new("c", "C", 3)).unwrap();
        upsert_item(&conn, &Item::new("d", "D", 1)).unwrap();

        let ids: Vec<String> = list_items_by_popularity_desc(&conn, 3)
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_store_stats() {
        let conn = test_conn();
        upsert_item(&conn, &Item::new("b1", "One", 0)).unwrap();
        merge_history(&conn, "u1", "b1", 4.0).unwrap();
        merge_history(&conn, "u1", "b2", 2.0).unwrap();
        merge_history(&conn, "u2", "b1", 3.0).unwrap();

        let stats = store_stats(&conn).unwrap();
        assert_eq!(
            stats,
            StoreStats {
                users: 2,
                items: 1,
                ratings: 3
            }
        );
    }
}
