// Database layer — the Rating Store the recommender reads from and writes to.
//
// We use rusqlite with the "bundled" feature so there's no system SQLite
// dependency. The database file lives wherever LECTERN_DB_PATH points
// (defaults to ./lectern.db).

pub mod models;
pub mod queries;
pub mod schema;
pub mod seed;
pub mod sqlite;
pub mod traits;

pub use traits::RatingStore;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

use sqlite::SqliteStore;

/// Open (or create) the SQLite database, run migrations, and wrap it as a store.
///
/// Called by `lectern init` and by any command that may run against a
/// fresh database.
pub fn initialize_sqlite(db_path: &str) -> Result<Arc<dyn RatingStore>> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for database: {db_path}"))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {db_path}"))?;

    // WAL lets readers proceed while a rating is being written
    conn.pragma_update(None, "journal_mode", "WAL")?;

    schema::create_tables(&conn)?;

    Ok(Arc::new(SqliteStore::new(conn)))
}

/// Open an existing SQLite database (fails if it doesn't exist yet).
pub fn open_sqlite(db_path: &str) -> Result<Arc<dyn RatingStore>> {
    if !Path::new(db_path).exists() {
        anyhow::bail!(
            "Database not found at {}. Run `lectern init` first.",
            db_path
        );
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {db_path}"))?;
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // Pick up any migrations added since the database was created
    schema::create_tables(&conn)?;

    Ok(Arc::new(SqliteStore::new(conn)))
}

/// A migrated, empty in-memory store. Nothing survives the process.
pub fn open_in_memory() -> Result<Arc<dyn RatingStore>> {
    let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
    schema::create_tables(&conn)?;
    Ok(Arc::new(SqliteStore::new(conn)))
}
