// System status display — database size and row counts.

use anyhow::Result;
use std::sync::Arc;

use crate::db::RatingStore;

/// Display system status to the terminal.
pub async fn show(store: &Arc<dyn RatingStore>, db_path: &str) -> Result<()> {
    let file_size = std::fs::metadata(db_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_path, file_size);

    let stats = store.stats().await?;
    println!("Readers: {}", stats.users);
    println!("Catalog items: {}", stats.items);
    println!("Ratings: {}", stats.ratings);

    if stats.items == 0 {
        println!("  Run `lectern import <file>` to load a catalog");
    }
    if stats.users > 0 {
        // Every recommendation request scans the whole reader population
        let avg = stats.ratings as f64 / stats.users as f64;
        println!("Average ratings per reader: {avg:.1}");
    }

    Ok(())
}

/// Human-readable file size.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
