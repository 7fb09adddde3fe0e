// Seed import — load a catalog and reader histories from a JSON document.
//
// Shape:
//   { "items": [ { "id": "b1", "title": "...", "author": "...",
//                  "popularity_count": 12, ...extra metadata } ],
//     "users": [ { "id": "u1", "history": { "b1": 5, "b2": 3.5 } } ] }
//
// Every rating is validated before anything is written, so a bad file
// leaves the store untouched.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use super::models::{Item, RatingHistory};
use super::RatingStore;
use crate::recommend::update::validate_rating;

#[derive(Debug, Deserialize)]
pub struct SeedDocument {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub id: String,
    #[serde(default)]
    pub history: RatingHistory,
}

/// What an import wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub items: usize,
    pub users: usize,
    pub ratings: usize,
}

impl SeedDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Seed file is not a valid seed document")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Check every rating, naming the first offending user and item.
    pub fn validate(&self) -> Result<()> {
        for user in &self.users {
            if user.id.is_empty() {
                anyhow::bail!("Seed user with an empty id");
            }
            for (item_id, rating) in user.history.iter() {
                validate_rating(item_id, rating).with_context(|| {
                    format!("Invalid rating for user {} item {:?}", user.id, item_id)
                })?;
            }
        }
        Ok(())
    }
}

/// Validate the whole document, then write items and ratings.
pub async fn import(store: &dyn RatingStore, doc: &SeedDocument) -> Result<ImportSummary> {
    doc.validate()?;

    let mut summary = ImportSummary::default();
    for item in &doc.items {
        store.upsert_item(item).await?;
        summary.items += 1;
    }
    for user in &doc.users {
        // A reader with no ratings still exists and gets an empty list.
        store.ensure_user(&user.id).await?;
        for (item_id, rating) in user.history.iter() {
            store.merge_history(&user.id, item_id, rating).await?;
            summary.ratings += 1;
        }
        summary.users += 1;
    }

    info!(
        items = summary.items,
        users = summary.users,
        ratings = summary.ratings,
        "Seed import complete"
    );
    Ok(summary)
}
