// Data models — the types that flow between the store and the recommender.
//
// These are kept separate from the SQL so the recommendation core can use
// them without depending on rusqlite.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Highest rating a reader can give an item.
pub const MAX_RATING: f64 = 5.0;

/// Lowest rating a reader can give an item.
pub const MIN_RATING: f64 = 0.0;

/// A reader's item → rating mapping, iterated in insertion order.
///
/// Overwriting an existing item keeps its original position, so the order
/// reflects when each item was *first* rated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingHistory {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl RatingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rating for `item_id`, if the reader has rated it.
    pub fn get(&self, item_id: &str) -> Option<f64> {
        self.index.get(item_id).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.index.contains_key(item_id)
    }

    /// Set the rating for `item_id`, returning the previous rating if any.
    pub fn insert(&mut self, item_id: impl Into<String>, rating: f64) -> Option<f64> {
        let item_id = item_id.into();
        match self.index.get(&item_id) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, rating)),
            None => {
                self.index.insert(item_id.clone(), self.entries.len());
                self.entries.push((item_id, rating));
                None
            }
        }
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(id, rating)| (id.as_str(), *rating))
    }

    pub fn item_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for RatingHistory {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut history = RatingHistory::new();
        for (item_id, rating) in iter {
            history.insert(item_id, rating);
        }
        history
    }
}

// Serialized as a plain JSON object. Key order on the wire is the
// insertion order, and deserialization keeps document order.
impl Serialize for RatingHistory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (item_id, rating) in &self.entries {
            map.serialize_entry(item_id, rating)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RatingHistory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HistoryVisitor;

        impl<'de> Visitor<'de> for HistoryVisitor {
            type Value = RatingHistory;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of item ids to numeric ratings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut history = RatingHistory::new();
                while let Some((item_id, rating)) = access.next_entry::<String, f64>()? {
                    history.insert(item_id, rating);
                }
                Ok(history)
            }
        }

        deserializer.deserialize_map(HistoryVisitor)
    }
}

/// One member of the reader population: a user id and their history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserHistory {
    pub user_id: String,
    pub history: RatingHistory,
}

/// A catalog item (a book).
///
/// `metadata` carries whatever descriptive fields the catalog has beyond
/// title and author; it is flattened into the item's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub popularity_count: u64,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Item {
    /// Build an item with no extra metadata.
    pub fn new(id: impl Into<String>, title: impl Into<String>, popularity_count: u64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: None,
            popularity_count,
            metadata: serde_json::Map::new(),
        }
    }

    #[cfg(test)]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// Row counts reported by `lectern status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub users: u64,
    pub items: u64,
    pub ratings: u64,
}
