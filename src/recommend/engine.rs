// Recommender — request-scoped entry points over a shared Rating Store.
//
// The store handle is created once at startup and shared by every request.
// Each call fetches what it needs, then computes synchronously; no state
// is kept between calls, so requests for different readers can run
// concurrently. Dropping the returned future cancels the request at the
// next store call.

use std::sync::Arc;

use tracing::{debug, info};

use crate::db::models::Item;
use crate::db::RatingStore;

use super::candidates;
use super::error::RecommendError;
use super::neighbors::rank_neighbors;
use super::popularity::top_popular;
use super::update::validate_rating;

/// Tunables for recommendation requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendOptions {
    /// Neighbor ratings at or above this surface an item (default 4.0).
    pub rating_threshold: f64,
    /// Maximum personalized recommendations returned (default 5).
    pub result_cap: usize,
    /// Number of items in the popular list (default 10).
    pub popular_limit: usize,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            rating_threshold: 4.0,
            result_cap: 5,
            popular_limit: 10,
        }
    }
}

#[derive(Clone)]
pub struct Recommender {
    store: Arc<dyn RatingStore>,
    options: RecommendOptions,
}

impl Recommender {
    pub fn new(store: Arc<dyn RatingStore>, options: RecommendOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &Arc<dyn RatingStore> {
        &self.store
    }

    /// Items rated highly by readers with similar taste, not yet rated by `user_id`.
    ///
    /// Fails with `NotFound` for an unknown reader. A reader with no useful
    /// neighbors gets an empty list.
    pub async fn recommend_for_user(&self, user_id: &str) -> Result<Vec<Item>, RecommendError> {
        let target_history = self
            .store
            .get_history(user_id)
            .await?
            .ok_or_else(|| RecommendError::user_not_found(user_id))?;

        let population = self.store.list_users().await?;
        let neighbors = rank_neighbors(user_id, &target_history, &population);
        debug!(
            user_id,
            population = population.len(),
            neighbors = neighbors.len(),
            "Ranked neighbors"
        );

        let items = candidates::aggregate(
            self.store.as_ref(),
            &target_history,
            &neighbors,
            self.options.rating_threshold,
            self.options.result_cap,
        )
        .await?;

        info!(user_id, count = items.len(), "Built recommendations");
        Ok(items)
    }

    /// The most popular items in the catalog.
    pub async fn popular(&self) -> Result<Vec<Item>, RecommendError> {
        self.popular_with_limit(self.options.popular_limit).await
    }

    pub async fn popular_with_limit(&self, limit: usize) -> Result<Vec<Item>, RecommendError> {
        let catalog = self.store.list_items_by_popularity_desc(limit).await?;
        Ok(top_popular(catalog, limit))
    }

    /// Record a rating, overwriting any earlier rating of the same item.
    ///
    /// Invalid input is rejected before the store is touched.
    pub async fn update_history(
        &self,
        user_id: &str,
        item_id: &str,
        rating: f64,
    ) -> Result<(), RecommendError> {
        validate_rating(item_id, rating)?;
        self.store.merge_history(user_id, item_id, rating).await?;
        info!(user_id, item_id, rating, "Rating recorded");
        Ok(())
    }
}
