// Error kinds surfaced by the recommender's entry points.
//
// Store failures are wrapped, never retried. The calling boundary maps
// each kind to its own representation (HTTP status, CLI exit).

use thiserror::Error;

/// Why a rating update was rejected. Nothing is written when this is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("item id is missing or empty")]
    MissingItemId,
    #[error("rating must be a number")]
    NonNumericRating,
    #[error("rating {0} is outside 0..=5")]
    RatingOutOfRange(f64),
}

#[derive(Debug, Error)]
pub enum RecommendError {
    /// Unknown user (terminal for a recommendation request).
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid rating update: {0}")]
    Validation(#[from] ValidationError),

    /// The Rating Store failed; propagated as-is.
    #[error("rating store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl RecommendError {
    pub fn user_not_found(user_id: &str) -> Self {
        RecommendError::NotFound {
            entity: "user",
            id: user_id.to_string(),
        }
    }
}
