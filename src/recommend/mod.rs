// Recommendation core — similarity scoring, neighbor ranking, candidate
// aggregation, and popularity ranking.
//
// Everything here except `engine` and `candidates::aggregate` is a pure
// function of data already fetched from the store.

pub mod candidates;
pub mod engine;
pub mod error;
pub mod neighbors;
pub mod popularity;
pub mod similarity;
pub mod update;

pub use engine::{RecommendOptions, Recommender};
pub use error::{RecommendError, ValidationError};
