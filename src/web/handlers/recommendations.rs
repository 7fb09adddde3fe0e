// Recommendation handlers.
//
// GET /recommendations/user/{user_id} — up to result_cap books for a reader;
//                                       404 when the reader is unknown
// GET /recommendations/popular        — the most borrowed books

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::web::{error_response, AppState};

/// GET /recommendations/user/{user_id}
pub async fn for_user(State(state): State<AppState>, Path(user_id): Path<String>) -> Response {
    match state.recommender.recommend_for_user(&user_id).await {
        Ok(items) => Json(serde_json::json!({ "recommendations": items })).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET /recommendations/popular
pub async fn popular(State(state): State<AppState>) -> Response {
    match state.recommender.popular().await {
        Ok(items) => Json(serde_json::json!({ "books": items })).into_response(),
        Err(e) => error_response(&e),
    }
}
