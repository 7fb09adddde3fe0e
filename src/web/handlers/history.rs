// POST /user/{user_id}/history — record one rating.
//
// Body: { "bookId": "b1", "rating": 4.5 }
//
// Returns 400 for a malformed or non-object body, a missing or non-string
// bookId, or a rating that isn't a number in 0..=5. Nothing is written in
// that case.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tracing::debug;

use crate::recommend::update::parse_rating_input;
use crate::recommend::RecommendError;
use crate::web::{api_error, error_response, AppState};

pub async fn update_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    // Taken as a raw Value so a wrong field type is a validation error, not a 422
    let body = match payload {
        Ok(Json(Value::Object(body))) => body,
        Ok(Json(other)) => {
            debug!(body = %other, "History update body is not an object");
            return api_error(StatusCode::BAD_REQUEST, "Request body must be a JSON object");
        }
        Err(rejection) => {
            debug!(error = %rejection, "Rejected history update body");
            return api_error(StatusCode::BAD_REQUEST, "Invalid JSON body");
        }
    };

    let book_id = body.get("bookId").and_then(Value::as_str);
    let (item_id, rating) = match parse_rating_input(book_id, body.get("rating")) {
        Ok(update) => update,
        Err(e) => return error_response(&RecommendError::Validation(e)),
    };

    match state
        .recommender
        .update_history(&user_id, &item_id, rating)
        .await
    {
        Ok(()) => Json(serde_json::json!({ "message": "Reading history updated" })).into_response(),
        Err(e) => error_response(&e),
    }
}
