// Web server — Axum JSON API over the recommender.
//
// Routes:
//   GET  /                                 endpoint listing
//   GET  /health                           liveness
//   GET  /test                             running check
//   GET  /recommendations/user/{user_id}   personalized recommendations
//   GET  /recommendations/popular          most popular books
//   POST /user/{user_id}/history           record a rating
//
// No authentication. CORS is open to any origin.

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::recommend::{RecommendError, Recommender};

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(recommender: Recommender, port: u16, bind: &str) -> Result<()> {
    let app = build_router(AppState { recommender });

    let addr = format!("{bind}:{port}");
    info!("Lectern API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/test", get(running))
        .route(
            "/recommendations/user/{user_id}",
            get(handlers::recommendations::for_user),
        )
        .route(
            "/recommendations/popular",
            get(handlers::recommendations::popular),
        )
        .route(
            "/user/{user_id}/history",
            post(handlers::history::update_history),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / — list the available endpoints.
async fn index() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Lectern book recommendation API",
        "endpoints": {
            "health": "/health",
            "test": "/test",
            "user_recommendations": "/recommendations/user/{user_id}",
            "popular_books": "/recommendations/popular",
            "update_history": "/user/{user_id}/history (POST)",
        }
    }))
}

/// GET /health — always 200 OK.
async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// GET /test — kept for clients that check this path.
async fn running() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Lectern API is running" }))
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Map a recommender error to its HTTP response.
pub fn error_response(err: &RecommendError) -> Response {
    match err {
        RecommendError::NotFound { .. } => api_error(StatusCode::NOT_FOUND, &err.to_string()),
        RecommendError::Validation(_) => api_error(StatusCode::BAD_REQUEST, &err.to_string()),
        RecommendError::Store(e) => {
            error!(error = %format!("{e:#}"), "Rating store failure");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Rating store error")
        }
    }
}
