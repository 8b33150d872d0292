pub mod posts;
pub mod comments;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use serde_json::{json, Value};

use crate::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new().nest(
        "/api",
        posts::routes()
            .merge(comments::routes())
            .route("/health", get(api_health)),
    )
}

async fn api_health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "blogstore",
        "version": "0.1.0"
    }))
}

/// Found results become a 200 with payload, an empty result set collapses
/// into 204 No Content.
pub(crate) fn list_response<T: Serialize>(items: Vec<T>) -> Response {
    if items.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        Json(items).into_response()
    }
}
