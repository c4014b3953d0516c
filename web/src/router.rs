use crate::{sse::handler, AppState};
use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};

/// Path of the live-update stream.
pub const EVENTS_PATH: &str = "/events";

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .route(EVENTS_PATH, get(handler::sse_handler))
        .fallback(not_found)
        .with_state(app_state)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found\n")
}
