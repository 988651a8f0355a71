//! API routes for the Q&A server

pub mod answer;

use axum::{routing::post, Router};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/run", post(answer::run))
        // Versionless alias kept for older clients
        .route("/run", post(answer::run))
}
