//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        // Session actions
        .route("/api/load", post(handlers::api_load))
        .route("/api/clean", post(handlers::api_clean))
        .route("/api/analyze", post(handlers::api_analyze))
        // Read-only views
        .route("/api/view", get(handlers::api_view))
        .route("/api/products", get(handlers::api_products))
        .route("/health", get(handlers::health))
        // Static assets
        .route("/static/style.css", get(handlers::serve_css))
        .route("/static/dashboard.js", get(handlers::serve_js))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
