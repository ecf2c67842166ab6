//! BookShare
//!
//! Catalog, filtering and book submission over a hosted data backend, driven through a small
//! local JSON surface.

pub mod api;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod filter;
pub mod form;
pub mod gateway;
pub mod models;
pub mod navigation;
pub mod session;

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use session::SessionHandle;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: SessionHandle,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Views
        .route("/view", get(api::get_view))
        .route("/home", get(api::get_home))
        .route("/browse", get(api::get_browse))
        .route("/upload", get(api::get_upload))
        // Navigation
        .route("/navigate", post(api::navigate))
        .route("/browse/query", put(api::set_query))
        .route("/browse/category", put(api::set_category))
        // Submission form
        .route("/draft", patch(api::patch_draft))
        .route("/draft/submit", post(api::submit_draft))
        // Catalog
        .route("/catalog/refresh", post(api::refresh_catalog));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
