//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for costs, budgets, reports and statistics
//! - Mapping of domain errors to JSON error responses

pub mod error;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use buildcost_shared::ReportingConfig;

/// Application state shared across handlers.
///
/// Built once at process start and cloned into every request.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Report currency and alert threshold.
    pub reporting: Arc<ReportingConfig>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
