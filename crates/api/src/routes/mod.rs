//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod budgets;
pub mod costs;
pub mod health;
pub mod reports;
pub mod statistics;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(reports::routes())
        .merge(costs::routes())
        .merge(budgets::routes())
        .merge(statistics::routes())
}
