//! Cost and budget statistics routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use super::costs::DateRangeQuery;
use crate::{AppState, error::app_error_response};
use buildcost_core::statistics::StatisticsService;
use buildcost_db::{BudgetRepository, CostRepository};
use buildcost_shared::AppError;
use buildcost_shared::types::ProjectId;

/// Creates the statistics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{project_id}/costs/statistics",
            get(get_cost_statistics),
        )
        .route(
            "/projects/{project_id}/budgets/statistics",
            get(get_budget_statistics),
        )
}

/// GET `/projects/{project_id}/costs/statistics?from=&to=`
async fn get_cost_statistics(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Query(range): Query<DateRangeQuery>,
) -> impl IntoResponse {
    if let (Some(from), Some(to)) = (range.from, range.to)
        && from > to
    {
        return app_error_response(
            AppError::Validation(format!("from ({from}) is after to ({to})")),
            "Invalid date range",
        );
    }

    let repo = CostRepository::new((*state.db).clone());
    let costs = match repo
        .list_for_project(ProjectId::from_uuid(project_id), range.from, range.to)
        .await
    {
        Ok(costs) => costs,
        Err(e) => return app_error_response(e, "Failed to load costs"),
    };

    match StatisticsService::cost_statistics(&costs) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => app_error_response(e, "Failed to compute cost statistics"),
    }
}

/// GET `/projects/{project_id}/budgets/statistics`
async fn get_budget_statistics(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());
    let budgets = match repo.list_for_project(ProjectId::from_uuid(project_id)).await {
        Ok(budgets) => budgets,
        Err(e) => return app_error_response(e, "Failed to load budgets"),
    };

    match StatisticsService::budget_statistics(&budgets) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => app_error_response(e, "Failed to compute budget statistics"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    use crate::create_router;
    use crate::test_support::{disconnected_state, json_body};

    #[tokio::test]
    async fn test_reversed_range_is_rejected() {
        let app = create_router(disconnected_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri(
                        "/api/v1/projects/0191e1c2-7a4b-7c3d-8e5f-6a7b8c9d0e1f/costs/statistics\
                         ?from=2024-06-01&to=2024-01-31",
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_malformed_date_is_rejected() {
        let app = create_router(disconnected_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri(
                        "/api/v1/projects/0191e1c2-7a4b-7c3d-8e5f-6a7b8c9d0e1f/costs/statistics\
                         ?from=2024-13-01",
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
