//! Budget routes.
//!
//! Budgets are versioned per project and period. A revision never edits a
//! version in place; it creates the next draft version.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::costs::TransitionRequest;
use crate::{AppState, error::app_error_response};
use buildcost_core::budget::{CreateBudgetInput, ReviseBudgetInput};
use buildcost_core::workflow::BudgetAction;
use buildcost_db::BudgetRepository;
use buildcost_shared::types::{BudgetId, ProjectId, UserId};

/// Creates the budget routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{project_id}/budgets",
            get(list_budgets).post(create_budget),
        )
        .route("/budgets/{budget_id}", get(get_budget))
        .route("/budgets/{budget_id}/revise", post(revise_budget))
        .route(
            "/budgets/{budget_id}/approvals",
            get(list_budget_status_changes),
        )
        .route("/budgets/{budget_id}/{action}", post(transition_budget))
}

/// GET `/projects/{project_id}/budgets` - All versions, oldest period first.
async fn list_budgets(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());

    match repo.list_for_project(ProjectId::from_uuid(project_id)).await {
        Ok(budgets) => (StatusCode::OK, Json(json!({ "budgets": budgets }))).into_response(),
        Err(e) => app_error_response(e, "Failed to list budgets"),
    }
}

/// POST `/projects/{project_id}/budgets` - Create a draft budget.
async fn create_budget(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreateBudgetInput>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());

    match repo.create(ProjectId::from_uuid(project_id), payload).await {
        Ok(budget) => (StatusCode::CREATED, Json(budget)).into_response(),
        Err(e) => app_error_response(e, "Failed to create budget"),
    }
}

/// GET `/budgets/{budget_id}`
async fn get_budget(
    State(state): State<AppState>,
    Path(budget_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());

    match repo.find_by_id(BudgetId::from_uuid(budget_id)).await {
        Ok(budget) => (StatusCode::OK, Json(budget)).into_response(),
        Err(e) => app_error_response(e, "Failed to get budget"),
    }
}

/// POST `/budgets/{budget_id}/revise` - Create the next draft version.
async fn revise_budget(
    State(state): State<AppState>,
    Path(budget_id): Path<Uuid>,
    Json(payload): Json<ReviseBudgetInput>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());

    match repo.revise(BudgetId::from_uuid(budget_id), payload).await {
        Ok(budget) => (StatusCode::CREATED, Json(budget)).into_response(),
        Err(e) => app_error_response(e, "Failed to revise budget"),
    }
}

/// GET `/budgets/{budget_id}/approvals` - Status history, oldest first.
async fn list_budget_status_changes(
    State(state): State<AppState>,
    Path(budget_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());

    match repo.status_history(BudgetId::from_uuid(budget_id)).await {
        Ok(changes) => (StatusCode::OK, Json(json!({ "approvals": changes }))).into_response(),
        Err(e) => app_error_response(e, "Failed to list budget status changes"),
    }
}

/// POST `/budgets/{budget_id}/{action}` - submit, approve, reject or cancel.
async fn transition_budget(
    State(state): State<AppState>,
    Path((budget_id, action)): Path<(Uuid, BudgetAction)>,
    Json(payload): Json<TransitionRequest>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());

    match repo
        .transition(
            BudgetId::from_uuid(budget_id),
            action,
            UserId::from_uuid(payload.actor_id),
            payload.reason,
        )
        .await
    {
        Ok(budget) => {
            info!(budget_id = %budget_id, status = %budget.status, "Budget status changed");
            (StatusCode::OK, Json(budget)).into_response()
        }
        Err(e) => app_error_response(e, "Failed to change budget status"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, http::StatusCode};
    use rstest::rstest;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::create_router;
    use crate::test_support::{disconnected_state, json_body};

    const PROJECT: &str = "0191e1c2-7a4b-7c3d-8e5f-6a7b8c9d0e1f";

    fn post_json(uri: String, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_items_must_sum_to_total() {
        let app = create_router(disconnected_state());
        let body = json!({
            "year": 2024,
            "month": 3,
            "total_amount": "1000.00",
            "items": [
                { "cost_type": "labor", "subcategory": "crew", "amount": "600.00" },
                { "cost_type": "material", "subcategory": "rebar", "amount": "300.00" }
            ]
        });

        let response = app
            .oneshot(post_json(format!("/api/v1/projects/{PROJECT}/budgets"), &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "validation_error");
    }

    #[rstest]
    #[case::month_thirteen(json!({ "year": 2024, "month": 13, "total_amount": "1" }))]
    #[case::negative_total(json!({ "year": 2024, "month": 1, "total_amount": "-1" }))]
    #[case::year_zero(json!({ "year": 0, "total_amount": "1" }))]
    #[tokio::test]
    async fn test_invalid_budget_is_rejected(#[case] body: serde_json::Value) {
        let app = create_router(disconnected_state());

        let response = app
            .oneshot(post_json(format!("/api/v1/projects/{PROJECT}/budgets"), &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_action_is_rejected() {
        let app = create_router(disconnected_state());
        let body = json!({ "actor_id": PROJECT });

        let response = app
            .oneshot(post_json(format!("/api/v1/budgets/{PROJECT}/lock"), &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
