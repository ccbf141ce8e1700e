//! Cost record routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::app_error_response};
use buildcost_core::records::{CreateCostInput, UpdateCostAmountInput};
use buildcost_core::workflow::CostAction;
use buildcost_db::CostRepository;
use buildcost_shared::types::{CostId, ProjectId, UserId};

/// Creates the cost routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{project_id}/costs",
            get(list_costs).post(create_cost),
        )
        .route(
            "/costs/{cost_id}",
            get(get_cost).patch(update_cost_amount).delete(delete_cost),
        )
        .route("/costs/{cost_id}/approvals", get(list_cost_status_changes))
        .route("/costs/{cost_id}/{action}", post(transition_cost))
}

/// Optional payment-date bounds, both inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    /// First payment date included.
    pub from: Option<NaiveDate>,
    /// Last payment date included.
    pub to: Option<NaiveDate>,
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// User performing the change.
    pub actor_id: Uuid,
    /// Required for reject and cancel.
    #[serde(default, alias = "comment")]
    pub reason: Option<String>,
}

/// GET `/projects/{project_id}/costs?from=&to=`
async fn list_costs(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Query(range): Query<DateRangeQuery>,
) -> impl IntoResponse {
    let repo = CostRepository::new((*state.db).clone());

    match repo
        .list_for_project(ProjectId::from_uuid(project_id), range.from, range.to)
        .await
    {
        Ok(costs) => (StatusCode::OK, Json(json!({ "costs": costs }))).into_response(),
        Err(e) => app_error_response(e, "Failed to list costs"),
    }
}

/// POST `/projects/{project_id}/costs` - Record a new pending cost.
async fn create_cost(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreateCostInput>,
) -> impl IntoResponse {
    let repo = CostRepository::new((*state.db).clone());

    match repo.create(ProjectId::from_uuid(project_id), payload).await {
        Ok(cost) => (StatusCode::CREATED, Json(cost)).into_response(),
        Err(e) => app_error_response(e, "Failed to create cost"),
    }
}

/// GET `/costs/{cost_id}`
async fn get_cost(State(state): State<AppState>, Path(cost_id): Path<Uuid>) -> impl IntoResponse {
    let repo = CostRepository::new((*state.db).clone());

    match repo.find_by_id(CostId::from_uuid(cost_id)).await {
        Ok(cost) => (StatusCode::OK, Json(cost)).into_response(),
        Err(e) => app_error_response(e, "Failed to get cost"),
    }
}

/// PATCH `/costs/{cost_id}` - Correct the amount of a pending cost.
async fn update_cost_amount(
    State(state): State<AppState>,
    Path(cost_id): Path<Uuid>,
    Json(payload): Json<UpdateCostAmountInput>,
) -> impl IntoResponse {
    let repo = CostRepository::new((*state.db).clone());

    match repo
        .update_amount(CostId::from_uuid(cost_id), payload.amount)
        .await
    {
        Ok(cost) => (StatusCode::OK, Json(cost)).into_response(),
        Err(e) => app_error_response(e, "Failed to update cost amount"),
    }
}

/// GET `/costs/{cost_id}/approvals` - Status history, oldest first.
async fn list_cost_status_changes(
    State(state): State<AppState>,
    Path(cost_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CostRepository::new((*state.db).clone());

    match repo.status_history(CostId::from_uuid(cost_id)).await {
        Ok(changes) => (StatusCode::OK, Json(json!({ "approvals": changes }))).into_response(),
        Err(e) => app_error_response(e, "Failed to list cost status changes"),
    }
}

/// DELETE `/costs/{cost_id}` - Soft-delete a cost.
async fn delete_cost(
    State(state): State<AppState>,
    Path(cost_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CostRepository::new((*state.db).clone());

    match repo.soft_delete(CostId::from_uuid(cost_id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => app_error_response(e, "Failed to delete cost"),
    }
}

/// POST `/costs/{cost_id}/{action}` - approve, pay, reject or cancel.
async fn transition_cost(
    State(state): State<AppState>,
    Path((cost_id, action)): Path<(Uuid, CostAction)>,
    Json(payload): Json<TransitionRequest>,
) -> impl IntoResponse {
    let repo = CostRepository::new((*state.db).clone());

    match repo
        .transition(
            CostId::from_uuid(cost_id),
            action,
            UserId::from_uuid(payload.actor_id),
            payload.reason,
        )
        .await
    {
        Ok(cost) => {
            info!(cost_id = %cost_id, status = %cost.status, "Cost status changed");
            (StatusCode::OK, Json(cost)).into_response()
        }
        Err(e) => app_error_response(e, "Failed to change cost status"),
    }
}
