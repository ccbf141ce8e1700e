//! Financial report routes.
//!
//! Reports are computed on request from the project's costs and budgets;
//! nothing is cached or persisted.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::{AppState, error::app_error_response};
use buildcost_core::reports::{PeriodSpec, ReportRequest, ReportService};
use buildcost_db::{BudgetRepository, CostRepository};
use buildcost_shared::types::ProjectId;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{project_id}/reports/monthly",
            get(get_monthly_report),
        )
        .route(
            "/projects/{project_id}/reports/quarterly",
            get(get_quarterly_report),
        )
        .route(
            "/projects/{project_id}/reports/yearly",
            get(get_yearly_report),
        )
}

/// Query for a monthly report.
#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    /// Calendar year.
    pub year: i32,
    /// Month (1-12).
    pub month: u32,
}

/// Query for a quarterly report.
#[derive(Debug, Deserialize)]
pub struct QuarterlyQuery {
    /// Calendar year.
    pub year: i32,
    /// Quarter (1-4).
    pub quarter: u32,
}

/// Query for a yearly report.
#[derive(Debug, Deserialize)]
pub struct YearlyQuery {
    /// Calendar year.
    pub year: i32,
}

/// GET `/projects/{project_id}/reports/monthly?year=&month=`
async fn get_monthly_report(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<MonthlyQuery>,
) -> impl IntoResponse {
    let request = ReportRequest::monthly(ProjectId::from_uuid(project_id), query.year, query.month);
    generate(&state, &request).await
}

/// GET `/projects/{project_id}/reports/quarterly?year=&quarter=`
async fn get_quarterly_report(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<QuarterlyQuery>,
) -> impl IntoResponse {
    let request =
        ReportRequest::quarterly(ProjectId::from_uuid(project_id), query.year, query.quarter);
    generate(&state, &request).await
}

/// GET `/projects/{project_id}/reports/yearly?year=`
async fn get_yearly_report(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<YearlyQuery>,
) -> impl IntoResponse {
    let request = ReportRequest::yearly(ProjectId::from_uuid(project_id), query.year);
    generate(&state, &request).await
}

async fn generate(state: &AppState, request: &ReportRequest) -> Response {
    // Reject bad periods before touching the database.
    let spec = match PeriodSpec::new(
        request.kind,
        request.reference_year,
        request.reference_period,
    ) {
        Ok(spec) => spec,
        Err(e) => return app_error_response(e, "Invalid report period"),
    };

    let cost_repo = CostRepository::new((*state.db).clone());
    let costs = match cost_repo.list_for_period(request.project_id, &spec).await {
        Ok(costs) => costs,
        Err(e) => return app_error_response(e, "Failed to load costs"),
    };

    let budget_repo = BudgetRepository::new((*state.db).clone());
    let budgets = match budget_repo
        .list_for_year(request.project_id, request.reference_year)
        .await
    {
        Ok(budgets) => budgets,
        Err(e) => return app_error_response(e, "Failed to load budgets"),
    };

    match ReportService::build_report(request, &costs, &budgets, &state.reporting) {
        Ok(report) => {
            debug!(
                project_id = %request.project_id,
                period = %report.period_label,
                costs = costs.len(),
                budgets = budgets.len(),
                "Report assembled"
            );
            Json(report).into_response()
        }
        Err(e) => app_error_response(e, "Failed to build report"),
    }
}
