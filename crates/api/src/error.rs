//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use buildcost_shared::AppError;

/// Builds a `{ "error", "message" }` response.
pub fn error_response(status: StatusCode, error: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": error,
            "message": message
        })),
    )
        .into_response()
}

/// Maps a domain error to its HTTP response.
///
/// Server-side failures are logged under `context` and their details
/// withheld from the client.
pub fn app_error_response(err: impl Into<AppError>, context: &str) -> Response {
    let err = err.into();
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if err.is_client_error() {
        error_response(status, &err.error_code().to_lowercase(), &err.to_string())
    } else {
        error!(error = %err, "{context}");
        error_response(status, "internal_error", "An error occurred")
    }
}
