//! Workflow error types for approval status changes.

use thiserror::Error;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// Attempted a status change that is not in the transition table.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: &'static str,
        /// The attempted target status.
        to: &'static str,
    },

    /// Rejection or cancellation without a reason.
    #[error("A reason is required to {action}")]
    ReasonRequired {
        /// The action that needs a reason.
        action: &'static str,
    },

    /// Amount edited after the cost left `pending`.
    #[error("Amount cannot be changed once a cost is {status}")]
    AmountLocked {
        /// The current status.
        status: &'static str,
    },
}

impl WorkflowError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ReasonRequired { .. } => "REASON_REQUIRED",
            Self::AmountLocked { .. } => "AMOUNT_LOCKED",
        }
    }
}

impl From<WorkflowError> for buildcost_shared::AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::InvalidTransition { .. } | WorkflowError::AmountLocked { .. } => {
                Self::Conflict(err.to_string())
            }
            WorkflowError::ReasonRequired { .. } => Self::Validation(err.to_string()),
        }
    }
}
