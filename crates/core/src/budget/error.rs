//! Budget error types.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::reports::ReportError;
use crate::workflow::BudgetStatus;

/// Budget-related errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    /// Month outside 1-12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    /// Year outside the supported range.
    #[error("Year {0} is outside the supported range 1-9999")]
    InvalidYear(i32),

    /// Amount cannot be negative.
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// Line items do not add up to the budget total.
    #[error("Budget items sum to {items_total} but the total is {total_amount}")]
    ItemsDoNotSumToTotal {
        /// Sum of the item amounts.
        items_total: Decimal,
        /// Budget total.
        total_amount: Decimal,
    },

    /// Only approved or rejected budgets can be revised.
    #[error("Cannot revise a {0} budget")]
    NotRevisable(BudgetStatus),

    /// An item could not be aggregated.
    #[error(transparent)]
    Aggregation(#[from] ReportError),
}

impl BudgetError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMonth(_) | Self::InvalidYear(_) => "INVALID_PERIOD",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::ItemsDoNotSumToTotal { .. } => "ITEMS_TOTAL_MISMATCH",
            Self::NotRevisable(_) => "NOT_REVISABLE",
            Self::Aggregation(e) => e.error_code(),
        }
    }
}

impl From<BudgetError> for buildcost_shared::AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::NotRevisable(_) => Self::Conflict(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
