//! Record validation errors.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{CostCategory, CostType};

/// Errors raised when a record is rejected at input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// Amount cannot be negative.
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// A new cost must carry its payment date.
    #[error("Payment date is required")]
    MissingDate,

    /// Category is not nested under the given cost type.
    #[error("Category {category} does not belong to cost type {cost_type}")]
    CategoryMismatch {
        /// Submitted category.
        category: CostCategory,
        /// Submitted cost type.
        cost_type: CostType,
    },
}

impl From<RecordError> for buildcost_shared::AppError {
    fn from(err: RecordError) -> Self {
        Self::Validation(err.to_string())
    }
}
