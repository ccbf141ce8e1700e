//! Input validation for new financial records.

use rust_decimal::Decimal;

use super::error::RecordError;
use super::types::{CostCategory, CostType, CreateCostInput};

/// Rejects negative amounts.
pub fn validate_amount(amount: Decimal) -> Result<(), RecordError> {
    if amount < Decimal::ZERO {
        return Err(RecordError::NegativeAmount(amount));
    }
    Ok(())
}

/// Rejects a category that is not nested under `cost_type`.
pub fn validate_category(cost_type: CostType, category: CostCategory) -> Result<(), RecordError> {
    if category.cost_type() != cost_type {
        return Err(RecordError::CategoryMismatch {
            category,
            cost_type,
        });
    }
    Ok(())
}

/// Validates a cost before it is stored.
///
/// Undated costs are rejected here; reports select costs by payment date.
pub fn validate_new_cost(input: &CreateCostInput) -> Result<(), RecordError> {
    if input.payment_date.is_none() {
        return Err(RecordError::MissingDate);
    }
    validate_amount(input.amount)?;
    validate_category(input.cost_type, input.category)
}
