//! Financial records: costs and budget line items.

pub mod error;
pub mod types;
pub mod validation;

pub use error::RecordError;
pub use types::{
    BudgetItemRecord, CostCategory, CostRecord, CostType, CreateCostInput, DatedRecord,
    FinancialRecord, UpdateCostAmountInput,
};
pub use validation::{validate_amount, validate_category, validate_new_cost};
