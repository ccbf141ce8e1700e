//! Budget versions, periods and item checks.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{
    Budget, BudgetPeriod, CreateBudgetInput, CreateBudgetItemInput, ReviseBudgetInput,
};
