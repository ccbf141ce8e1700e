//! Approval workflow for costs and budgets.
//!
//! Status fields are never assigned directly: every change goes through
//! [`WorkflowService`], which checks it against the status's transition
//! table.
//!
//! # Modules
//!
//! - `types` - Status enumerations and the `Lifecycle` transition table
//! - `error` - Workflow-specific error types
//! - `service` - Transition validation with audit data

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use service::WorkflowService;
pub use types::{BudgetAction, BudgetStatus, CostAction, Lifecycle, PaymentStatus, StatusChange};
