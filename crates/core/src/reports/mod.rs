//! Budget-vs-actual reporting.
//!
//! - [`aggregate`] groups records by a key and sums their amounts
//! - [`period`] resolves month, quarter and year periods and buckets records into them
//! - [`variance`] compares actual spend to a budget
//! - [`service`] assembles the three into a [`Report`]

pub mod aggregate;
pub mod error;
pub mod period;
pub mod service;
pub mod types;
pub mod variance;

#[cfg(test)]
mod tests;

pub use aggregate::{aggregate, count_by, sum_amounts};
pub use error::ReportError;
pub use period::{PeriodKind, PeriodLabel, PeriodSpec, bucket_by_period, next_month};
pub use service::ReportService;
pub use types::{AlertSeverity, BudgetAlert, PeriodSummary, Report, ReportRequest};
pub use variance::{VarianceResult, VarianceStatus, compute_variance};
