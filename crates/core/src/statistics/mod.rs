//! Cost and budget statistics.

pub mod service;
pub mod types;

pub use service::StatisticsService;
pub use types::{BudgetStatistics, CostStatistics, StatusBucket};
