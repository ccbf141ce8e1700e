//! Core business logic for BuildCost.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `records` - Costs, budget items and their classification
//! - `workflow` - Approval state machines for costs and budgets
//! - `budget` - Budget periods, versions and item checks
//! - `reports` - Aggregation, period bucketing, variance and report assembly
//! - `statistics` - Cost and budget statistics

pub mod budget;
pub mod records;
pub mod reports;
pub mod statistics;
pub mod workflow;
