//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use buildcost_shared::types::ProjectId;

use super::period::{PeriodKind, PeriodLabel, PeriodSpec};
use super::variance::VarianceStatus;
use crate::records::{CostCategory, CostType};

/// What to report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ReportRequest {
    /// Project to report on.
    pub project_id: ProjectId,
    /// Month, quarter or year.
    pub kind: PeriodKind,
    /// Calendar year.
    pub reference_year: i32,
    /// Month (1-12), quarter (1-4), or 1 for a year.
    pub reference_period: u32,
}

impl ReportRequest {
    /// Monthly report request.
    #[must_use]
    pub const fn monthly(project_id: ProjectId, year: i32, month: u32) -> Self {
        Self {
            project_id,
            kind: PeriodKind::Month,
            reference_year: year,
            reference_period: month,
        }
    }

    /// Quarterly report request.
    #[must_use]
    pub const fn quarterly(project_id: ProjectId, year: i32, quarter: u32) -> Self {
        Self {
            project_id,
            kind: PeriodKind::Quarter,
            reference_year: year,
            reference_period: quarter,
        }
    }

    /// Yearly report request.
    #[must_use]
    pub const fn yearly(project_id: ProjectId, year: i32) -> Self {
        Self {
            project_id,
            kind: PeriodKind::Year,
            reference_year: year,
            reference_period: 1,
        }
    }
}

/// The period a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    /// Period kind.
    pub kind: PeriodKind,
    /// Calendar year.
    pub year: i32,
    /// Period number within the year.
    pub period: u32,
    /// First day (inclusive).
    pub start: NaiveDate,
    /// First day after the period (exclusive).
    pub end: NaiveDate,
}

impl From<&PeriodSpec> for PeriodSummary {
    fn from(spec: &PeriodSpec) -> Self {
        Self {
            kind: spec.kind(),
            year: spec.reference_year(),
            period: spec.reference_period(),
            start: spec.start(),
            end: spec.end(),
        }
    }
}

/// Severity of a budget alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Utilization reached the configured threshold.
    Medium,
    /// Budget exhausted, or spend recorded without a budget.
    High,
}

/// Warning attached to a report when spend approaches or exceeds the budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetAlert {
    /// Severity.
    pub severity: AlertSeverity,
    /// Utilization that triggered the alert; `None` when there is no budget.
    pub utilization_percent: Option<Decimal>,
    /// Human-readable message.
    pub message: String,
}

/// Budget-vs-actual report for one project and period.
///
/// Contains no timestamps or generated identifiers: the same inputs always
/// produce the same report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Project reported on.
    pub project_id: ProjectId,
    /// Label such as `2024-03`, `2024-Q1` or `2024`.
    pub period_label: PeriodLabel,
    /// Covered date range.
    pub period: PeriodSummary,
    /// Currency code of all amounts.
    pub currency: String,
    /// Approved and paid spend in the period.
    pub total_actual: Decimal,
    /// Effective approved budget for the period.
    pub total_budget: Decimal,
    /// `total_actual - total_budget`.
    pub variance: Decimal,
    /// Variance as a percentage of the budget; `None` when undefined.
    pub variance_percentage: Option<Decimal>,
    /// Actual as a percentage of the budget; `None` when undefined.
    pub utilization_percent: Option<Decimal>,
    /// Direction of the variance.
    pub variance_status: VarianceStatus,
    /// Actual spend per cost type. Every type is present.
    pub breakdown_by_type: BTreeMap<CostType, Decimal>,
    /// Actual spend per category. Only categories with spend are present.
    pub breakdown_by_category: BTreeMap<CostCategory, Decimal>,
    /// Actual spend per sub-period bucket.
    pub sub_period_trend: BTreeMap<PeriodLabel, Decimal>,
    /// Pending (not yet approved) spend in the period.
    pub projected_spend: Decimal,
    /// Number of costs counted in `total_actual`.
    pub cost_count: usize,
    /// Set when utilization reached the alert threshold.
    pub budget_alert: Option<BudgetAlert>,
}
