//! Statistics result types.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::records::{CostCategory, CostType};
use crate::workflow::{BudgetStatus, PaymentStatus};

/// Key used for costs without a department or vendor.
pub const UNASSIGNED: &str = "unassigned";
/// Key used for costs without a payment date.
pub const UNDATED: &str = "undated";

/// Per-status count and amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusBucket {
    /// Number of costs.
    pub count: u64,
    /// Sum of their amounts.
    pub amount: Decimal,
}

/// Cost statistics for a project.
///
/// Amount breakdowns only include approved and paid costs, so that they sum
/// to `total_amount`. `by_status` covers every live cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostStatistics {
    /// Approved and paid spend.
    pub total_amount: Decimal,
    /// Pending spend.
    pub projected_amount: Decimal,
    /// Number of live (not deleted) costs.
    pub count: u64,
    /// Spend per cost type. Every type is present.
    pub by_type: BTreeMap<CostType, Decimal>,
    /// Spend per category with any spend.
    pub by_category: BTreeMap<CostCategory, Decimal>,
    /// Count and amount per payment status. Every status is present.
    pub by_status: BTreeMap<PaymentStatus, StatusBucket>,
    /// Spend per department ID, `unassigned` for none.
    pub by_department: BTreeMap<String, Decimal>,
    /// Spend per vendor ID, `unassigned` for none.
    pub by_vendor: BTreeMap<String, Decimal>,
    /// Spend per `YYYY-MM`, `undated` for none.
    pub by_month: BTreeMap<String, Decimal>,
}

/// Budget statistics for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetStatistics {
    /// Number of budget versions of any status.
    pub total_budgets: u64,
    /// Sum of the effective (latest approved) budgets.
    pub total_amount: Decimal,
    /// Number of versions per status. Every status is present.
    pub by_status: BTreeMap<BudgetStatus, u64>,
    /// Effective item allocations per cost type.
    pub by_cost_type: BTreeMap<CostType, Decimal>,
    /// Effective budget per period label (`YYYY-MM` or `YYYY`).
    pub by_period: BTreeMap<String, Decimal>,
}
