//! Cost and budget statistics.
//!
//! Both views are thin key functions over [`crate::reports::aggregate`].

use chrono::Datelike;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::types::{BudgetStatistics, CostStatistics, StatusBucket, UNASSIGNED, UNDATED};
use crate::budget::{Budget, BudgetService};
use crate::records::{CostRecord, CostType};
use crate::reports::{PeriodLabel, ReportError, aggregate, count_by, sum_amounts};
use crate::workflow::{BudgetStatus, PaymentStatus};

/// Stateless service computing statistics.
pub struct StatisticsService;

impl StatisticsService {
    /// Cost statistics over `costs`. Deleted costs are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidRecord` if an approved, paid or pending
    /// cost has no amount.
    pub fn cost_statistics(costs: &[CostRecord]) -> Result<CostStatistics, ReportError> {
        let live: Vec<&CostRecord> = costs.iter().filter(|c| !c.is_deleted).collect();
        let spent: Vec<&CostRecord> = live
            .iter()
            .copied()
            .filter(|c| c.status.counts_as_approved_spend())
            .collect();
        let pending = live
            .iter()
            .copied()
            .filter(|c| c.status.counts_as_projected_spend());

        let mut by_type: BTreeMap<CostType, Decimal> =
            CostType::ALL.into_iter().map(|t| (t, Decimal::ZERO)).collect();
        by_type.extend(aggregate(spent.iter().copied(), |c| c.cost_type)?);

        let mut by_status: BTreeMap<PaymentStatus, StatusBucket> = PaymentStatus::ALL
            .into_iter()
            .map(|s| (s, StatusBucket::default()))
            .collect();
        for (status, count) in count_by(live.iter().copied(), |c| c.status) {
            by_status.entry(status).or_default().count = count;
        }
        let with_amount = live.iter().copied().filter(|c| c.amount.is_some());
        for (status, amount) in aggregate(with_amount, |c| c.status)? {
            by_status.entry(status).or_default().amount = amount;
        }

        Ok(CostStatistics {
            total_amount: sum_amounts(spent.iter().copied())?,
            projected_amount: sum_amounts(pending)?,
            count: live.len() as u64,
            by_type,
            by_category: aggregate(spent.iter().copied(), |c| c.category)?,
            by_status,
            by_department: aggregate(spent.iter().copied(), |c| {
                c.department_id
                    .map_or_else(|| UNASSIGNED.to_string(), |d| d.to_string())
            })?,
            by_vendor: aggregate(spent.iter().copied(), |c| {
                c.vendor_id
                    .map_or_else(|| UNASSIGNED.to_string(), |v| v.to_string())
            })?,
            by_month: aggregate(spent.iter().copied(), month_key)?,
        })
    }

    /// Budget statistics over all versions in `budgets`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidRecord` if an item of an effective budget
    /// has no amount.
    pub fn budget_statistics(budgets: &[Budget]) -> Result<BudgetStatistics, ReportError> {
        let effective = BudgetService::effective_budgets(budgets);

        let mut by_status: BTreeMap<BudgetStatus, u64> =
            BudgetStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        by_status.extend(count_by(budgets, |b| b.status));

        let items = effective.iter().flat_map(|b| b.items.iter());
        let by_cost_type = aggregate(items, |i| i.cost_type)?;

        let mut by_period: BTreeMap<String, Decimal> = BTreeMap::new();
        for budget in &effective {
            *by_period.entry(budget.period.to_string()).or_insert(Decimal::ZERO) +=
                budget.total_amount;
        }

        Ok(BudgetStatistics {
            total_budgets: budgets.len() as u64,
            total_amount: effective.iter().map(|b| b.total_amount).sum(),
            by_status,
            by_cost_type,
            by_period,
        })
    }
}

fn month_key(cost: &CostRecord) -> String {
    cost.payment_date.map_or_else(
        || UNDATED.to_string(),
        |at| {
            PeriodLabel::Month {
                year: at.year(),
                month: at.month(),
            }
            .to_string()
        },
    )
}
