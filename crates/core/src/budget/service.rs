//! Budget service: input validation, version selection and item checks.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use buildcost_shared::types::ProjectId;

use super::error::BudgetError;
use super::types::{Budget, BudgetPeriod, CreateBudgetInput};
use crate::reports::aggregate::sum_amounts;
use crate::reports::period::PeriodSpec;
use crate::workflow::BudgetStatus;

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Validates a new budget (or revision) and returns its period.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidMonth` / `BudgetError::InvalidYear` for a
    /// bad period, `BudgetError::NegativeAmount` for a negative total or item,
    /// and `BudgetError::ItemsDoNotSumToTotal` when items are given and do not
    /// add up to the total.
    pub fn validate_new_budget(input: &CreateBudgetInput) -> Result<BudgetPeriod, BudgetError> {
        let period = BudgetPeriod::new(input.year, input.month)?;

        if input.total_amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount(input.total_amount));
        }
        if let Some(item) = input.items.iter().find(|i| i.amount < Decimal::ZERO) {
            return Err(BudgetError::NegativeAmount(item.amount));
        }

        if !input.items.is_empty() {
            let items_total: Decimal = input.items.iter().map(|i| i.amount).sum();
            if items_total != input.total_amount {
                return Err(BudgetError::ItemsDoNotSumToTotal {
                    items_total,
                    total_amount: input.total_amount,
                });
            }
        }

        Ok(period)
    }

    /// Checks that a stored budget's items add up to its total.
    ///
    /// A budget without items passes.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::ItemsDoNotSumToTotal` on a mismatch and
    /// `BudgetError::Aggregation` if an item has no amount.
    pub fn verify_items(budget: &Budget) -> Result<(), BudgetError> {
        if budget.items.is_empty() {
            return Ok(());
        }

        let items_total = sum_amounts(&budget.items)?;
        if items_total != budget.total_amount {
            return Err(BudgetError::ItemsDoNotSumToTotal {
                items_total,
                total_amount: budget.total_amount,
            });
        }
        Ok(())
    }

    /// Picks the latest approved version for every project and period.
    ///
    /// Drafts, pending, rejected and cancelled versions are ignored even
    /// when they are newer.
    pub fn effective_budgets(budgets: &[Budget]) -> Vec<&Budget> {
        let mut latest: BTreeMap<(ProjectId, BudgetPeriod), &Budget> = BTreeMap::new();

        for budget in budgets.iter().filter(|b| b.status == BudgetStatus::Approved) {
            latest
                .entry((budget.project_id, budget.period))
                .and_modify(|current| {
                    if budget.version > current.version {
                        *current = budget;
                    }
                })
                .or_insert(budget);
        }

        latest.into_values().collect()
    }

    /// Effective budgets of `project_id` that count toward a report over `spec`.
    pub fn budgets_for_period<'a>(
        budgets: &'a [Budget],
        project_id: ProjectId,
        spec: &PeriodSpec,
    ) -> Vec<&'a Budget> {
        Self::effective_budgets(budgets)
            .into_iter()
            .filter(|b| b.project_id == project_id && b.period.falls_within(spec))
            .collect()
    }

    /// Total budgeted amount for a report over `spec`.
    pub fn total_for_period(budgets: &[Budget], project_id: ProjectId, spec: &PeriodSpec) -> Decimal {
        Self::budgets_for_period(budgets, project_id, spec)
            .iter()
            .map(|b| b.total_amount)
            .sum()
    }

    /// Checks that a budget may be revised.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotRevisable` unless the budget is approved or
    /// rejected.
    pub fn ensure_revisable(status: BudgetStatus) -> Result<(), BudgetError> {
        match status {
            BudgetStatus::Approved | BudgetStatus::Rejected => Ok(()),
            other => Err(BudgetError::NotRevisable(other)),
        }
    }

    /// Version number for the next revision among `existing` versions of the
    /// same project and period.
    pub fn next_version(existing: &[Budget]) -> i32 {
        existing.iter().map(|b| b.version).max().unwrap_or(0) + 1
    }
}
