//! Budget domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use buildcost_shared::types::{BudgetId, ProjectId};

use super::error::BudgetError;
use crate::records::{BudgetItemRecord, CostType};
use crate::reports::period::{MAX_YEAR, MIN_YEAR, PeriodKind, PeriodLabel, PeriodSpec};
use crate::workflow::BudgetStatus;

/// The period a budget covers: a calendar month, or a whole year when
/// `month` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BudgetPeriod {
    /// Calendar year.
    pub year: i32,
    /// Month 1-12, or `None` for an annual budget.
    pub month: Option<u32>,
}

impl BudgetPeriod {
    /// Builds a validated budget period.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidYear` or `BudgetError::InvalidMonth` for
    /// values outside the calendar.
    pub fn new(year: i32, month: Option<u32>) -> Result<Self, BudgetError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(BudgetError::InvalidYear(year));
        }
        if let Some(m) = month
            && !(1..=12).contains(&m)
        {
            return Err(BudgetError::InvalidMonth(m));
        }
        Ok(Self { year, month })
    }

    /// Returns true for an annual budget.
    #[must_use]
    pub const fn is_annual(&self) -> bool {
        self.month.is_none()
    }

    /// Bucket label of the period.
    #[must_use]
    pub const fn label(&self) -> PeriodLabel {
        match self.month {
            Some(month) => PeriodLabel::Month {
                year: self.year,
                month,
            },
            None => PeriodLabel::Year(self.year),
        }
    }

    /// Returns true if this budget counts toward a report over `spec`.
    ///
    /// A monthly budget counts when its month lies inside the report period.
    /// An annual budget only counts toward a report for that whole year.
    #[must_use]
    pub fn falls_within(&self, spec: &PeriodSpec) -> bool {
        match self.month {
            Some(month) => spec.contains_month(self.year, month),
            None => spec.kind() == PeriodKind::Year && spec.reference_year() == self.year,
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One version of a project budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Covered period.
    pub period: BudgetPeriod,
    /// Total budgeted amount.
    pub total_amount: Decimal,
    /// Review status.
    pub status: BudgetStatus,
    /// Version number, starting at 1 and incremented on each revision.
    pub version: i32,
    /// Line items; their amounts should sum to `total_amount`.
    pub items: Vec<BudgetItemRecord>,
}

/// Input for a budget line item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBudgetItemInput {
    /// Cost type of the allocation.
    pub cost_type: CostType,
    /// Free-text line label.
    pub subcategory: String,
    /// Allocated amount.
    pub amount: Decimal,
}

/// Input for creating a budget (or a revision of one).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBudgetInput {
    /// Calendar year.
    pub year: i32,
    /// Month, or `None` for an annual budget.
    pub month: Option<u32>,
    /// Total budgeted amount.
    pub total_amount: Decimal,
    /// Optional description.
    pub description: Option<String>,
    /// Line items. May be empty; when present they must sum to the total.
    #[serde(default)]
    pub items: Vec<CreateBudgetItemInput>,
}

/// Input for revising a budget. The period is taken from the revised version.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviseBudgetInput {
    /// New total.
    pub total_amount: Decimal,
    /// Optional description.
    pub description: Option<String>,
    /// New line items.
    #[serde(default)]
    pub items: Vec<CreateBudgetItemInput>,
}

impl ReviseBudgetInput {
    /// Turns the revision into a creation input for `period`.
    #[must_use]
    pub fn into_create(self, period: BudgetPeriod) -> CreateBudgetInput {
        CreateBudgetInput {
            year: period.year,
            month: period.month,
            total_amount: self.total_amount,
            description: self.description,
            items: self.items,
        }
    }
}
