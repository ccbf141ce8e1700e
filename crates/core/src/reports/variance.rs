//! Budget-vs-actual variance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of the variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    /// Actual spend exceeds the budget.
    OverBudget,
    /// Actual spend is below the budget.
    UnderBudget,
    /// Actual spend equals the budget.
    OnBudget,
}

/// Actual vs budget comparison for one project and period.
///
/// `percentage` and `utilization_percent` are `None` when the budget is zero
/// and spend is not: the ratio is undefined and callers have to present that
/// case explicitly. They are also `None` when a non-zero budget is so small
/// next to the spend that the percentage leaves the decimal range; check
/// `budget.is_zero()` to tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceResult {
    /// Actual spend.
    pub actual: Decimal,
    /// Budgeted amount.
    pub budget: Decimal,
    /// `actual - budget`. Positive means overspent.
    pub absolute: Decimal,
    /// `absolute / budget * 100`, rounded to 2 decimal places.
    pub percentage: Option<Decimal>,
    /// `actual / budget * 100`, rounded to 2 decimal places.
    pub utilization_percent: Option<Decimal>,
    /// Direction of the variance.
    pub status: VarianceStatus,
}

impl VarianceResult {
    /// Returns true if the percentage could not be computed.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        self.percentage.is_none()
    }
}

/// Compares actual spend to a budget.
///
/// - `budget != 0`: percentage is `(actual - budget) / budget * 100`
/// - `budget == 0, actual == 0`: percentage is `0`
/// - `budget == 0, actual != 0`: percentage is undefined
/// - percentage beyond the decimal range: also `None`
#[must_use]
pub fn compute_variance(actual: Decimal, budget: Decimal) -> VarianceResult {
    let absolute = actual - budget;

    let (percentage, utilization_percent) = if budget.is_zero() {
        if actual.is_zero() {
            (Some(Decimal::ZERO), Some(Decimal::ZERO))
        } else {
            (None, None)
        }
    } else {
        (percent_of(absolute, budget), percent_of(actual, budget))
    };

    let status = if absolute.is_zero() {
        VarianceStatus::OnBudget
    } else if absolute.is_sign_positive() {
        VarianceStatus::OverBudget
    } else {
        VarianceStatus::UnderBudget
    };

    VarianceResult {
        actual,
        budget,
        absolute,
        percentage,
        utilization_percent,
        status,
    }
}

fn percent_of(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    numerator
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|p| p.round_dp(2).normalize())
}
