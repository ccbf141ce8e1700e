//! Report assembly.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use buildcost_shared::ReportingConfig;

use super::aggregate::{aggregate, sum_amounts};
use super::error::ReportError;
use super::period::{PeriodSpec, bucket_within};
use super::types::{AlertSeverity, BudgetAlert, PeriodSummary, Report, ReportRequest};
use super::variance::{VarianceResult, compute_variance};
use crate::budget::{Budget, BudgetService};
use crate::records::{CostRecord, CostType};

/// Service for building budget-vs-actual reports.
pub struct ReportService;

impl ReportService {
    /// Builds a report from the project's costs and budgets.
    ///
    /// `costs` and `budgets` may contain records of other projects, deleted
    /// costs and costs outside the period; they are filtered out here.
    /// Approved and paid costs count as actual spend, pending costs as
    /// projected spend, and the latest approved budget version per period
    /// as the budget.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidPeriod` or `ReportError::InvalidYear` for
    /// a bad request, and `ReportError::InvalidRecord` if a counted cost has
    /// no payment date or no amount.
    pub fn build_report(
        request: &ReportRequest,
        costs: &[CostRecord],
        budgets: &[Budget],
        config: &ReportingConfig,
    ) -> Result<Report, ReportError> {
        let spec = PeriodSpec::new(request.kind, request.reference_year, request.reference_period)?;

        let live: Vec<&CostRecord> = costs
            .iter()
            .filter(|c| c.project_id == request.project_id && !c.is_deleted)
            .collect();
        let approved: Vec<&CostRecord> = live
            .iter()
            .copied()
            .filter(|c| c.status.counts_as_approved_spend())
            .collect();
        let pending: Vec<&CostRecord> = live
            .iter()
            .copied()
            .filter(|c| c.status.counts_as_projected_spend())
            .collect();

        let actual = in_period(&approved, &spec)?;
        let total_actual = sum_amounts(actual.iter().copied())?;
        let projected_spend = sum_amounts(in_period(&pending, &spec)?)?;

        let mut breakdown_by_type: BTreeMap<CostType, Decimal> =
            CostType::ALL.into_iter().map(|t| (t, Decimal::ZERO)).collect();
        breakdown_by_type.extend(aggregate(actual.iter().copied(), |c| c.cost_type)?);
        let breakdown_by_category = aggregate(actual.iter().copied(), |c| c.category)?;

        let sub_period_trend = bucket_within(&spec, actual.iter().copied())?
            .into_iter()
            .map(|(label, members)| Ok((label, sum_amounts(members)?)))
            .collect::<Result<BTreeMap<_, _>, ReportError>>()?;

        let total_budget = BudgetService::total_for_period(budgets, request.project_id, &spec);
        let variance = compute_variance(total_actual, total_budget);
        let budget_alert = Self::budget_alert(&variance, config.budget_alert_threshold_percent);

        Ok(Report {
            project_id: request.project_id,
            period_label: spec.label(),
            period: PeriodSummary::from(&spec),
            currency: config.currency.clone(),
            total_actual,
            total_budget,
            variance: variance.absolute,
            variance_percentage: variance.percentage,
            utilization_percent: variance.utilization_percent,
            variance_status: variance.status,
            breakdown_by_type,
            breakdown_by_category,
            sub_period_trend,
            projected_spend,
            cost_count: actual.len(),
            budget_alert,
        })
    }

    /// Alert for a variance, if any.
    ///
    /// - spend without a budget, or utilization at or above 100%: high
    /// - utilization at or above `threshold_percent`: medium
    #[must_use]
    pub fn budget_alert(variance: &VarianceResult, threshold_percent: Decimal) -> Option<BudgetAlert> {
        match variance.utilization_percent {
            None => Some(BudgetAlert {
                severity: AlertSeverity::High,
                utilization_percent: None,
                message: format!("{} spent with no approved budget", variance.actual),
            }),
            Some(utilization) if utilization >= Decimal::ONE_HUNDRED && !variance.budget.is_zero() => {
                Some(BudgetAlert {
                    severity: AlertSeverity::High,
                    utilization_percent: Some(utilization),
                    message: format!("Budget exceeded: {utilization}% used"),
                })
            }
            Some(utilization) if utilization >= threshold_percent && !variance.budget.is_zero() => {
                Some(BudgetAlert {
                    severity: AlertSeverity::Medium,
                    utilization_percent: Some(utilization),
                    message: format!("Budget nearly exhausted: {utilization}% used"),
                })
            }
            Some(_) => None,
        }
    }
}

/// Records dated inside `spec`.
fn in_period<'a>(records: &[&'a CostRecord], spec: &PeriodSpec) -> Result<Vec<&'a CostRecord>, ReportError> {
    let mut selected = Vec::new();
    for record in records {
        let paid_at = record.payment_date.ok_or(ReportError::InvalidRecord {
            record_id: record.id.into_inner(),
            field: "occurred_at",
        })?;
        if spec.contains(paid_at) {
            selected.push(*record);
        }
    }
    Ok(selected)
}
