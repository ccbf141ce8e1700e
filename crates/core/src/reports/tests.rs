//! Property-based and scenario tests for report assembly.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use buildcost_shared::ReportingConfig;
use buildcost_shared::types::{BudgetId, CostId, DepartmentId, ProjectId};

use super::aggregate::{aggregate, sum_amounts};
use super::error::ReportError;
use super::period::{PeriodKind, PeriodLabel, bucket_by_period};
use super::service::ReportService;
use super::types::ReportRequest;
use super::variance::VarianceStatus;
use crate::budget::{Budget, BudgetPeriod};
use crate::records::{CostCategory, CostRecord, CostType};
use crate::workflow::{BudgetStatus, PaymentStatus};

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn cost(
    project_id: ProjectId,
    category: CostCategory,
    amount: Decimal,
    paid_at: NaiveDateTime,
    status: PaymentStatus,
) -> CostRecord {
    CostRecord {
        id: CostId::new(),
        project_id,
        cost_type: category.cost_type(),
        category,
        amount: Some(amount),
        payment_date: Some(paid_at),
        status,
        vendor_id: None,
        department_id: None,
        approved_by: None,
        is_deleted: false,
    }
}

fn approved_budget(project_id: ProjectId, year: i32, month: Option<u32>, total: Decimal) -> Budget {
    Budget {
        id: BudgetId::new(),
        project_id,
        period: BudgetPeriod::new(year, month).unwrap(),
        total_amount: total,
        status: BudgetStatus::Approved,
        version: 1,
        items: Vec::new(),
    }
}

fn config() -> ReportingConfig {
    ReportingConfig::default()
}

fn cost_strategy(project_id: ProjectId) -> impl Strategy<Value = CostRecord> {
    (
        prop::sample::select(CostCategory::ALL.to_vec()),
        0i64..100_000_000,
        0u64..731,
        prop::sample::select(PaymentStatus::ALL.to_vec()),
        any::<bool>(),
    )
        .prop_map(move |(category, cents, day, status, deleted)| {
            let paid_at = NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .checked_add_days(Days::new(day))
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap();
            let mut record = cost(project_id, category, Decimal::new(cents, 2), paid_at, status);
            record.is_deleted = deleted;
            record
        })
}

fn departmental_cost_strategy() -> impl Strategy<Value = CostRecord> {
    (
        cost_strategy(ProjectId::from_uuid(uuid::Uuid::nil())),
        prop::option::of(0u128..4),
    )
        .prop_map(|(mut record, department)| {
            record.department_id =
                department.map(|n| DepartmentId::from_uuid(uuid::Uuid::from_u128(n + 1)));
            record
        })
}

fn bucket_total(
    costs: &[CostRecord],
    kind: PeriodKind,
    year: i32,
    period: u32,
    label: PeriodLabel,
) -> Decimal {
    let buckets = bucket_by_period(costs, kind, year, period).unwrap();
    sum_amounts(buckets[&label].iter().copied()).unwrap()
}

fn counted_total(costs: &[CostRecord], from: NaiveDate, to: NaiveDate) -> Decimal {
    costs
        .iter()
        .filter(|c| !c.is_deleted && c.status.counts_as_approved_spend())
        .filter(|c| c.payment_date.is_some_and(|d| d.date() >= from && d.date() < to))
        .filter_map(|c| c.amount)
        .sum()
}

proptest! {
    /// Breakdowns partition the actual total exactly.
    #[test]
    fn test_breakdowns_sum_to_total(
        costs in prop::collection::vec(cost_strategy(ProjectId::from_uuid(uuid::Uuid::nil())), 0..40),
        quarter in 1u32..=4,
    ) {
        let request = ReportRequest::quarterly(ProjectId::from_uuid(uuid::Uuid::nil()), 2024, quarter);
        let report = ReportService::build_report(&request, &costs, &[], &config()).unwrap();

        let by_type: Decimal = report.breakdown_by_type.values().copied().sum();
        let by_category: Decimal = report.breakdown_by_category.values().copied().sum();
        prop_assert_eq!(by_type, report.total_actual);
        prop_assert_eq!(by_category, report.total_actual);
        prop_assert_eq!(report.breakdown_by_type.len(), CostType::ALL.len());
    }

    /// The total equals a direct filter-and-sum over the period's date range.
    #[test]
    fn test_total_matches_date_range(
        costs in prop::collection::vec(cost_strategy(ProjectId::from_uuid(uuid::Uuid::nil())), 0..40),
        month in 1u32..=12,
    ) {
        let request = ReportRequest::monthly(ProjectId::from_uuid(uuid::Uuid::nil()), 2025, month);
        let report = ReportService::build_report(&request, &costs, &[], &config()).unwrap();

        let expected = counted_total(&costs, report.period.start, report.period.end);
        prop_assert_eq!(report.total_actual, expected);
    }

    /// Months and quarters of a yearly report each add up to the year.
    #[test]
    fn test_yearly_trend_composes(
        costs in prop::collection::vec(cost_strategy(ProjectId::from_uuid(uuid::Uuid::nil())), 0..40),
    ) {
        let request = ReportRequest::yearly(ProjectId::from_uuid(uuid::Uuid::nil()), 2024);
        let report = ReportService::build_report(&request, &costs, &[], &config()).unwrap();

        let months: Decimal = report
            .sub_period_trend
            .iter()
            .filter(|(label, _)| matches!(label, PeriodLabel::Month { .. }))
            .map(|(_, amount)| *amount)
            .sum();
        let quarters: Decimal = report
            .sub_period_trend
            .iter()
            .filter(|(label, _)| matches!(label, PeriodLabel::Quarter { .. }))
            .map(|(_, amount)| *amount)
            .sum();

        prop_assert_eq!(report.sub_period_trend.len(), 16);
        prop_assert_eq!(months, report.total_actual);
        prop_assert_eq!(quarters, report.total_actual);
    }

    /// A quarter bucket holds exactly what its three month buckets hold.
    #[test]
    fn test_quarter_bucket_equals_its_months(
        costs in prop::collection::vec(cost_strategy(ProjectId::from_uuid(uuid::Uuid::nil())), 0..40),
        quarter in 1u32..=4,
    ) {
        let quarter_total = bucket_total(
            &costs,
            PeriodKind::Quarter,
            2024,
            quarter,
            PeriodLabel::Quarter { year: 2024, quarter },
        );
        let months_total: Decimal = (quarter * 3 - 2..=quarter * 3)
            .map(|month| {
                bucket_total(&costs, PeriodKind::Month, 2024, month, PeriodLabel::Month { year: 2024, month })
            })
            .sum();

        prop_assert_eq!(quarter_total, months_total);
    }

    /// Grouping by any key partitions the total, whatever the record order.
    #[test]
    fn test_aggregate_is_order_independent(
        (costs, shuffled) in prop::collection::vec(departmental_cost_strategy(), 0..40)
            .prop_flat_map(|costs| (Just(costs.clone()), Just(costs).prop_shuffle())),
    ) {
        let total = sum_amounts(&costs).unwrap();

        let by_department = aggregate(&costs, |c: &CostRecord| c.department_id).unwrap();
        let by_month = aggregate(&costs, |c: &CostRecord| {
            c.payment_date.map(|d| (d.year(), d.month()))
        })
        .unwrap();

        prop_assert_eq!(by_department.values().copied().sum::<Decimal>(), total);
        prop_assert_eq!(by_month.values().copied().sum::<Decimal>(), total);
        prop_assert_eq!(
            aggregate(&shuffled, |c: &CostRecord| c.department_id).unwrap(),
            by_department
        );
        prop_assert_eq!(
            aggregate(&shuffled, |c: &CostRecord| {
                c.payment_date.map(|d| (d.year(), d.month()))
            })
            .unwrap(),
            by_month
        );
    }

    /// The same input always yields the same serialized report.
    #[test]
    fn test_build_report_is_idempotent(
        costs in prop::collection::vec(cost_strategy(ProjectId::from_uuid(uuid::Uuid::nil())), 0..20),
    ) {
        let project_id = ProjectId::from_uuid(uuid::Uuid::nil());
        let budgets = vec![approved_budget(project_id, 2024, Some(2), dec!(1000000))];
        let request = ReportRequest::quarterly(project_id, 2024, 1);

        let first = ReportService::build_report(&request, &costs, &budgets, &config()).unwrap();
        let second = ReportService::build_report(&request, &costs, &budgets, &config()).unwrap();

        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_month_boundary_belongs_to_later_month() {
    let project_id = ProjectId::new();
    let costs = vec![cost(
        project_id,
        CostCategory::Cement,
        dec!(500),
        at(2024, 3, 1),
        PaymentStatus::Paid,
    )];

    let feb = ReportService::build_report(&ReportRequest::monthly(project_id, 2024, 2), &costs, &[], &config()).unwrap();
    let mar = ReportService::build_report(&ReportRequest::monthly(project_id, 2024, 3), &costs, &[], &config()).unwrap();

    assert_eq!(feb.total_actual, Decimal::ZERO);
    assert_eq!(mar.total_actual, dec!(500));
}

#[test]
fn test_midnight_on_march_first_is_bucketed_in_march() {
    let project_id = ProjectId::new();
    let costs = vec![cost(
        project_id,
        CostCategory::Rebar,
        dec!(750),
        at(2024, 3, 1),
        PaymentStatus::Approved,
    )];

    let feb = bucket_by_period(&costs, PeriodKind::Month, 2024, 2).unwrap();
    let mar = bucket_by_period(&costs, PeriodKind::Month, 2024, 3).unwrap();

    assert_eq!(feb.len(), 1);
    assert!(feb[&PeriodLabel::Month { year: 2024, month: 2 }].is_empty());
    assert_eq!(mar[&PeriodLabel::Month { year: 2024, month: 3 }].len(), 1);
}

#[test]
fn test_bucket_by_period_rejects_out_of_range_periods() {
    let costs: Vec<CostRecord> = Vec::new();

    assert_eq!(
        bucket_by_period(&costs, PeriodKind::Quarter, 2024, 5).unwrap_err(),
        ReportError::InvalidPeriod {
            kind: PeriodKind::Quarter,
            period: 5,
        }
    );
    assert_eq!(
        bucket_by_period(&costs, PeriodKind::Month, 2024, 0).unwrap_err(),
        ReportError::InvalidPeriod {
            kind: PeriodKind::Month,
            period: 0,
        }
    );
    assert_eq!(
        bucket_by_period(&costs, PeriodKind::Year, 0, 1).unwrap_err(),
        ReportError::InvalidYear(0)
    );
}

#[test]
fn test_quarter_trend_has_three_months() {
    let project_id = ProjectId::new();
    let costs = vec![
        cost(project_id, CostCategory::Wages, dec!(100), at(2024, 1, 15), PaymentStatus::Approved),
        cost(project_id, CostCategory::Wages, dec!(200), at(2024, 3, 31), PaymentStatus::Paid),
    ];

    let report = ReportService::build_report(&ReportRequest::quarterly(project_id, 2024, 1), &costs, &[], &config()).unwrap();

    let trend: Vec<(String, Decimal)> = report
        .sub_period_trend
        .iter()
        .map(|(label, amount)| (label.to_string(), *amount))
        .collect();
    assert_eq!(
        trend,
        vec![
            ("2024-01".to_string(), dec!(100)),
            ("2024-02".to_string(), dec!(0)),
            ("2024-03".to_string(), dec!(200)),
            ("2024-Q1".to_string(), dec!(300)),
        ]
    );
    assert_eq!(report.period_label.to_string(), "2024-Q1");
}

#[test]
fn test_empty_report_is_zeroed() {
    let project_id = ProjectId::new();
    let report = ReportService::build_report(&ReportRequest::monthly(project_id, 2024, 6), &[], &[], &config()).unwrap();

    assert_eq!(report.total_actual, Decimal::ZERO);
    assert_eq!(report.total_budget, Decimal::ZERO);
    assert_eq!(report.variance_percentage, Some(Decimal::ZERO));
    assert_eq!(report.variance_status, VarianceStatus::OnBudget);
    assert!(report.breakdown_by_category.is_empty());
    assert!(report.breakdown_by_type.values().all(Decimal::is_zero));
    assert_eq!(report.budget_alert, None);
    assert_eq!(report.cost_count, 0);
}

#[test]
fn test_only_live_approved_costs_of_the_project_count() {
    let project_id = ProjectId::new();
    let mut deleted = cost(project_id, CostCategory::Fuel, dec!(7), at(2024, 5, 2), PaymentStatus::Paid);
    deleted.is_deleted = true;

    let costs = vec![
        cost(project_id, CostCategory::Fuel, dec!(10), at(2024, 5, 1), PaymentStatus::Approved),
        cost(project_id, CostCategory::Fuel, dec!(20), at(2024, 5, 1), PaymentStatus::Pending),
        cost(project_id, CostCategory::Fuel, dec!(40), at(2024, 5, 1), PaymentStatus::Rejected),
        cost(project_id, CostCategory::Fuel, dec!(80), at(2024, 5, 1), PaymentStatus::Cancelled),
        cost(ProjectId::new(), CostCategory::Fuel, dec!(160), at(2024, 5, 1), PaymentStatus::Paid),
        deleted,
    ];

    let report = ReportService::build_report(&ReportRequest::monthly(project_id, 2024, 5), &costs, &[], &config()).unwrap();

    assert_eq!(report.total_actual, dec!(10));
    assert_eq!(report.projected_spend, dec!(20));
    assert_eq!(report.cost_count, 1);
    assert_eq!(report.breakdown_by_type[&CostType::Equipment], dec!(10));
    assert_eq!(report.breakdown_by_category[&CostCategory::Fuel], dec!(10));
}

#[test]
fn test_variance_against_monthly_budgets() {
    let project_id = ProjectId::new();
    let costs = vec![
        cost(project_id, CostCategory::Crane, dec!(700), at(2024, 4, 10), PaymentStatus::Paid),
        cost(project_id, CostCategory::Rebar, dec!(500), at(2024, 6, 30), PaymentStatus::Approved),
    ];
    let budgets = vec![
        approved_budget(project_id, 2024, Some(4), dec!(600)),
        approved_budget(project_id, 2024, Some(6), dec!(400)),
        approved_budget(project_id, 2024, Some(7), dec!(9999)),
    ];

    let report = ReportService::build_report(&ReportRequest::quarterly(project_id, 2024, 2), &costs, &budgets, &config()).unwrap();

    assert_eq!(report.total_actual, dec!(1200));
    assert_eq!(report.total_budget, dec!(1000));
    assert_eq!(report.variance, dec!(200));
    assert_eq!(report.variance_percentage, Some(dec!(20)));
    assert_eq!(report.variance_status, VarianceStatus::OverBudget);
    assert!(report.budget_alert.is_some());
}

#[test]
fn test_spend_without_budget_has_undefined_percentage() {
    let project_id = ProjectId::new();
    let costs = vec![cost(project_id, CostCategory::Travel, dec!(50), at(2024, 8, 8), PaymentStatus::Paid)];

    let report = ReportService::build_report(&ReportRequest::monthly(project_id, 2024, 8), &costs, &[], &config()).unwrap();

    assert_eq!(report.variance, dec!(50));
    assert_eq!(report.variance_percentage, None);

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["variance_percentage"].is_null());
}

#[test]
fn test_report_serializes_labels_and_amounts_as_strings() {
    let project_id = ProjectId::new();
    let costs = vec![cost(project_id, CostCategory::Wages, dec!(1234.50), at(2024, 2, 3), PaymentStatus::Paid)];

    let report = ReportService::build_report(&ReportRequest::monthly(project_id, 2024, 2), &costs, &[], &config()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["period_label"], "2024-02");
    assert_eq!(json["total_actual"], "1234.50");
    assert_eq!(json["breakdown_by_type"]["labor"], "1234.50");
    assert_eq!(json["sub_period_trend"]["2024-02"], "1234.50");
    assert_eq!(json["currency"], "KRW");
}

#[test]
fn test_missing_payment_date_is_rejected() {
    let project_id = ProjectId::new();
    let mut undated = cost(project_id, CostCategory::Other, dec!(1), at(2024, 1, 1), PaymentStatus::Paid);
    undated.payment_date = None;
    let undated_id = undated.id.into_inner();

    let result = ReportService::build_report(&ReportRequest::monthly(project_id, 2024, 1), &[undated], &[], &config());

    assert_eq!(
        result,
        Err(ReportError::InvalidRecord {
            record_id: undated_id,
            field: "occurred_at",
        })
    );
}

#[test]
fn test_missing_amount_is_rejected() {
    let project_id = ProjectId::new();
    let mut blank = cost(project_id, CostCategory::Other, dec!(1), at(2024, 1, 1), PaymentStatus::Approved);
    blank.amount = None;

    let result = ReportService::build_report(&ReportRequest::monthly(project_id, 2024, 1), &[blank], &[], &config());

    assert!(matches!(result, Err(ReportError::InvalidRecord { field: "amount", .. })));
}

#[test]
fn test_invalid_period_is_rejected() {
    let request = ReportRequest::quarterly(ProjectId::new(), 2024, 5);
    assert_eq!(
        ReportService::build_report(&request, &[], &[], &config()),
        Err(ReportError::InvalidPeriod {
            kind: PeriodKind::Quarter,
            period: 5,
        })
    );
}
