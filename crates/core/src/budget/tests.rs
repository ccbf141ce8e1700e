//! Property-based tests for budget version selection and item checks.

use proptest::prelude::*;
use rust_decimal::Decimal;

use buildcost_shared::types::{BudgetId, BudgetItemId, ProjectId};

use super::service::BudgetService;
use super::types::{Budget, BudgetPeriod};
use crate::records::{BudgetItemRecord, CostType};
use crate::workflow::BudgetStatus;

fn status_strategy() -> impl Strategy<Value = BudgetStatus> {
    prop::sample::select(BudgetStatus::ALL.to_vec())
}

proptest! {
    /// At most one version per period is effective, and it is the highest
    /// approved one.
    #[test]
    fn test_effective_is_highest_approved_version(
        versions in prop::collection::vec((status_strategy(), 1i64..1_000_000), 0..12),
    ) {
        let project_id = ProjectId::new();
        let period = BudgetPeriod::new(2024, Some(7)).unwrap();
        let budgets: Vec<Budget> = versions
            .iter()
            .enumerate()
            .map(|(i, (status, amount))| Budget {
                id: BudgetId::new(),
                project_id,
                period,
                total_amount: Decimal::from(*amount),
                status: *status,
                version: i32::try_from(i).unwrap() + 1,
                items: Vec::new(),
            })
            .collect();

        let effective = BudgetService::effective_budgets(&budgets);
        let expected = budgets
            .iter()
            .filter(|b| b.status == BudgetStatus::Approved)
            .map(|b| b.version)
            .max();

        prop_assert_eq!(effective.first().map(|b| b.version), expected);
        prop_assert!(effective.len() <= 1);
    }

    /// Items built by splitting the total always verify.
    #[test]
    fn test_split_items_always_verify(
        parts in prop::collection::vec(0i64..10_000_000, 1..10),
    ) {
        let project_id = ProjectId::new();
        let budget_id = BudgetId::new();
        let items: Vec<BudgetItemRecord> = parts
            .iter()
            .map(|p| BudgetItemRecord {
                id: BudgetItemId::new(),
                budget_id,
                project_id,
                cost_type: CostType::Equipment,
                subcategory: "rental".to_string(),
                amount: Some(Decimal::new(*p, 2)),
            })
            .collect();
        let total: Decimal = parts.iter().map(|p| Decimal::new(*p, 2)).sum();

        let budget = Budget {
            id: budget_id,
            project_id,
            period: BudgetPeriod::new(2024, None).unwrap(),
            total_amount: total,
            status: BudgetStatus::Draft,
            version: 1,
            items,
        };

        prop_assert!(BudgetService::verify_items(&budget).is_ok());
    }
}
