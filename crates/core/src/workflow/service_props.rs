//! Property-based tests for the approval state machines.

use proptest::prelude::*;

use buildcost_shared::types::UserId;

use super::service::WorkflowService;
use super::types::{BudgetStatus, Lifecycle, PaymentStatus};

fn payment_status_strategy() -> impl Strategy<Value = PaymentStatus> {
    prop::sample::select(PaymentStatus::ALL.to_vec())
}

fn budget_status_strategy() -> impl Strategy<Value = BudgetStatus> {
    prop::sample::select(BudgetStatus::ALL.to_vec())
}

/// Rank of a cost status along the main path; alternates are terminal.
fn payment_rank(status: PaymentStatus) -> Option<u8> {
    match status {
        PaymentStatus::Pending => Some(0),
        PaymentStatus::Approved => Some(1),
        PaymentStatus::Paid => Some(2),
        PaymentStatus::Rejected | PaymentStatus::Cancelled => None,
    }
}

proptest! {
    /// A transition succeeds exactly when the table lists it.
    #[test]
    fn prop_cost_transition_matches_table(
        from in payment_status_strategy(),
        to in payment_status_strategy(),
    ) {
        let result = WorkflowService::transition(from, to, UserId::new(), None);
        prop_assert_eq!(result.is_ok(), PaymentStatus::TRANSITIONS.contains(&(from, to)));
    }

    #[test]
    fn prop_budget_transition_matches_table(
        from in budget_status_strategy(),
        to in budget_status_strategy(),
    ) {
        let result = WorkflowService::transition(from, to, UserId::new(), None);
        prop_assert_eq!(result.is_ok(), BudgetStatus::TRANSITIONS.contains(&(from, to)));
    }

    /// Along pending → approved → paid, every legal step advances by exactly one.
    #[test]
    fn prop_cost_main_path_never_skips(
        from in payment_status_strategy(),
        to in payment_status_strategy(),
    ) {
        if let (Some(a), Some(b)) = (payment_rank(from), payment_rank(to)) {
            prop_assert_eq!(from.can_transition_to(to), b == a + 1);
        }
    }

    /// Nothing leaves a terminal status.
    #[test]
    fn prop_terminal_statuses_are_final(
        from in payment_status_strategy(),
        to in payment_status_strategy(),
    ) {
        if from.is_terminal() {
            prop_assert!(WorkflowService::transition(from, to, UserId::new(), None).is_err());
        }
    }

    /// No status transitions to itself.
    #[test]
    fn prop_no_self_transitions(status in payment_status_strategy()) {
        prop_assert!(!status.can_transition_to(status));
    }
}
