//! Workflow service for cost and budget status changes.
//!
//! Every operation validates against the status's transition table and
//! returns a [`StatusChange`] carrying the audit trail. Persisting the
//! change, and making sure only one change per record is in flight, is the
//! store's job.

use chrono::Utc;

use buildcost_shared::types::UserId;

use crate::workflow::error::WorkflowError;
use crate::workflow::types::{
    BudgetAction, BudgetStatus, CostAction, Lifecycle, PaymentStatus, StatusChange,
};

/// Stateless service for approval workflow transitions.
pub struct WorkflowService;

impl WorkflowService {
    /// Validates `current -> target` against the transition table.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidTransition` if the pair is not listed.
    pub fn transition<S: Lifecycle>(
        current: S,
        target: S,
        changed_by: UserId,
        comment: Option<String>,
    ) -> Result<StatusChange<S>, WorkflowError> {
        if !current.can_transition_to(target) {
            return Err(WorkflowError::InvalidTransition {
                from: current.as_str(),
                to: target.as_str(),
            });
        }

        Ok(StatusChange {
            from: current,
            to: target,
            changed_by,
            changed_at: Utc::now(),
            comment,
        })
    }

    /// Approve a pending cost.
    pub fn approve_cost(
        current: PaymentStatus,
        approver: UserId,
        comment: Option<String>,
    ) -> Result<StatusChange<PaymentStatus>, WorkflowError> {
        Self::transition(current, PaymentStatus::Approved, approver, comment)
    }

    /// Mark an approved cost as paid.
    pub fn pay_cost(
        current: PaymentStatus,
        paid_by: UserId,
    ) -> Result<StatusChange<PaymentStatus>, WorkflowError> {
        Self::transition(current, PaymentStatus::Paid, paid_by, None)
    }

    /// Reject a pending cost. A reason is required.
    pub fn reject_cost(
        current: PaymentStatus,
        rejected_by: UserId,
        reason: String,
    ) -> Result<StatusChange<PaymentStatus>, WorkflowError> {
        let reason = require_reason(reason, "reject")?;
        Self::transition(current, PaymentStatus::Rejected, rejected_by, Some(reason))
    }

    /// Cancel a cost before it is paid. A reason is required.
    pub fn cancel_cost(
        current: PaymentStatus,
        cancelled_by: UserId,
        reason: String,
    ) -> Result<StatusChange<PaymentStatus>, WorkflowError> {
        let reason = require_reason(reason, "cancel")?;
        Self::transition(current, PaymentStatus::Cancelled, cancelled_by, Some(reason))
    }

    /// Submit a draft budget for review.
    pub fn submit_budget(
        current: BudgetStatus,
        submitted_by: UserId,
    ) -> Result<StatusChange<BudgetStatus>, WorkflowError> {
        Self::transition(current, BudgetStatus::Pending, submitted_by, None)
    }

    /// Approve a pending budget.
    pub fn approve_budget(
        current: BudgetStatus,
        approver: UserId,
        comment: Option<String>,
    ) -> Result<StatusChange<BudgetStatus>, WorkflowError> {
        Self::transition(current, BudgetStatus::Approved, approver, comment)
    }

    /// Reject a pending budget. A reason is required.
    pub fn reject_budget(
        current: BudgetStatus,
        rejected_by: UserId,
        reason: String,
    ) -> Result<StatusChange<BudgetStatus>, WorkflowError> {
        let reason = require_reason(reason, "reject")?;
        Self::transition(current, BudgetStatus::Rejected, rejected_by, Some(reason))
    }

    /// Cancel a budget that has not been approved. A reason is required.
    pub fn cancel_budget(
        current: BudgetStatus,
        cancelled_by: UserId,
        reason: String,
    ) -> Result<StatusChange<BudgetStatus>, WorkflowError> {
        let reason = require_reason(reason, "cancel")?;
        Self::transition(current, BudgetStatus::Cancelled, cancelled_by, Some(reason))
    }

    /// Applies a cost action. `comment` is the approver comment or the
    /// rejection/cancellation reason.
    pub fn apply_cost_action(
        current: PaymentStatus,
        action: CostAction,
        actor: UserId,
        comment: Option<String>,
    ) -> Result<StatusChange<PaymentStatus>, WorkflowError> {
        match action {
            CostAction::Approve => Self::approve_cost(current, actor, comment),
            CostAction::Pay => Self::pay_cost(current, actor),
            CostAction::Reject => Self::reject_cost(current, actor, comment.unwrap_or_default()),
            CostAction::Cancel => Self::cancel_cost(current, actor, comment.unwrap_or_default()),
        }
    }

    /// Checks that a cost's amount may still be edited. Only pending costs
    /// are editable; approval fixes the amount.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::AmountLocked` for any other status.
    pub fn ensure_amount_editable(current: PaymentStatus) -> Result<(), WorkflowError> {
        if current == PaymentStatus::Pending {
            Ok(())
        } else {
            Err(WorkflowError::AmountLocked {
                status: current.as_str(),
            })
        }
    }

    /// Applies a budget action. `comment` is the approver comment or the
    /// rejection/cancellation reason.
    pub fn apply_budget_action(
        current: BudgetStatus,
        action: BudgetAction,
        actor: UserId,
        comment: Option<String>,
    ) -> Result<StatusChange<BudgetStatus>, WorkflowError> {
        match action {
            BudgetAction::Submit => Self::submit_budget(current, actor),
            BudgetAction::Approve => Self::approve_budget(current, actor, comment),
            BudgetAction::Reject => Self::reject_budget(current, actor, comment.unwrap_or_default()),
            BudgetAction::Cancel => Self::cancel_budget(current, actor, comment.unwrap_or_default()),
        }
    }
}

fn require_reason(reason: String, action: &'static str) -> Result<String, WorkflowError> {
    if reason.trim().is_empty() {
        Err(WorkflowError::ReasonRequired { action })
    } else {
        Ok(reason)
    }
}
