//! Workflow domain types for cost and budget approval.
//!
//! Both record families move through an explicit transition table. Any
//! status change that is not listed in the table is rejected by
//! [`crate::workflow::WorkflowService`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use buildcost_shared::types::UserId;

/// A status enumeration driven by an explicit transition table.
pub trait Lifecycle: Copy + Eq + fmt::Debug + fmt::Display + 'static {
    /// Every legal `(from, to)` pair.
    const TRANSITIONS: &'static [(Self, Self)];

    /// Returns the string representation of the status.
    fn as_str(self) -> &'static str;

    /// Returns true if `self -> next` is listed in the transition table.
    fn can_transition_to(self, next: Self) -> bool {
        Self::TRANSITIONS.contains(&(self, next))
    }

    /// Returns true if no transition leaves this status.
    fn is_terminal(self) -> bool {
        !Self::TRANSITIONS.iter().any(|(from, _)| *from == self)
    }
}

/// Payment status of a cost.
///
/// The valid transitions are:
/// - Pending → Approved (approve)
/// - Approved → Paid (pay)
/// - Pending → Rejected (reject)
/// - Pending | Approved → Cancelled (cancel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Entered, waiting for approval.
    Pending,
    /// Approved for payment.
    Approved,
    /// Paid out.
    Paid,
    /// Rejected by an approver.
    Rejected,
    /// Withdrawn before payment.
    Cancelled,
}

impl PaymentStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Approved,
        Self::Paid,
        Self::Rejected,
        Self::Cancelled,
    ];

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Returns true if the cost counts toward approved spend.
    #[must_use]
    pub const fn counts_as_approved_spend(self) -> bool {
        matches!(self, Self::Approved | Self::Paid)
    }

    /// Returns true if the cost counts toward projected (not yet approved) spend.
    #[must_use]
    pub const fn counts_as_projected_spend(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl Lifecycle for PaymentStatus {
    const TRANSITIONS: &'static [(Self, Self)] = &[
        (Self::Pending, Self::Approved),
        (Self::Approved, Self::Paid),
        (Self::Pending, Self::Rejected),
        (Self::Pending, Self::Cancelled),
        (Self::Approved, Self::Cancelled),
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Paid => "paid",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review status of a budget version.
///
/// The valid transitions are:
/// - Draft → Pending (submit)
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
/// - Draft | Pending → Cancelled (cancel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// Being prepared.
    Draft,
    /// Submitted for review.
    Pending,
    /// Approved; eligible for variance comparison.
    Approved,
    /// Rejected by a reviewer.
    Rejected,
    /// Withdrawn before approval.
    Cancelled,
}

impl BudgetStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::Cancelled,
    ];

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Returns true if the budget is still editable.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl Lifecycle for BudgetStatus {
    const TRANSITIONS: &'static [(Self, Self)] = &[
        (Self::Draft, Self::Pending),
        (Self::Pending, Self::Approved),
        (Self::Pending, Self::Rejected),
        (Self::Draft, Self::Cancelled),
        (Self::Pending, Self::Cancelled),
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action requested on a cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostAction {
    /// Pending → Approved.
    Approve,
    /// Approved → Paid.
    Pay,
    /// Pending → Rejected.
    Reject,
    /// Pending | Approved → Cancelled.
    Cancel,
}

impl CostAction {
    /// Status the action moves a cost to.
    #[must_use]
    pub const fn target(self) -> PaymentStatus {
        match self {
            Self::Approve => PaymentStatus::Approved,
            Self::Pay => PaymentStatus::Paid,
            Self::Reject => PaymentStatus::Rejected,
            Self::Cancel => PaymentStatus::Cancelled,
        }
    }
}

/// Action requested on a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetAction {
    /// Draft → Pending.
    Submit,
    /// Pending → Approved.
    Approve,
    /// Pending → Rejected.
    Reject,
    /// Draft | Pending → Cancelled.
    Cancel,
}

impl BudgetAction {
    /// Status the action moves a budget to.
    #[must_use]
    pub const fn target(self) -> BudgetStatus {
        match self {
            Self::Submit => BudgetStatus::Pending,
            Self::Approve => BudgetStatus::Approved,
            Self::Reject => BudgetStatus::Rejected,
            Self::Cancel => BudgetStatus::Cancelled,
        }
    }
}

/// A validated status change with its audit data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange<S> {
    /// Status before the change.
    pub from: S,
    /// Status after the change.
    pub to: S,
    /// User who performed the change.
    pub changed_by: UserId,
    /// When the change was validated.
    pub changed_at: DateTime<Utc>,
    /// Reason or approver comment, if any.
    pub comment: Option<String>,
}
