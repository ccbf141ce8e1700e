//! Cost repository.
//!
//! Status changes run inside a transaction that holds a row lock on the
//! cost, so two concurrent actions on the same cost are serialized and the
//! second one is validated against the first one's result.

use chrono::{Days, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use buildcost_core::records::{
    CostCategory, CostRecord, CreateCostInput, RecordError, validate_amount, validate_new_cost,
};
use buildcost_core::reports::PeriodSpec;
use buildcost_core::workflow::{
    CostAction, PaymentStatus, StatusChange, WorkflowError, WorkflowService,
};
use buildcost_shared::AppError;
use buildcost_shared::types::{CostId, DepartmentId, ProjectId, UserId, VendorId};

use crate::entities::{
    cost_status_changes, costs, sea_orm_active_enums::PaymentStatus as DbPaymentStatus,
};

/// Error types for cost operations.
#[derive(Debug, thiserror::Error)]
pub enum CostStoreError {
    /// Cost not found (or soft-deleted).
    #[error("Cost not found: {0}")]
    NotFound(Uuid),

    /// Input rejected by record validation.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Status change rejected by the workflow.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// A stored row could not be mapped to a cost.
    #[error("Stored cost {id} is invalid: {reason}")]
    InvalidData {
        /// Row ID.
        id: Uuid,
        /// What is wrong with it.
        reason: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CostStoreError> for AppError {
    fn from(err: CostStoreError) -> Self {
        match err {
            CostStoreError::NotFound(_) => Self::NotFound(err.to_string()),
            CostStoreError::Record(e) => e.into(),
            CostStoreError::Workflow(e) => e.into(),
            CostStoreError::InvalidData { .. } => Self::Internal(err.to_string()),
            CostStoreError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Repository for cost records.
#[derive(Debug, Clone)]
pub struct CostRepository {
    db: DatabaseConnection,
}

impl CostRepository {
    /// Creates a new cost repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a new pending cost.
    ///
    /// # Errors
    ///
    /// Returns `CostStoreError::Record` for a negative amount or a category
    /// outside the cost type.
    pub async fn create(
        &self,
        project_id: ProjectId,
        input: CreateCostInput,
    ) -> Result<CostRecord, CostStoreError> {
        validate_new_cost(&input)?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let model = costs::ActiveModel {
            id: Set(CostId::new().into_inner()),
            project_id: Set(project_id.into_inner()),
            cost_type: Set(input.cost_type.into()),
            category: Set(input.category.as_str().to_string()),
            amount: Set(Some(input.amount)),
            payment_date: Set(input.payment_date),
            description: Set(input.description),
            vendor_id: Set(input.vendor_id.map(VendorId::into_inner)),
            department_id: Set(input.department_id.map(DepartmentId::into_inner)),
            invoice_number: Set(input.invoice_number),
            payment_status: Set(DbPaymentStatus::Pending),
            approved_by: Set(None),
            approved_at: Set(None),
            status_changed_by: Set(None),
            status_comment: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        info!(cost_id = %model.id, project_id = %project_id, "Cost recorded");
        cost_from_model(model)
    }

    /// Finds a live cost by ID.
    ///
    /// # Errors
    ///
    /// Returns `CostStoreError::NotFound` if the cost does not exist or was deleted.
    pub async fn find_by_id(&self, cost_id: CostId) -> Result<CostRecord, CostStoreError> {
        let model = costs::Entity::find_by_id(cost_id.into_inner())
            .filter(costs::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(CostStoreError::NotFound(cost_id.into_inner()))?;

        cost_from_model(model)
    }

    /// Live costs of a project paid within a report period.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be mapped.
    pub async fn list_for_period(
        &self,
        project_id: ProjectId,
        period: &PeriodSpec,
    ) -> Result<Vec<CostRecord>, CostStoreError> {
        self.list(
            project_id,
            Some(start_of(period.start())),
            Some(start_of(period.end())),
        )
        .await
    }

    /// Live costs of a project, optionally limited to payment dates in
    /// `from..=to`. Without bounds, undated costs are included.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be mapped.
    pub async fn list_for_project(
        &self,
        project_id: ProjectId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<CostRecord>, CostStoreError> {
        let end = to.and_then(|d| d.checked_add_days(Days::new(1)));
        self.list(project_id, from.map(start_of), end.map(start_of))
            .await
    }

    async fn list(
        &self,
        project_id: ProjectId,
        start: Option<NaiveDateTime>,
        end_exclusive: Option<NaiveDateTime>,
    ) -> Result<Vec<CostRecord>, CostStoreError> {
        let mut query = costs::Entity::find()
            .filter(costs::Column::ProjectId.eq(project_id.into_inner()))
            .filter(costs::Column::DeletedAt.is_null());

        if let Some(start) = start {
            query = query.filter(costs::Column::PaymentDate.gte(start));
        }
        if let Some(end) = end_exclusive {
            query = query.filter(costs::Column::PaymentDate.lt(end));
        }

        let models = query
            .order_by_asc(costs::Column::PaymentDate)
            .order_by_asc(costs::Column::Id)
            .all(&self.db)
            .await?;

        debug!(project_id = %project_id, count = models.len(), "Loaded costs");
        models.into_iter().map(cost_from_model).collect()
    }

    /// Soft-deletes a cost. Deleted costs are kept for audit but excluded
    /// from every listing and aggregate.
    ///
    /// # Errors
    ///
    /// Returns `CostStoreError::NotFound` if the cost does not exist or was
    /// already deleted.
    pub async fn soft_delete(&self, cost_id: CostId) -> Result<(), CostStoreError> {
        let model = costs::Entity::find_by_id(cost_id.into_inner())
            .filter(costs::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(CostStoreError::NotFound(cost_id.into_inner()))?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let mut active: costs::ActiveModel = model.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&self.db).await?;

        info!(cost_id = %cost_id, "Cost deleted");
        Ok(())
    }

    /// Corrects the amount of a pending cost.
    ///
    /// # Errors
    ///
    /// Returns `CostStoreError::Record` for a negative amount,
    /// `CostStoreError::NotFound` for a missing cost and
    /// `CostStoreError::Workflow` once the cost has left `pending`.
    pub async fn update_amount(
        &self,
        cost_id: CostId,
        amount: Decimal,
    ) -> Result<CostRecord, CostStoreError> {
        validate_amount(amount)?;

        let txn = self.db.begin().await?;

        let model = costs::Entity::find_by_id(cost_id.into_inner())
            .filter(costs::Column::DeletedAt.is_null())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CostStoreError::NotFound(cost_id.into_inner()))?;

        WorkflowService::ensure_amount_editable(model.payment_status.into())?;

        let previous = model.amount;
        let mut active: costs::ActiveModel = model.into();
        active.amount = Set(Some(amount));
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(
            cost_id = %cost_id,
            previous = ?previous,
            amount = %amount,
            "Cost amount updated"
        );
        cost_from_model(updated)
    }

    /// Status changes of a cost, oldest first. Deleted costs keep their
    /// history.
    ///
    /// # Errors
    ///
    /// Returns `CostStoreError::NotFound` if the cost never existed.
    pub async fn status_history(
        &self,
        cost_id: CostId,
    ) -> Result<Vec<StatusChange<PaymentStatus>>, CostStoreError> {
        costs::Entity::find_by_id(cost_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(CostStoreError::NotFound(cost_id.into_inner()))?;

        let rows = cost_status_changes::Entity::find()
            .filter(cost_status_changes::Column::CostId.eq(cost_id.into_inner()))
            .order_by_asc(cost_status_changes::Column::ChangedAt)
            .order_by_asc(cost_status_changes::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(change_from_model).collect())
    }

    /// Applies a workflow action to a cost and appends it to the cost's
    /// status history.
    ///
    /// # Errors
    ///
    /// Returns `CostStoreError::NotFound` for a missing cost and
    /// `CostStoreError::Workflow` for an illegal transition or a missing
    /// reason. Nothing is written in either case.
    pub async fn transition(
        &self,
        cost_id: CostId,
        action: CostAction,
        actor: UserId,
        comment: Option<String>,
    ) -> Result<CostRecord, CostStoreError> {
        let txn = self.db.begin().await?;

        let model = costs::Entity::find_by_id(cost_id.into_inner())
            .filter(costs::Column::DeletedAt.is_null())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CostStoreError::NotFound(cost_id.into_inner()))?;

        let current = PaymentStatus::from(model.payment_status);
        let change = WorkflowService::apply_cost_action(current, action, actor, comment)?;

        let changed_at: DateTimeWithTimeZone = change.changed_at.into();
        let mut active: costs::ActiveModel = model.into();
        active.payment_status = Set(change.to.into());
        active.status_changed_by = Set(Some(change.changed_by.into_inner()));
        active.status_comment = Set(change.comment.clone());
        if change.to == PaymentStatus::Approved {
            active.approved_by = Set(Some(change.changed_by.into_inner()));
            active.approved_at = Set(Some(changed_at));
        }
        active.updated_at = Set(changed_at);

        let updated = active.update(&txn).await?;

        cost_status_changes::ActiveModel {
            id: Set(Uuid::now_v7()),
            cost_id: Set(cost_id.into_inner()),
            from_status: Set(change.from.into()),
            to_status: Set(change.to.into()),
            changed_by: Set(change.changed_by.into_inner()),
            comment: Set(change.comment.clone()),
            changed_at: Set(changed_at),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            cost_id = %cost_id,
            from = %change.from,
            to = %change.to,
            actor = %actor,
            "Cost status changed"
        );
        cost_from_model(updated)
    }
}

fn start_of(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

fn change_from_model(model: cost_status_changes::Model) -> StatusChange<PaymentStatus> {
    StatusChange {
        from: model.from_status.into(),
        to: model.to_status.into(),
        changed_by: UserId::from_uuid(model.changed_by),
        changed_at: model.changed_at.with_timezone(&Utc),
        comment: model.comment,
    }
}

fn cost_from_model(model: costs::Model) -> Result<CostRecord, CostStoreError> {
    let category = CostCategory::parse(&model.category).ok_or_else(|| {
        CostStoreError::InvalidData {
            id: model.id,
            reason: format!("unknown category `{}`", model.category),
        }
    })?;

    Ok(CostRecord {
        id: CostId::from_uuid(model.id),
        project_id: ProjectId::from_uuid(model.project_id),
        cost_type: model.cost_type.into(),
        category,
        amount: model.amount,
        payment_date: model.payment_date,
        status: model.payment_status.into(),
        vendor_id: model.vendor_id.map(VendorId::from_uuid),
        department_id: model.department_id.map(DepartmentId::from_uuid),
        approved_by: model.approved_by.map(UserId::from_uuid),
        is_deleted: model.deleted_at.is_some(),
    })
}
