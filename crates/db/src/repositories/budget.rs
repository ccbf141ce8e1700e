//! Budget repository.
//!
//! A budget and its items are always written in one transaction. Revisions
//! never modify an existing version: they insert a new draft with the next
//! version number for the same project and period.

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use buildcost_core::budget::{
    Budget, BudgetError, BudgetPeriod, BudgetService, CreateBudgetInput, ReviseBudgetInput,
};
use buildcost_core::records::BudgetItemRecord;
use buildcost_core::workflow::{
    BudgetAction, BudgetStatus, StatusChange, WorkflowError, WorkflowService,
};
use buildcost_shared::AppError;
use buildcost_shared::types::{BudgetId, BudgetItemId, ProjectId, UserId};

use crate::entities::{
    budget_items, budget_status_changes, budgets,
    sea_orm_active_enums::BudgetStatus as DbBudgetStatus,
};

/// Error types for budget store operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetStoreError {
    /// Budget not found.
    #[error("Budget not found: {0}")]
    NotFound(Uuid),

    /// Input or revision rejected by budget rules.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// Status change rejected by the workflow.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// A stored row could not be mapped to a budget.
    #[error("Stored budget {id} is invalid: {reason}")]
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

impl From<BudgetStoreError> for AppError {
    fn from(err: BudgetStoreError) -> Self {
        match err {
            BudgetStoreError::NotFound(_) => Self::NotFound(err.to_string()),
            BudgetStoreError::Budget(e) => e.into(),
            BudgetStoreError::Workflow(e) => e.into(),
            BudgetStoreError::InvalidData { .. } => Self::Internal(err.to_string()),
            BudgetStoreError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Repository for budgets and their items.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft budget with its items.
    ///
    /// The version is one past the highest existing version for the same
    /// project and period.
    ///
    /// # Errors
    ///
    /// Returns `BudgetStoreError::Budget` if the input fails validation.
    pub async fn create(
        &self,
        project_id: ProjectId,
        input: CreateBudgetInput,
    ) -> Result<Budget, BudgetStoreError> {
        let period = BudgetService::validate_new_budget(&input)?;

        let txn = self.db.begin().await?;
        let version = next_version(&txn, project_id, period).await?;
        let budget = insert_version(&txn, project_id, period, version, None, input).await?;
        txn.commit().await?;

        info!(
            budget_id = %budget.id,
            project_id = %project_id,
            period = %period,
            version,
            "Budget created"
        );
        Ok(budget)
    }

    /// Creates a new draft version from an approved or rejected budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetStoreError::NotFound` for a missing budget and
    /// `BudgetStoreError::Budget` if the budget cannot be revised or the new
    /// input fails validation.
    pub async fn revise(
        &self,
        budget_id: BudgetId,
        input: ReviseBudgetInput,
    ) -> Result<Budget, BudgetStoreError> {
        let txn = self.db.begin().await?;

        let source = budgets::Entity::find_by_id(budget_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(BudgetStoreError::NotFound(budget_id.into_inner()))?;

        BudgetService::ensure_revisable(source.status.into())?;
        let project_id = ProjectId::from_uuid(source.project_id);
        let period = period_of(&source)?;

        let input = input.into_create(period);
        BudgetService::validate_new_budget(&input)?;

        let version = next_version(&txn, project_id, period).await?;
        let budget =
            insert_version(&txn, project_id, period, version, Some(source.id), input).await?;
        txn.commit().await?;

        info!(
            budget_id = %budget.id,
            previous_id = %budget_id,
            version,
            "Budget revised"
        );
        Ok(budget)
    }

    /// Finds a budget with its items.
    ///
    /// # Errors
    ///
    /// Returns `BudgetStoreError::NotFound` if the budget does not exist.
    pub async fn find_by_id(&self, budget_id: BudgetId) -> Result<Budget, BudgetStoreError> {
        let model = budgets::Entity::find_by_id(budget_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(BudgetStoreError::NotFound(budget_id.into_inner()))?;

        let mut loaded = with_items(&self.db, vec![model]).await?;
        loaded
            .pop()
            .ok_or(BudgetStoreError::NotFound(budget_id.into_inner()))
    }

    /// All versions of all budgets of a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be mapped.
    pub async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<Budget>, BudgetStoreError> {
        let models = budgets::Entity::find()
            .filter(budgets::Column::ProjectId.eq(project_id.into_inner()))
            .order_by_asc(budgets::Column::Year)
            .order_by_asc(budgets::Column::Month)
            .order_by_asc(budgets::Column::Version)
            .all(&self.db)
            .await?;

        debug!(project_id = %project_id, count = models.len(), "Loaded budgets");
        with_items(&self.db, models).await
    }

    /// All versions of a project's budgets for one calendar year.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be mapped.
    pub async fn list_for_year(
        &self,
        project_id: ProjectId,
        year: i32,
    ) -> Result<Vec<Budget>, BudgetStoreError> {
        let models = budgets::Entity::find()
            .filter(budgets::Column::ProjectId.eq(project_id.into_inner()))
            .filter(budgets::Column::Year.eq(year))
            .order_by_asc(budgets::Column::Month)
            .order_by_asc(budgets::Column::Version)
            .all(&self.db)
            .await?;

        with_items(&self.db, models).await
    }

    /// Status changes of a budget version, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `BudgetStoreError::NotFound` if the budget does not exist.
    pub async fn status_history(
        &self,
        budget_id: BudgetId,
    ) -> Result<Vec<StatusChange<BudgetStatus>>, BudgetStoreError> {
        budgets::Entity::find_by_id(budget_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(BudgetStoreError::NotFound(budget_id.into_inner()))?;

        let rows = budget_status_changes::Entity::find()
            .filter(budget_status_changes::Column::BudgetId.eq(budget_id.into_inner()))
            .order_by_asc(budget_status_changes::Column::ChangedAt)
            .order_by_asc(budget_status_changes::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(change_from_model).collect())
    }

    /// Applies a workflow action to a budget and appends it to the budget's
    /// status history.
    ///
    /// # Errors
    ///
    /// Returns `BudgetStoreError::NotFound` for a missing budget and
    /// `BudgetStoreError::Workflow` for an illegal transition or a missing
    /// reason. Nothing is written in either case.
    pub async fn transition(
        &self,
        budget_id: BudgetId,
        action: BudgetAction,
        actor: UserId,
        comment: Option<String>,
    ) -> Result<Budget, BudgetStoreError> {
        let txn = self.db.begin().await?;

        let model = budgets::Entity::find_by_id(budget_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(BudgetStoreError::NotFound(budget_id.into_inner()))?;

        let current = BudgetStatus::from(model.status);
        let change = WorkflowService::apply_budget_action(current, action, actor, comment)?;

        let mut active: budgets::ActiveModel = model.into();
        active.status = Set(change.to.into());
        active.status_changed_by = Set(Some(change.changed_by.into_inner()));
        active.status_comment = Set(change.comment.clone());
        active.updated_at = Set(change.changed_at.into());
        let updated = active.update(&txn).await?;

        budget_status_changes::ActiveModel {
            id: Set(Uuid::now_v7()),
            budget_id: Set(budget_id.into_inner()),
            from_status: Set(change.from.into()),
            to_status: Set(change.to.into()),
            changed_by: Set(change.changed_by.into_inner()),
            comment: Set(change.comment.clone()),
            changed_at: Set(change.changed_at.into()),
        }
        .insert(&txn)
        .await?;

        let mut loaded = with_items(&txn, vec![updated]).await?;
        txn.commit().await?;

        info!(
            budget_id = %budget_id,
            from = %change.from,
            to = %change.to,
            actor = %actor,
            "Budget status changed"
        );
        loaded
            .pop()
            .ok_or(BudgetStoreError::NotFound(budget_id.into_inner()))
    }
}

fn change_from_model(model: budget_status_changes::Model) -> StatusChange<BudgetStatus> {
    StatusChange {
        from: model.from_status.into(),
        to: model.to_status.into(),
        changed_by: UserId::from_uuid(model.changed_by),
        changed_at: model.changed_at.with_timezone(&Utc),
        comment: model.comment,
    }
}

async fn next_version<C: ConnectionTrait>(
    conn: &C,
    project_id: ProjectId,
    period: BudgetPeriod,
) -> Result<i32, BudgetStoreError> {
    let mut query = budgets::Entity::find()
        .filter(budgets::Column::ProjectId.eq(project_id.into_inner()))
        .filter(budgets::Column::Year.eq(period.year));
    query = match month_column(period)? {
        Some(month) => query.filter(budgets::Column::Month.eq(month)),
        None => query.filter(budgets::Column::Month.is_null()),
    };

    let latest = query
        .order_by_desc(budgets::Column::Version)
        .one(conn)
        .await?;

    Ok(latest.map_or(1, |b| b.version + 1))
}

async fn insert_version<C: ConnectionTrait>(
    conn: &C,
    project_id: ProjectId,
    period: BudgetPeriod,
    version: i32,
    previous_version_id: Option<Uuid>,
    input: CreateBudgetInput,
) -> Result<Budget, BudgetStoreError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let budget_id = BudgetId::new();

    let model = budgets::ActiveModel {
        id: Set(budget_id.into_inner()),
        project_id: Set(project_id.into_inner()),
        year: Set(period.year),
        month: Set(month_column(period)?),
        total_amount: Set(input.total_amount),
        description: Set(input.description),
        status: Set(DbBudgetStatus::Draft),
        version: Set(version),
        previous_version_id: Set(previous_version_id),
        status_changed_by: Set(None),
        status_comment: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?;

    let mut items = Vec::with_capacity(input.items.len());
    for item in input.items {
        let row = budget_items::ActiveModel {
            id: Set(BudgetItemId::new().into_inner()),
            budget_id: Set(budget_id.into_inner()),
            cost_type: Set(item.cost_type.into()),
            subcategory: Set(item.subcategory),
            amount: Set(Some(item.amount)),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;
        items.push(row);
    }

    budget_from_model(model, items)
}

async fn with_items<C: ConnectionTrait>(
    conn: &C,
    models: Vec<budgets::Model>,
) -> Result<Vec<Budget>, BudgetStoreError> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let rows = budget_items::Entity::find()
        .filter(budget_items::Column::BudgetId.is_in(ids))
        .order_by_asc(budget_items::Column::CreatedAt)
        .order_by_asc(budget_items::Column::Id)
        .all(conn)
        .await?;

    let mut by_budget: HashMap<Uuid, Vec<budget_items::Model>> = HashMap::new();
    for row in rows {
        by_budget.entry(row.budget_id).or_default().push(row);
    }

    models
        .into_iter()
        .map(|model| {
            let items = by_budget.remove(&model.id).unwrap_or_default();
            budget_from_model(model, items)
        })
        .collect()
}

fn month_column(period: BudgetPeriod) -> Result<Option<i32>, BudgetStoreError> {
    period
        .month
        .map(|m| {
            i32::try_from(m).map_err(|_| BudgetStoreError::Budget(BudgetError::InvalidMonth(m)))
        })
        .transpose()
}

fn period_of(model: &budgets::Model) -> Result<BudgetPeriod, BudgetStoreError> {
    let invalid = |reason: String| BudgetStoreError::InvalidData {
        id: model.id,
        reason,
    };

    let month = model
        .month
        .map(u32::try_from)
        .transpose()
        .map_err(|_| invalid(format!("month {:?} out of range", model.month)))?;

    BudgetPeriod::new(model.year, month).map_err(|e| invalid(e.to_string()))
}

fn budget_from_model(
    model: budgets::Model,
    items: Vec<budget_items::Model>,
) -> Result<Budget, BudgetStoreError> {
    let period = period_of(&model)?;
    let budget_id = BudgetId::from_uuid(model.id);
    let project_id = ProjectId::from_uuid(model.project_id);

    let items = items
        .into_iter()
        .map(|item| BudgetItemRecord {
            id: BudgetItemId::from_uuid(item.id),
            budget_id,
            project_id,
            cost_type: item.cost_type.into(),
            subcategory: item.subcategory,
            amount: item.amount,
        })
        .collect();

    Ok(Budget {
        id: budget_id,
        project_id,
        period,
        total_amount: model.total_amount,
        status: model.status.into(),
        version: model.version,
        items,
    })
}
