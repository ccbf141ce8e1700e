//! `SeaORM` Entity for costs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CostType, PaymentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "costs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub cost_type: CostType,
    pub category: String,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))", nullable)]
    pub amount: Option<Decimal>,
    pub payment_date: Option<DateTime>,
    pub description: Option<String>,
    pub vendor_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub invoice_number: Option<String>,
    pub payment_status: PaymentStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub status_changed_by: Option<Uuid>,
    pub status_comment: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
