//! `SeaORM` Entity for cost_status_changes table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cost_status_changes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cost_id: Uuid,
    pub from_status: PaymentStatus,
    pub to_status: PaymentStatus,
    pub changed_by: Uuid,
    pub comment: Option<String>,
    pub changed_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::costs::Entity",
        from = "Column::CostId",
        to = "super::costs::Column::Id"
    )]
    Costs,
}

impl Related<super::costs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Costs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
