//! Text-backed enums stored in the financial record tables.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cost type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum CostType {
    #[sea_orm(string_value = "labor")]
    Labor,
    #[sea_orm(string_value = "material")]
    Material,
    #[sea_orm(string_value = "equipment")]
    Equipment,
    #[sea_orm(string_value = "subcontract")]
    Subcontract,
    #[sea_orm(string_value = "indirect")]
    Indirect,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Payment status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Budget status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum BudgetStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<buildcost_core::records::CostType> for CostType {
    fn from(value: buildcost_core::records::CostType) -> Self {
        use buildcost_core::records::CostType as Core;
        match value {
            Core::Labor => Self::Labor,
            Core::Material => Self::Material,
            Core::Equipment => Self::Equipment,
            Core::Subcontract => Self::Subcontract,
            Core::Indirect => Self::Indirect,
            Core::Other => Self::Other,
        }
    }
}

impl From<CostType> for buildcost_core::records::CostType {
    fn from(value: CostType) -> Self {
        match value {
            CostType::Labor => Self::Labor,
            CostType::Material => Self::Material,
            CostType::Equipment => Self::Equipment,
            CostType::Subcontract => Self::Subcontract,
            CostType::Indirect => Self::Indirect,
            CostType::Other => Self::Other,
        }
    }
}

impl From<buildcost_core::workflow::PaymentStatus> for PaymentStatus {
    fn from(value: buildcost_core::workflow::PaymentStatus) -> Self {
        use buildcost_core::workflow::PaymentStatus as Core;
        match value {
            Core::Pending => Self::Pending,
            Core::Approved => Self::Approved,
            Core::Paid => Self::Paid,
            Core::Rejected => Self::Rejected,
            Core::Cancelled => Self::Cancelled,
        }
    }
}

impl From<PaymentStatus> for buildcost_core::workflow::PaymentStatus {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Pending => Self::Pending,
            PaymentStatus::Approved => Self::Approved,
            PaymentStatus::Paid => Self::Paid,
            PaymentStatus::Rejected => Self::Rejected,
            PaymentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<buildcost_core::workflow::BudgetStatus> for BudgetStatus {
    fn from(value: buildcost_core::workflow::BudgetStatus) -> Self {
        use buildcost_core::workflow::BudgetStatus as Core;
        match value {
            Core::Draft => Self::Draft,
            Core::Pending => Self::Pending,
            Core::Approved => Self::Approved,
            Core::Rejected => Self::Rejected,
            Core::Cancelled => Self::Cancelled,
        }
    }
}

impl From<BudgetStatus> for buildcost_core::workflow::BudgetStatus {
    fn from(value: BudgetStatus) -> Self {
        match value {
            BudgetStatus::Draft => Self::Draft,
            BudgetStatus::Pending => Self::Pending,
            BudgetStatus::Approved => Self::Approved,
            BudgetStatus::Rejected => Self::Rejected,
            BudgetStatus::Cancelled => Self::Cancelled,
        }
    }
}
