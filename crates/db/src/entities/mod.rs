//! `SeaORM` entities for the financial record tables.

pub mod budget_items;
pub mod budget_status_changes;
pub mod budgets;
pub mod cost_status_changes;
pub mod costs;
pub mod sea_orm_active_enums;
