//! Append-only status change history for costs and budgets.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(COST_STATUS_CHANGES_SQL).await?;
        db.execute_unprepared(BUDGET_STATUS_CHANGES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r"
            DROP TABLE IF EXISTS budget_status_changes;
            DROP TABLE IF EXISTS cost_status_changes;
            ",
        )
        .await?;

        Ok(())
    }
}

const COST_STATUS_CHANGES_SQL: &str = r"
CREATE TABLE cost_status_changes (
    id          UUID PRIMARY KEY,
    cost_id     UUID NOT NULL REFERENCES costs (id),
    from_status TEXT NOT NULL
        CHECK (from_status IN ('pending', 'approved', 'paid', 'rejected', 'cancelled')),
    to_status   TEXT NOT NULL
        CHECK (to_status IN ('pending', 'approved', 'paid', 'rejected', 'cancelled')),
    changed_by  UUID NOT NULL,
    comment     TEXT,
    changed_at  TIMESTAMPTZ NOT NULL
);

CREATE INDEX idx_cost_status_changes_cost ON cost_status_changes (cost_id, changed_at);
";

const BUDGET_STATUS_CHANGES_SQL: &str = r"
CREATE TABLE budget_status_changes (
    id          UUID PRIMARY KEY,
    budget_id   UUID NOT NULL REFERENCES budgets (id),
    from_status TEXT NOT NULL
        CHECK (from_status IN ('draft', 'pending', 'approved', 'rejected', 'cancelled')),
    to_status   TEXT NOT NULL
        CHECK (to_status IN ('draft', 'pending', 'approved', 'rejected', 'cancelled')),
    changed_by  UUID NOT NULL,
    comment     TEXT,
    changed_at  TIMESTAMPTZ NOT NULL
);

CREATE INDEX idx_budget_status_changes_budget ON budget_status_changes (budget_id, changed_at);
";
