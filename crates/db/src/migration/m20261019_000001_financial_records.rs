//! Financial record tables: costs, budgets and budget items.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(COSTS_SQL).await?;
        db.execute_unprepared(BUDGETS_SQL).await?;
        db.execute_unprepared(BUDGET_ITEMS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r"
            DROP TABLE IF EXISTS budget_items;
            DROP TABLE IF EXISTS budgets;
            DROP TABLE IF EXISTS costs;
            ",
        )
        .await?;

        Ok(())
    }
}

const COSTS_SQL: &str = r"
CREATE TABLE costs (
    id                UUID PRIMARY KEY,
    project_id        UUID NOT NULL,
    cost_type         TEXT NOT NULL
        CHECK (cost_type IN ('labor', 'material', 'equipment', 'subcontract', 'indirect', 'other')),
    category          TEXT NOT NULL,
    amount            NUMERIC(20, 2) CHECK (amount >= 0),
    payment_date      TIMESTAMP,
    description       TEXT,
    vendor_id         UUID,
    department_id     UUID,
    invoice_number    TEXT,
    payment_status    TEXT NOT NULL DEFAULT 'pending'
        CHECK (payment_status IN ('pending', 'approved', 'paid', 'rejected', 'cancelled')),
    approved_by       UUID,
    approved_at       TIMESTAMPTZ,
    status_changed_by UUID,
    status_comment    TEXT,
    created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at        TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    deleted_at        TIMESTAMPTZ
);

CREATE INDEX idx_costs_project_payment_date ON costs (project_id, payment_date)
    WHERE deleted_at IS NULL;
CREATE INDEX idx_costs_project_status ON costs (project_id, payment_status)
    WHERE deleted_at IS NULL;
";

const BUDGETS_SQL: &str = r"
CREATE TABLE budgets (
    id                  UUID PRIMARY KEY,
    project_id          UUID NOT NULL,
    year                INTEGER NOT NULL CHECK (year BETWEEN 1 AND 9999),
    month               INTEGER CHECK (month BETWEEN 1 AND 12),
    total_amount        NUMERIC(20, 2) NOT NULL CHECK (total_amount >= 0),
    description         TEXT,
    status              TEXT NOT NULL DEFAULT 'draft'
        CHECK (status IN ('draft', 'pending', 'approved', 'rejected', 'cancelled')),
    version             INTEGER NOT NULL DEFAULT 1 CHECK (version >= 1),
    previous_version_id UUID REFERENCES budgets (id),
    status_changed_by   UUID,
    status_comment      TEXT,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_budgets_project_period_version
        UNIQUE NULLS NOT DISTINCT (project_id, year, month, version)
);

CREATE INDEX idx_budgets_project_year ON budgets (project_id, year);
";

const BUDGET_ITEMS_SQL: &str = r"
CREATE TABLE budget_items (
    id          UUID PRIMARY KEY,
    budget_id   UUID NOT NULL REFERENCES budgets (id) ON DELETE CASCADE,
    cost_type   TEXT NOT NULL
        CHECK (cost_type IN ('labor', 'material', 'equipment', 'subcontract', 'indirect', 'other')),
    subcategory TEXT NOT NULL,
    amount      NUMERIC(20, 2) CHECK (amount >= 0),
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_budget_items_budget ON budget_items (budget_id);
";
