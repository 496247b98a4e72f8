//! Initial database migration.
//!
//! Creates the account and item catalogs, the point-of-sale order feed, the
//! three draft tables and the append-only ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: CATALOGS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(ITEMS_SQL).await?;

        // ============================================================
        // PART 2: POINT-OF-SALE FEED
        // ============================================================
        db.execute_unprepared(POS_ORDERS_SQL).await?;

        // ============================================================
        // PART 3: DRAFTS
        // ============================================================
        db.execute_unprepared(REIMBURSEMENTS_SQL).await?;
        db.execute_unprepared(SALES_SUMMARIES_SQL).await?;
        db.execute_unprepared(PAYROLL_ENTRIES_SQL).await?;

        // ============================================================
        // PART 4: LEDGER
        // ============================================================
        db.execute_unprepared(CASH_TRANSACTIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    code VARCHAR(32) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    is_cash BOOLEAN NOT NULL DEFAULT FALSE,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const ITEMS_SQL: &str = r"
CREATE TABLE items (
    id UUID PRIMARY KEY,
    code VARCHAR(32) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    keywords TEXT NOT NULL DEFAULT '',
    unit VARCHAR(32),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_items_active ON items(code) WHERE is_active;
";

const POS_ORDERS_SQL: &str = r"
CREATE TABLE pos_orders (
    id UUID PRIMARY KEY,
    order_number VARCHAR(64) NOT NULL UNIQUE,
    outlet_id UUID,
    business_date DATE NOT NULL,
    channel VARCHAR(64) NOT NULL,
    payment_method VARCHAR(64) NOT NULL,
    status VARCHAR(16) NOT NULL CHECK (status IN ('open', 'completed', 'cancelled')),
    gross_amount NUMERIC(18, 2) NOT NULL CHECK (gross_amount >= 0),
    discount_amount NUMERIC(18, 2) NOT NULL DEFAULT 0 CHECK (discount_amount >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_pos_orders_completed ON pos_orders(business_date, outlet_id)
    WHERE status = 'completed';
";

const REIMBURSEMENTS_SQL: &str = r"
CREATE TABLE reimbursements (
    id UUID PRIMARY KEY,
    entry_date DATE NOT NULL,
    item_id UUID REFERENCES items(id),
    description TEXT NOT NULL,
    quantity NUMERIC(18, 4) NOT NULL CHECK (quantity > 0),
    unit VARCHAR(32),
    unit_price NUMERIC(28, 10) NOT NULL CHECK (unit_price >= 0),
    amount NUMERIC(18, 2) NOT NULL,
    line_type VARCHAR(16) NOT NULL CHECK (line_type IN
        ('INVENTORY', 'EXPENSE', 'SALES', 'COGS', 'ASSET', 'LIABILITY', 'CAPITAL', 'DRAWING')),
    account_id UUID NOT NULL REFERENCES accounts(id),
    cash_account_id UUID REFERENCES accounts(id),
    outlet_id UUID,
    status VARCHAR(16) NOT NULL DEFAULT 'draft' CHECK (status IN ('draft', 'ready', 'posted')),
    batch_code VARCHAR(32),
    requested_by VARCHAR(255) NOT NULL,
    receipt_ref VARCHAR(255),
    posted_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CHECK (status = 'draft' OR batch_code IS NOT NULL)
);

CREATE INDEX idx_reimbursements_status ON reimbursements(status);
CREATE INDEX idx_reimbursements_batch ON reimbursements(batch_code) WHERE batch_code IS NOT NULL;
";

const SALES_SUMMARIES_SQL: &str = r"
CREATE TABLE sales_summaries (
    id UUID PRIMARY KEY,
    business_date DATE NOT NULL,
    outlet_id UUID,
    channel VARCHAR(64) NOT NULL,
    payment_method VARCHAR(64) NOT NULL,
    order_count BIGINT NOT NULL CHECK (order_count >= 0),
    gross_sales NUMERIC(18, 2) NOT NULL,
    discount_total NUMERIC(18, 2) NOT NULL,
    net_sales NUMERIC(18, 2) NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    cash_account_id UUID REFERENCES accounts(id),
    status VARCHAR(16) NOT NULL DEFAULT 'draft' CHECK (status IN ('draft', 'posted')),
    posted_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE UNIQUE INDEX uq_sales_summaries_key ON sales_summaries (
    business_date,
    COALESCE(outlet_id, '00000000-0000-0000-0000-000000000000'::uuid),
    channel,
    payment_method
);
";

const PAYROLL_ENTRIES_SQL: &str = r"
CREATE TABLE payroll_entries (
    id UUID PRIMARY KEY,
    payroll_date DATE NOT NULL,
    period VARCHAR(32) NOT NULL,
    employee_name VARCHAR(255) NOT NULL,
    gross_pay NUMERIC(18, 2) NOT NULL CHECK (gross_pay > 0),
    payment_method VARCHAR(64) NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    cash_account_id UUID REFERENCES accounts(id),
    outlet_id UUID,
    status VARCHAR(16) NOT NULL DEFAULT 'draft' CHECK (status IN ('draft', 'posted')),
    created_by VARCHAR(255) NOT NULL,
    posted_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_payroll_entries_period ON payroll_entries(period, status);
";

const CASH_TRANSACTIONS_SQL: &str = r"
CREATE TABLE cash_transactions (
    id UUID PRIMARY KEY,
    code VARCHAR(32) NOT NULL UNIQUE,
    transaction_date DATE NOT NULL,
    item_id UUID REFERENCES items(id),
    description TEXT NOT NULL,
    quantity NUMERIC(18, 4) NOT NULL,
    unit_price NUMERIC(28, 10) NOT NULL,
    amount NUMERIC(18, 2) NOT NULL,
    line_type VARCHAR(16) NOT NULL CHECK (line_type IN
        ('INVENTORY', 'EXPENSE', 'SALES', 'COGS', 'ASSET', 'LIABILITY', 'CAPITAL', 'DRAWING')),
    account_id UUID NOT NULL REFERENCES accounts(id),
    cash_account_id UUID REFERENCES accounts(id),
    outlet_id UUID,
    batch_code VARCHAR(32),
    source_kind VARCHAR(16) NOT NULL CHECK (source_kind IN ('reimbursement', 'sales', 'payroll')),
    source_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_cash_transactions_date ON cash_transactions(transaction_date);
CREATE INDEX idx_cash_transactions_source ON cash_transactions(source_kind, source_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS cash_transactions;
DROP TABLE IF EXISTS payroll_entries;
DROP TABLE IF EXISTS sales_summaries;
DROP TABLE IF EXISTS reimbursements;
DROP TABLE IF EXISTS pos_orders;
DROP TABLE IF EXISTS items;
DROP TABLE IF EXISTS accounts;
";
