//! PostgreSQL schema for the transaction store

use sqlx::PgPool;

const CREATE_CACHED_TXN_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS remit_cached_txn_tb (
    transaction_id  VARCHAR(26) PRIMARY KEY,
    order_id        VARCHAR(64) NOT NULL,
    caller_id       VARCHAR(64) NOT NULL DEFAULT '',
    org_id          BIGINT NOT NULL DEFAULT 0,
    partner_code    VARCHAR(16) NOT NULL,
    txn_kind        SMALLINT NOT NULL,
    step            SMALLINT NOT NULL,
    payload         JSONB NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

// Closes the gap between order_id_exists() and the insert
const CREATE_ORDER_ID_INDEX: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS uk_remit_cached_txn_order_id
    ON remit_cached_txn_tb (order_id)
"#;

const CREATE_HISTORY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS remit_history_tb (
    history_id      VARCHAR(26) PRIMARY KEY,
    transaction_id  VARCHAR(26) NOT NULL,
    org_id          BIGINT NOT NULL DEFAULT 0,
    order_id        VARCHAR(64) NOT NULL DEFAULT '',
    control_number  VARCHAR(64) NOT NULL DEFAULT '',
    partner_code    VARCHAR(16) NOT NULL,
    txn_kind        SMALLINT NOT NULL,
    remit_type      VARCHAR(32) NOT NULL DEFAULT '',
    status          SMALLINT NOT NULL,
    error_kind      VARCHAR(32),
    error_code      VARCHAR(64),
    error_message   TEXT,
    remittance      JSONB NOT NULL,
    staged_at       TIMESTAMPTZ NOT NULL,
    completed_at    TIMESTAMPTZ,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_HISTORY_ORG_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_remit_history_org_created
    ON remit_history_tb (org_id, created_at)
"#;

const CREATE_HISTORY_TXN_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_remit_history_transaction_id
    ON remit_history_tb (transaction_id)
"#;

/// Create tables and indexes if they do not exist
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Initializing transaction store schema...");

    for statement in [
        CREATE_CACHED_TXN_TABLE,
        CREATE_ORDER_ID_INDEX,
        CREATE_HISTORY_TABLE,
        CREATE_HISTORY_ORG_INDEX,
        CREATE_HISTORY_TXN_INDEX,
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Transaction store schema initialized");
    Ok(())
}
