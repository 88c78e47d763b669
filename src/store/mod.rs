//! Transaction Store
//!
//! Durable storage for cached (staged) transactions and transaction history,
//! shared by every adapter. There is no partner-specific locking: correctness
//! rests on the order-id uniqueness check and the conditional `Step` update.

pub mod filter;
pub mod memory;
pub mod postgres;
pub mod schema;

pub use filter::{ListFilter, SortColumn, SortOrder};
pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::remit::records::{CachedTxn, HistoryId, TransactionHistory};
use crate::remit::state::Step;
use crate::remit::types::TransactionId;

/// Store error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// PostgreSQL unique_violation
const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
        {
            return StoreError::Duplicate(db_err.message().to_string());
        }
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Persistence contract used by adapters and the orchestrator
///
/// Implementations must be safe for concurrent use by many requests.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Insert a cached transaction. Fails with `Duplicate` if the order id is taken.
    async fn create_cached_txn(&self, txn: &CachedTxn) -> Result<(), StoreError>;

    async fn get_cached_txn(&self, id: TransactionId) -> Result<Option<CachedTxn>, StoreError>;

    /// Overwrite a cached transaction. Fails with `NotFound` if absent and
    /// with `Conflict` if the order id differs from the stored one.
    async fn update_cached_txn(&self, txn: &CachedTxn) -> Result<(), StoreError>;

    /// Atomic CAS on `step`
    ///
    /// Returns true if the step was `expected` and is now `new`.
    async fn update_step_if(
        &self,
        id: TransactionId,
        expected: Step,
        new: Step,
    ) -> Result<bool, StoreError>;

    async fn create_history(&self, row: &TransactionHistory) -> Result<(), StoreError>;

    async fn get_history(&self, id: HistoryId) -> Result<Option<TransactionHistory>, StoreError>;

    /// Rows matching `filter` for the requested page, plus the unpaged total
    async fn list_history(
        &self,
        filter: &ListFilter,
    ) -> Result<(Vec<TransactionHistory>, u64), StoreError>;

    /// Administrative correction only
    async fn update_history(&self, row: &TransactionHistory) -> Result<(), StoreError>;

    /// Idempotency lookup on the caller order id
    async fn order_id_exists(&self, order_id: &str) -> Result<bool, StoreError>;
}
