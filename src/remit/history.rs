//! Deferred history recorder
//!
//! A [`HistoryGuard`] is opened at the start of a stage or process call and
//! settled on its return path. The insert runs on a spawned task, so dropping
//! the caller's future while the insert is in flight does not lose the row.
//! A guard dropped without being settled (the caller's future was cancelled
//! mid-operation) still records a failed row.
//!
//! Recorder failures are logged and swallowed; they never replace the result
//! of the operation being recorded.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::error::RemitError;
use super::records::TransactionHistory;
use super::state::HistoryStatus;
use crate::store::TransactionStore;

pub const CANCELLED_MESSAGE: &str = "operation cancelled before completion";

pub struct HistoryGuard {
    store: Arc<dyn TransactionStore>,
    draft: Option<TransactionHistory>,
}

impl HistoryGuard {
    pub fn new(store: Arc<dyn TransactionStore>, draft: TransactionHistory) -> Self {
        Self {
            store,
            draft: Some(draft),
        }
    }

    /// The pending row, for filling in details learned during the operation
    pub fn row_mut(&mut self) -> Option<&mut TransactionHistory> {
        self.draft.as_mut()
    }

    /// Record the outcome of an operation
    ///
    /// `ok_status` is written when `result` is `Ok`; an `Err` is always
    /// written as `Failed` with the error columns filled in.
    pub async fn finish<T>(mut self, result: &Result<T, RemitError>, ok_status: HistoryStatus) {
        let Some(mut row) = self.draft.take() else {
            return;
        };
        match result {
            Ok(_) => {
                row.status = ok_status;
                if ok_status != HistoryStatus::Staged {
                    row.completed_at = Some(Utc::now());
                }
            }
            Err(e) => {
                row.set_error(e);
                row.completed_at = Some(Utc::now());
            }
        }
        Self::commit(self.store.clone(), row).await;
    }

    /// Record only when the operation failed
    pub async fn finish_failure_only<T>(self, result: &Result<T, RemitError>) {
        match result {
            Ok(_) => self.disarm(),
            Err(_) => self.finish(result, HistoryStatus::Failed).await,
        }
    }

    /// Drop the guard without recording anything
    pub fn disarm(mut self) {
        self.draft = None;
    }

    async fn commit(store: Arc<dyn TransactionStore>, row: TransactionHistory) {
        let history_id = row.id;
        let transaction_id = row.transaction_id;

        let task = tokio::spawn(async move { store.create_history(&row).await });
        match task.await {
            Ok(Ok(())) => {
                debug!(
                    history_id = %history_id,
                    transaction_id = %transaction_id,
                    "History row recorded"
                );
            }
            Ok(Err(e)) => {
                error!(
                    history_id = %history_id,
                    transaction_id = %transaction_id,
                    error = %e,
                    "Failed to record history row"
                );
            }
            Err(e) => {
                error!(
                    history_id = %history_id,
                    transaction_id = %transaction_id,
                    error = %e,
                    "History recorder task aborted"
                );
            }
        }
    }
}

impl Drop for HistoryGuard {
    fn drop(&mut self) {
        let Some(mut row) = self.draft.take() else {
            return;
        };
        row.set_error(&RemitError::internal(CANCELLED_MESSAGE));
        row.completed_at = Some(Utc::now());

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let store = self.store.clone();
                handle.spawn(async move {
                    if let Err(e) = store.create_history(&row).await {
                        error!(
                            transaction_id = %row.transaction_id,
                            error = %e,
                            "Failed to record cancelled operation"
                        );
                    }
                });
            }
            Err(_) => {
                warn!(
                    transaction_id = %row.transaction_id,
                    "No runtime available, cancelled operation not recorded"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remit::error::ErrorKind;
    use crate::remit::state::TxnKind;
    use crate::remit::types::{Remittance, TransactionId};
    use crate::store::MemoryStore;
    use std::time::Duration;

    fn draft(id: TransactionId) -> TransactionHistory {
        let rem = Remittance {
            order_id: "ORD1".into(),
            ..Default::default()
        };
        TransactionHistory::draft(id, "RIA", TxnKind::Disburse, &rem)
    }

    async fn wait_for_rows(store: &MemoryStore, expected: usize) {
        for _ in 0..50 {
            if store.history_len() >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_finish_success() {
        let store = Arc::new(MemoryStore::new());
        let id = TransactionId::new();
        let guard = HistoryGuard::new(store.clone(), draft(id));

        let result: Result<(), RemitError> = Ok(());
        guard.finish(&result, HistoryStatus::Success).await;

        let rows = store.history_for(id);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, HistoryStatus::Success);
        assert!(rows[0].completed_at.is_some());
    }

    #[tokio::test]
    async fn test_finish_staged_leaves_completion_empty() {
        let store = Arc::new(MemoryStore::new());
        let id = TransactionId::new();
        let guard = HistoryGuard::new(store.clone(), draft(id));

        let result: Result<(), RemitError> = Ok(());
        guard.finish(&result, HistoryStatus::Staged).await;

        let rows = store.history_for(id);
        assert_eq!(rows[0].status, HistoryStatus::Staged);
        assert!(rows[0].completed_at.is_none());
    }

    #[tokio::test]
    async fn test_finish_failure_only() {
        let store = Arc::new(MemoryStore::new());

        let ok: Result<(), RemitError> = Ok(());
        HistoryGuard::new(store.clone(), draft(TransactionId::new()))
            .finish_failure_only(&ok)
            .await;
        assert_eq!(store.history_len(), 0);

        let id = TransactionId::new();
        let err: Result<(), RemitError> = Err(RemitError::invalid_argument("bad currency"));
        HistoryGuard::new(store.clone(), draft(id))
            .finish_failure_only(&err)
            .await;
        let rows = store.history_for(id);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].error_kind, Some(ErrorKind::InvalidArgument));
    }

    #[tokio::test]
    async fn test_store_failure_is_swallowed() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_history_writes(true);

        let result: Result<(), RemitError> = Err(RemitError::not_found("missing"));
        HistoryGuard::new(store.clone(), draft(TransactionId::new()))
            .finish(&result, HistoryStatus::Success)
            .await;
        assert_eq!(store.history_len(), 0);
    }

    #[tokio::test]
    async fn test_dropped_guard_records_cancellation() {
        let store = Arc::new(MemoryStore::new());
        let id = TransactionId::new();
        {
            let _guard = HistoryGuard::new(store.clone(), draft(id));
        }
        wait_for_rows(&store, 1).await;

        let rows = store.history_for(id);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, HistoryStatus::Failed);
        assert_eq!(rows[0].error_message.as_deref(), Some(CANCELLED_MESSAGE));
    }

    #[tokio::test]
    async fn test_disarm_records_nothing() {
        let store = Arc::new(MemoryStore::new());
        HistoryGuard::new(store.clone(), draft(TransactionId::new())).disarm();
        tokio::task::yield_now().await;
        assert_eq!(store.history_len(), 0);
    }
}
