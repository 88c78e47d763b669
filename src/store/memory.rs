//! In-memory transaction store
//!
//! Backs development runs without PostgreSQL and the test suite. Order ids
//! are reserved through a `DashMap` entry, which gives the same uniqueness
//! guarantee as the unique index of the SQL store.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicBool, Ordering};

use super::filter::ListFilter;
use super::{StoreError, TransactionStore};
use crate::remit::records::{CachedTxn, HistoryId, TransactionHistory};
use crate::remit::state::Step;
use crate::remit::types::TransactionId;

#[derive(Default)]
pub struct MemoryStore {
    cached: DashMap<TransactionId, CachedTxn>,
    order_ids: DashMap<String, TransactionId>,
    history: DashMap<HistoryId, TransactionHistory>,
    fail_history_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_history` fail (exercises the best-effort recorder)
    pub fn set_fail_history_writes(&self, fail: bool) {
        self.fail_history_writes.store(fail, Ordering::SeqCst);
    }

    pub fn cached_len(&self) -> usize {
        self.cached.len()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// All history rows of one transaction, oldest first
    pub fn history_for(&self, id: TransactionId) -> Vec<TransactionHistory> {
        let mut rows: Vec<_> = self
            .history
            .iter()
            .filter(|r| r.transaction_id == id)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        rows
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn create_cached_txn(&self, txn: &CachedTxn) -> Result<(), StoreError> {
        match self.order_ids.entry(txn.order_id.clone()) {
            Entry::Occupied(_) => {
                return Err(StoreError::Duplicate(format!("order id {}", txn.order_id)));
            }
            Entry::Vacant(slot) => {
                slot.insert(txn.transaction_id);
            }
        }
        self.cached.insert(txn.transaction_id, txn.clone());
        Ok(())
    }

    async fn get_cached_txn(&self, id: TransactionId) -> Result<Option<CachedTxn>, StoreError> {
        Ok(self.cached.get(&id).map(|r| r.value().clone()))
    }

    async fn update_cached_txn(&self, txn: &CachedTxn) -> Result<(), StoreError> {
        match self.cached.get_mut(&txn.transaction_id) {
            Some(existing) if existing.order_id != txn.order_id => Err(StoreError::Conflict(
                format!("order id of {} cannot change", txn.transaction_id),
            )),
            Some(mut existing) => {
                let mut updated = txn.clone();
                updated.updated_at = chrono::Utc::now();
                *existing = updated;
                Ok(())
            }
            None => Err(StoreError::NotFound(txn.transaction_id.to_string())),
        }
    }

    async fn update_step_if(
        &self,
        id: TransactionId,
        expected: Step,
        new: Step,
    ) -> Result<bool, StoreError> {
        // get_mut holds the shard write lock for the whole compare-and-set
        match self.cached.get_mut(&id) {
            Some(mut txn) if txn.step == expected => {
                txn.step = new;
                txn.updated_at = chrono::Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn create_history(&self, row: &TransactionHistory) -> Result<(), StoreError> {
        if self.fail_history_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Database("history writes disabled".to_string()));
        }
        match self.history.entry(row.id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(format!("history {}", row.id))),
            Entry::Vacant(slot) => {
                slot.insert(row.clone());
                Ok(())
            }
        }
    }

    async fn get_history(&self, id: HistoryId) -> Result<Option<TransactionHistory>, StoreError> {
        Ok(self.history.get(&id).map(|r| r.value().clone()))
    }

    async fn list_history(
        &self,
        filter: &ListFilter,
    ) -> Result<(Vec<TransactionHistory>, u64), StoreError> {
        let mut rows: Vec<TransactionHistory> = self
            .history
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        let total = rows.len() as u64;

        rows.sort_by(|a, b| filter.compare(a, b));
        let page = rows
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.effective_limit() as usize)
            .collect();

        Ok((page, total))
    }

    async fn update_history(&self, row: &TransactionHistory) -> Result<(), StoreError> {
        match self.history.get_mut(&row.id) {
            Some(mut existing) => {
                *existing = row.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(row.id.to_string())),
        }
    }

    async fn order_id_exists(&self, order_id: &str) -> Result<bool, StoreError> {
        Ok(self.order_ids.contains_key(order_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{InquireRequest, InquireResponse, LocationContext};
    use crate::remit::records::{DisburseStaged, StagedPayload};
    use crate::remit::state::{HistoryStatus, TxnKind};
    use crate::remit::types::Remittance;
    use crate::store::filter::{SortColumn, SortOrder};

    fn cached(order_id: &str) -> CachedTxn {
        let remittance = Remittance {
            order_id: order_id.into(),
            ..Default::default()
        };
        let payload = StagedPayload::Disburse(DisburseStaged {
            remittance,
            request: InquireRequest {
                control_number: "CTRL".into(),
                reference_number: "REF".into(),
                location: LocationContext::default(),
            },
            inquiry: InquireResponse::default(),
        });
        CachedTxn::staged(TransactionId::new(), "RIA", "teller", payload)
    }

    fn history(partner: &str) -> TransactionHistory {
        let rem = Remittance {
            partner_code: partner.into(),
            ..Default::default()
        };
        TransactionHistory::draft(TransactionId::new(), partner, TxnKind::Disburse, &rem)
    }

    #[tokio::test]
    async fn test_order_id_unique() {
        let store = MemoryStore::new();
        store.create_cached_txn(&cached("ORD1")).await.unwrap();
        assert!(store.order_id_exists("ORD1").await.unwrap());
        assert!(!store.order_id_exists("ORD2").await.unwrap());

        let err = store.create_cached_txn(&cached("ORD1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.cached_len(), 1);
    }

    #[tokio::test]
    async fn test_step_cas() {
        let store = MemoryStore::new();
        let txn = cached("ORD1");
        store.create_cached_txn(&txn).await.unwrap();

        assert!(store
            .update_step_if(txn.transaction_id, Step::Staged, Step::Processing)
            .await
            .unwrap());
        // Second claim loses
        assert!(!store
            .update_step_if(txn.transaction_id, Step::Staged, Step::Processing)
            .await
            .unwrap());
        // Unknown id
        assert!(!store
            .update_step_if(TransactionId::new(), Step::Staged, Step::Processing)
            .await
            .unwrap());

        let loaded = store.get_cached_txn(txn.transaction_id).await.unwrap().unwrap();
        assert_eq!(loaded.step, Step::Processing);
    }

    #[tokio::test]
    async fn test_update_missing_cached_txn() {
        let store = MemoryStore::new();
        let err = store.update_cached_txn(&cached("ORD1")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_order_id() {
        let store = MemoryStore::new();
        let txn = cached("ORD1");
        store.create_cached_txn(&txn).await.unwrap();

        let mut moved = txn.clone();
        moved.order_id = "ORD2".into();
        let err = store.update_cached_txn(&moved).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        assert!(store.order_id_exists("ORD1").await.unwrap());
        assert!(!store.order_id_exists("ORD2").await.unwrap());
        let stored = store.get_cached_txn(txn.transaction_id).await.unwrap().unwrap();
        assert_eq!(stored.order_id, "ORD1");

        // Same order id still updates
        let mut updated = txn.clone();
        updated.caller_id = "supervisor".into();
        store.update_cached_txn(&updated).await.unwrap();
        let stored = store.get_cached_txn(txn.transaction_id).await.unwrap().unwrap();
        assert_eq!(stored.caller_id, "supervisor");
    }

    #[tokio::test]
    async fn test_list_history_paging() {
        let store = MemoryStore::new();
        for partner in ["A", "B", "B", "C", "C"] {
            store.create_history(&history(partner)).await.unwrap();
        }

        let filter = ListFilter {
            exclude_partner: vec!["B".into()],
            sort_by: SortColumn::PartnerCode,
            sort_order: SortOrder::Asc,
            limit: Some(2),
            offset: 1,
            ..Default::default()
        };
        let (rows, total) = store.list_history(&filter).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.partner_code == "C"));
    }

    #[tokio::test]
    async fn test_history_update_and_failure_injection() {
        let store = MemoryStore::new();
        let mut row = history("A");
        store.create_history(&row).await.unwrap();

        row.status = HistoryStatus::Success;
        store.update_history(&row).await.unwrap();
        let loaded = store.get_history(row.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, HistoryStatus::Success);

        store.set_fail_history_writes(true);
        assert!(store.create_history(&history("A")).await.is_err());
        assert_eq!(store.history_len(), 1);
    }
}
