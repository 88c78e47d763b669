//! Remittance Orchestrator
//!
//! Single entry point for callers. Holds every [`PartnerAdapter`] keyed by
//! partner code and dispatches to it; the only logic of its own is listing
//! history and resolving the owner of a transaction id.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::error::RemitError;
use super::records::{HistoryId, TransactionHistory};
use super::types::{ProcessRemit, RemitResponse, Remittance, SearchRemit, TransactionId};
use crate::partners::PartnerAdapter;
use crate::store::{ListFilter, TransactionStore};

/// Adapter registration errors, raised once at startup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("adapter reported an empty partner code")]
    EmptyPartnerCode,

    #[error("partner {0} registered twice")]
    DuplicatePartner(String),

    #[error("unknown partner code: {0}")]
    UnknownPartner(String),

    #[error("partner client setup failed: {0}")]
    Client(String),
}

pub struct RemitOrchestrator {
    adapters: HashMap<String, Arc<dyn PartnerAdapter>>,
    store: Arc<dyn TransactionStore>,
}

impl RemitOrchestrator {
    /// Build the registry; fails on an empty or duplicate partner code
    pub fn new(
        adapters: Vec<Arc<dyn PartnerAdapter>>,
        store: Arc<dyn TransactionStore>,
    ) -> Result<Self, RegistryError> {
        let mut registry = HashMap::with_capacity(adapters.len());
        for adapter in adapters {
            let code = adapter.kind().trim().to_ascii_uppercase();
            if code.is_empty() {
                return Err(RegistryError::EmptyPartnerCode);
            }
            if registry.contains_key(&code) {
                return Err(RegistryError::DuplicatePartner(code));
            }
            registry.insert(code, adapter);
        }

        info!(partners = registry.len(), "Remittance orchestrator ready");
        Ok(Self {
            adapters: registry,
            store,
        })
    }

    fn adapter(&self, partner_code: &str) -> Result<&Arc<dyn PartnerAdapter>, RemitError> {
        self.adapters
            .get(&partner_code.trim().to_ascii_uppercase())
            .ok_or_else(|| {
                RemitError::not_supported(format!("partner {} is not supported", partner_code))
            })
    }

    /// Registered partner codes, sorted
    pub fn partners(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.adapters.keys().cloned().collect();
        codes.sort();
        codes
    }

    pub async fn stage_create_remit(
        &self,
        remittance: Remittance,
        partner_code: &str,
    ) -> Result<RemitResponse, RemitError> {
        let adapter = self.adapter(partner_code)?;
        debug!(partner = adapter.kind(), order_id = %remittance.order_id, "StageCreateRemit");
        adapter.stage_create_remit(remittance).await
    }

    pub async fn stage_disburse_remit(
        &self,
        remittance: Remittance,
        partner_code: &str,
    ) -> Result<Remittance, RemitError> {
        let adapter = self.adapter(partner_code)?;
        debug!(partner = adapter.kind(), order_id = %remittance.order_id, "StageDisburseRemit");
        adapter.stage_disburse_remit(remittance).await
    }

    pub async fn process_remit(
        &self,
        req: ProcessRemit,
        partner_code: &str,
    ) -> Result<ProcessRemit, RemitError> {
        let adapter = self.adapter(partner_code)?;
        adapter.process_remit(req).await
    }

    pub async fn search_remit(
        &self,
        req: SearchRemit,
        partner_code: &str,
    ) -> Result<SearchRemit, RemitError> {
        let adapter = self.adapter(partner_code)?;
        adapter.search(req).await
    }

    /// Partner code owning an in-flight transaction
    pub async fn get_partner_by_txn_id(&self, id: TransactionId) -> Result<String, RemitError> {
        let txn = self
            .store
            .get_cached_txn(id)
            .await?
            .ok_or_else(|| RemitError::not_found("transaction not found"))?;
        Ok(txn.partner_code)
    }

    /// Page of history rows plus the unpaged total
    ///
    /// Reads the store directly. An empty page is `NotFound`.
    pub async fn list_remit(
        &self,
        filter: &ListFilter,
    ) -> Result<(Vec<TransactionHistory>, u64), RemitError> {
        if let (Some(from), Some(until)) = (filter.from, filter.until)
            && from > until
        {
            return Err(RemitError::invalid_argument("from must not be after until"));
        }

        let (rows, total) = self.store.list_history(filter).await?;
        if rows.is_empty() {
            return Err(RemitError::not_found("no history rows match the filter"));
        }
        Ok((rows, total))
    }

    pub async fn get_history(&self, id: HistoryId) -> Result<TransactionHistory, RemitError> {
        self.store
            .get_history(id)
            .await?
            .ok_or_else(|| RemitError::not_found("history row not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remit::error::ErrorKind;
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    struct FixedAdapter(&'static str);

    #[async_trait]
    impl PartnerAdapter for FixedAdapter {
        fn kind(&self) -> &str {
            self.0
        }

        fn supports_send(&self) -> bool {
            false
        }

        async fn stage_create_remit(&self, _: Remittance) -> Result<RemitResponse, RemitError> {
            Err(RemitError::unavailable("no send"))
        }

        async fn stage_disburse_remit(&self, r: Remittance) -> Result<Remittance, RemitError> {
            Ok(r)
        }

        async fn process_remit(&self, r: ProcessRemit) -> Result<ProcessRemit, RemitError> {
            Ok(r)
        }

        async fn search(&self, r: SearchRemit) -> Result<SearchRemit, RemitError> {
            Ok(r)
        }
    }

    fn adapters(codes: &[&'static str]) -> Vec<Arc<dyn PartnerAdapter>> {
        codes
            .iter()
            .map(|c| Arc::new(FixedAdapter(*c)) as Arc<dyn PartnerAdapter>)
            .collect()
    }

    #[test]
    fn test_registry_rejects_empty_and_duplicate() {
        let store: Arc<dyn TransactionStore> = Arc::new(MemoryStore::new());

        let err = RemitOrchestrator::new(adapters(&["RIA", " "]), store.clone()).err();
        assert_eq!(err, Some(RegistryError::EmptyPartnerCode));

        let err = RemitOrchestrator::new(adapters(&["RIA", "ria"]), store.clone()).err();
        assert_eq!(err, Some(RegistryError::DuplicatePartner("RIA".into())));

        let orch = RemitOrchestrator::new(adapters(&["UNT", "CEB"]), store).unwrap();
        assert_eq!(orch.partners(), vec!["CEB".to_string(), "UNT".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_partner_not_supported() {
        let orch =
            RemitOrchestrator::new(adapters(&["RIA"]), Arc::new(MemoryStore::new())).unwrap();
        let err = orch
            .stage_disburse_remit(Remittance::default(), "NOPE")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);

        // Lookup is case-insensitive
        assert!(orch.stage_disburse_remit(Remittance::default(), "ria").await.is_ok());
    }

    #[tokio::test]
    async fn test_list_rejects_inverted_range() {
        let orch =
            RemitOrchestrator::new(adapters(&["RIA"]), Arc::new(MemoryStore::new())).unwrap();
        let now = chrono::Utc::now();
        let filter = ListFilter {
            from: Some(now),
            until: Some(now - chrono::Duration::hours(1)),
            ..Default::default()
        };
        let err = orch.list_remit(&filter).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = orch.list_remit(&ListFilter::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_unknown_txn_id() {
        let orch =
            RemitOrchestrator::new(adapters(&["RIA"]), Arc::new(MemoryStore::new())).unwrap();
        let err = orch.get_partner_by_txn_id(TransactionId::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = orch.get_history(ulid::Ulid::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
