//! BPI

use super::RemitAdapter;
use super::common::{ErrorRule, map_with_table};
use super::profile::{PartnerProfile, require_receiver_id};
use crate::client::PartnerError;
use crate::money::Currency;
use crate::remit::error::{ErrorKind, RemitError};
use crate::remit::types::Remittance;

pub const BPI_ERRORS: &[ErrorRule] = &[
    ErrorRule::new("E001", ErrorKind::NotFound, "reference number not found"),
    ErrorRule::new("E002", ErrorKind::AlreadyExists, "transaction already paid"),
    ErrorRule::new("E003", ErrorKind::InvalidArgument, "transaction expired"),
    ErrorRule::new(
        "E004",
        ErrorKind::FailedPrecondition,
        "transaction is on compliance hold",
    ),
    ErrorRule::new("E010", ErrorKind::InvalidArgument, "invalid receiver identification"),
    ErrorRule::new("E099", ErrorKind::Internal, "partner system error"),
];

pub fn handle_bpi_error(err: &PartnerError) -> RemitError {
    map_with_table(err, BPI_ERRORS)
}

pub struct Bpi;

impl PartnerProfile for Bpi {
    const CODE: &'static str = "BPI";
    const NAME: &'static str = "BPI";
    const SUPPORTS_SEND: bool = false;
    const ACCEPTED_CURRENCIES: &'static [Currency] = &[Currency::PHP, Currency::USD];
    const AWAITING_PAYMENT: &'static [&'static str] = &["UNPAID", "AVAILABLE"];
    const ECHO_FIELDS: &'static [&'static str] = &["bpiReference"];

    fn handle_error(err: &PartnerError) -> RemitError {
        handle_bpi_error(err)
    }

    fn check_disburse(remittance: &Remittance) -> Result<(), RemitError> {
        require_receiver_id(remittance)
    }
}

pub type BpiAdapter = RemitAdapter<Bpi>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{LocationContext, MockPartnerClient};
    use crate::partners::PartnerAdapter;
    use crate::store::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_error_table() {
        for rule in BPI_ERRORS {
            let err = PartnerError::partner(rule.code, "bpi error", Some(400));
            assert_eq!(handle_bpi_error(&err).kind(), rule.kind, "code {}", rule.code);
        }
    }

    #[tokio::test]
    async fn test_missing_id_rejected_before_inquiry() {
        let client = Arc::new(MockPartnerClient::new("BPI"));
        let store = Arc::new(MemoryStore::new());
        let adapter = BpiAdapter::new(
            client.clone(),
            store.clone(),
            LocationContext::default(),
            Duration::from_secs(1),
        );

        let err = adapter
            .stage_disburse_remit(Remittance {
                order_id: "ORD-BPI-1".into(),
                control_number: "BPI0001".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(client.inquire_count(), 0);
        assert_eq!(store.cached_len(), 0);
        // Failed disburse stages are audited
        assert_eq!(store.history_len(), 1);
    }
}
