//! Cebuana Lhuillier

use super::RemitAdapter;
use super::common::{ErrorRule, map_with_table};
use super::profile::PartnerProfile;
use crate::client::PartnerError;
use crate::money::Currency;
use crate::remit::error::{ErrorKind, RemitError};

pub const CEBUANA_ERRORS: &[ErrorRule] = &[
    ErrorRule::new("CL-0001", ErrorKind::NotFound, "control number not found"),
    ErrorRule::new("CL-0002", ErrorKind::AlreadyExists, "transaction already paid out"),
    ErrorRule::new(
        "CL-0003",
        ErrorKind::FailedPrecondition,
        "transaction is blocked pending compliance review",
    ),
    ErrorRule::new("CL-0101", ErrorKind::InvalidArgument, "invalid receiver details"),
    ErrorRule::new("CL-0102", ErrorKind::InvalidArgument, "invalid beneficiary"),
    ErrorRule::new("CL-0500", ErrorKind::Internal, "partner system error"),
];

pub fn handle_cebuana_error(err: &PartnerError) -> RemitError {
    map_with_table(err, CEBUANA_ERRORS)
}

pub struct Cebuana;

impl PartnerProfile for Cebuana {
    const CODE: &'static str = "CEB";
    const NAME: &'static str = "Cebuana Lhuillier";
    const SUPPORTS_SEND: bool = true;
    const ACCEPTED_CURRENCIES: &'static [Currency] = &[Currency::PHP];
    const AWAITING_PAYMENT: &'static [&'static str] = &["OUTSTANDING", "UNPAID"];
    const QUOTE_ACCEPTED: &'static [&'static str] = &["OK"];
    const ECHO_FIELDS: &'static [&'static str] = &["beneficiaryId", "sendOutId"];

    fn handle_error(err: &PartnerError) -> RemitError {
        handle_cebuana_error(err)
    }
}

pub type CebuanaAdapter = RemitAdapter<Cebuana>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{LocationContext, MockPartnerClient};
    use crate::money::Money;
    use crate::partners::PartnerAdapter;
    use crate::remit::types::{PersonName, Remittance};
    use crate::store::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_error_table() {
        for rule in CEBUANA_ERRORS {
            let err = PartnerError::partner(rule.code, "cebuana error", Some(400));
            assert_eq!(handle_cebuana_error(&err).kind(), rule.kind, "code {}", rule.code);
        }
    }

    #[tokio::test]
    async fn test_usd_send_rejected_before_partner_call() {
        let client = Arc::new(MockPartnerClient::new("CEB"));
        let adapter = CebuanaAdapter::new(
            client.clone(),
            Arc::new(MemoryStore::new()),
            LocationContext::default(),
            Duration::from_secs(1),
        );

        let mut rem = Remittance {
            order_id: "ORD-CEB-1".into(),
            dest_country: "PH".into(),
            source_amount: Some(Money::from_minor(10_000, Currency::USD)),
            ..Default::default()
        };
        rem.remitter.name = PersonName::new("Ana", "Reyes");
        rem.receiver.name = PersonName::new("Ben", "Reyes");

        let err = adapter.stage_create_remit(rem).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(client.call_count(), 0);
    }
}
