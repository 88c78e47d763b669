//! Western Union
//!
//! Supports both directions. On send, WU assigns the MTCN at validation time
//! and returns it in the quote; the confirm call replays the stored quote.

use super::RemitAdapter;
use super::common::{ErrorRule, map_with_table};
use super::profile::PartnerProfile;
use crate::client::PartnerError;
use crate::money::Currency;
use crate::remit::error::{ErrorKind, RemitError};

pub const WU_ERRORS: &[ErrorRule] = &[
    ErrorRule::new("C1001", ErrorKind::InvalidArgument, "invalid control number format"),
    ErrorRule::new("C1009", ErrorKind::NotFound, "control number not found"),
    ErrorRule::new("C2011", ErrorKind::AlreadyExists, "transaction already paid"),
    ErrorRule::new("C2013", ErrorKind::FailedPrecondition, "transaction is on hold"),
    ErrorRule::new("C3004", ErrorKind::InvalidArgument, "amount exceeds partner limit"),
    ErrorRule::new("C3010", ErrorKind::InvalidArgument, "destination country not served"),
    ErrorRule::new(
        "C4001",
        ErrorKind::FailedPrecondition,
        "receiver must be verified before payout",
    ),
    ErrorRule::new("C5000", ErrorKind::Internal, "partner system error"),
    ErrorRule::new("C5003", ErrorKind::Internal, "partner system unavailable"),
];

pub fn handle_wu_error(err: &PartnerError) -> RemitError {
    map_with_table(err, WU_ERRORS)
}

pub struct WesternUnion;

impl PartnerProfile for WesternUnion {
    const CODE: &'static str = "WU";
    const NAME: &'static str = "Western Union";
    const SUPPORTS_SEND: bool = true;
    const ACCEPTED_CURRENCIES: &'static [Currency] = &[Currency::PHP, Currency::USD];
    const AWAITING_PAYMENT: &'static [&'static str] = &["W/C", "AVAILABLE", "TO BE PAID"];
    const QUOTE_ACCEPTED: &'static [&'static str] = &["OK", "VALIDATED"];
    const ECHO_FIELDS: &'static [&'static str] = &["mtcn", "moneyTransferKey", "newMtcn"];

    fn handle_error(err: &PartnerError) -> RemitError {
        handle_wu_error(err)
    }
}

pub type WuAdapter = RemitAdapter<WesternUnion>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{LocationContext, MockPartnerClient, SendQuote};
    use crate::money::Money;
    use crate::partners::PartnerAdapter;
    use crate::remit::types::{Agent, PersonName, ProcessRemit, Remittance};
    use crate::store::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_error_table() {
        for rule in WU_ERRORS {
            let err = PartnerError::partner(rule.code, "wu rejected", Some(200));
            assert_eq!(handle_wu_error(&err).kind(), rule.kind, "code {}", rule.code);
        }
    }

    #[test]
    fn test_transport_failure_is_internal() {
        let err = PartnerError::timeout(Duration::from_secs(30));
        assert_eq!(handle_wu_error(&err).kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_send_uses_quoted_mtcn() {
        let client = Arc::new(MockPartnerClient::new("WU"));
        client.set_quote(SendQuote {
            status: "OK".into(),
            currency: "USD".into(),
            principal_amount: "100.00".into(),
            service_charge: "5.00".into(),
            tax: "0.60".into(),
            control_number: "MTCN0001".into(),
            ..Default::default()
        });
        let adapter = WuAdapter::new(
            client.clone(),
            Arc::new(MemoryStore::new()),
            LocationContext::default(),
            Duration::from_secs(1),
        );

        let mut rem = Remittance {
            order_id: "ORD-WU-1".into(),
            dest_country: "US".into(),
            source_amount: Some(Money::from_minor(10_000, Currency::USD)),
            ..Default::default()
        };
        rem.remitter.name = PersonName::new("Maria", "Santos");
        rem.receiver.name = PersonName::new("John", "Smith");

        let resp = adapter.stage_create_remit(rem).await.unwrap();
        assert_eq!(resp.gross_total, Money::from_minor(10_560, Currency::USD));

        let done = adapter
            .process_remit(ProcessRemit::new(resp.transaction_id))
            .await
            .unwrap();
        assert_eq!(done.control_number, "MTCN0001");
        assert_eq!(client.send_count(), 1);
        assert_eq!(client.last_send().unwrap().quote.control_number, "MTCN0001");
    }

    #[tokio::test]
    async fn test_send_confirmed_by_another_teller() {
        let client = Arc::new(MockPartnerClient::new("WU"));
        client.set_quote(SendQuote {
            status: "OK".into(),
            currency: "PHP".into(),
            principal_amount: "1000.00".into(),
            service_charge: "50.00".into(),
            tax: "6.00".into(),
            control_number: "MTCN0002".into(),
            ..Default::default()
        });
        let adapter = WuAdapter::new(
            client.clone(),
            Arc::new(MemoryStore::new()),
            LocationContext::default(),
            Duration::from_secs(1),
        );

        let mut rem = Remittance {
            order_id: "ORD-WU-2".into(),
            dest_country: "PH".into(),
            source_amount: Some(Money::from_minor(100_000, Currency::PHP)),
            agent: Agent {
                user_id: "stager".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        rem.remitter.name = PersonName::new("Andres", "Bonifacio");
        rem.receiver.name = PersonName::new("Gregoria", "de Jesus");
        let resp = adapter.stage_create_remit(rem).await.unwrap();

        let mut req = ProcessRemit::new(resp.transaction_id);
        req.caller_id = "confirmer".into();
        req.agent = Agent {
            user_id: "confirmer".into(),
            location_id: "BR-22".into(),
            ..Default::default()
        };
        adapter.process_remit(req).await.unwrap();

        let sent = client.last_send().unwrap();
        assert_eq!(sent.request.agent.user_id, "confirmer");
        assert_eq!(sent.request.agent.location_id, "BR-22");
        assert_eq!(sent.caller_id, "confirmer");
        assert_eq!(sent.quote.control_number, "MTCN0002");
    }
}
