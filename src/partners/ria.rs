//! Ria
//!
//! Disburse only. Payout must carry the `orderNo` and `pin` returned by the
//! inquiry, otherwise Ria rejects it as an unknown order.

use super::RemitAdapter;
use super::common::{ErrorRule, map_with_table};
use super::profile::PartnerProfile;
use crate::client::PartnerError;
use crate::money::Currency;
use crate::remit::error::{ErrorKind, RemitError};

pub const RIA_ERRORS: &[ErrorRule] = &[
    ErrorRule::new("1001", ErrorKind::NotFound, "control number not found"),
    ErrorRule::new("1002", ErrorKind::AlreadyExists, "transaction already paid"),
    ErrorRule::new("1003", ErrorKind::FailedPrecondition, "transaction is on hold"),
    ErrorRule::new("1004", ErrorKind::InvalidArgument, "transaction was cancelled"),
    ErrorRule::new("1010", ErrorKind::InvalidArgument, "invalid pin"),
    ErrorRule::new("1022", ErrorKind::InvalidArgument, "payout amount mismatch"),
    ErrorRule::new("9000", ErrorKind::Internal, "partner system error"),
];

pub fn handle_ria_error(err: &PartnerError) -> RemitError {
    map_with_table(err, RIA_ERRORS)
}

pub struct Ria;

impl PartnerProfile for Ria {
    const CODE: &'static str = "RIA";
    const NAME: &'static str = "Ria";
    const SUPPORTS_SEND: bool = false;
    const ACCEPTED_CURRENCIES: &'static [Currency] = &[Currency::PHP, Currency::USD];
    const AWAITING_PAYMENT: &'static [&'static str] = &["AVAILABLE", "READY FOR PAYOUT"];
    const ECHO_FIELDS: &'static [&'static str] = &["orderNo", "pin"];

    fn handle_error(err: &PartnerError) -> RemitError {
        handle_ria_error(err)
    }
}

pub type RiaAdapter = RemitAdapter<Ria>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::http::test_server;
    use crate::client::{InquireResponse, LocationContext, MockPartnerClient};
    use crate::partners::PartnerAdapter;
    use crate::remit::state::{HistoryStatus, Step};
    use crate::remit::types::{Agent, ProcessRemit, Remittance};
    use crate::store::{MemoryStore, TransactionStore};
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_error_table() {
        for rule in RIA_ERRORS {
            let err = PartnerError::partner(rule.code, "ria says no", Some(400));
            let mapped = handle_ria_error(&err);
            assert_eq!(mapped.kind(), rule.kind, "code {}", rule.code);
            assert_eq!(mapped.message(), rule.message);
        }
    }

    #[test]
    fn test_unknown_code_falls_back() {
        let err = PartnerError::partner("7777", "new code", Some(404));
        assert_eq!(handle_ria_error(&err).kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_create_unavailable() {
        let client = Arc::new(MockPartnerClient::new("RIA"));
        let adapter = RiaAdapter::new(
            client.clone(),
            Arc::new(MemoryStore::new()),
            LocationContext::default(),
            Duration::from_secs(1),
        );
        let err = adapter
            .stage_create_remit(Remittance::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_payout_echoes_order_and_pin() {
        let client = Arc::new(MockPartnerClient::new("RIA"));
        let mut inquiry = InquireResponse {
            control_number: "RIA1234".into(),
            status: "Available".into(),
            currency: "USD".into(),
            principal_amount: "50.00".into(),
            ..Default::default()
        };
        inquiry.extra.insert("orderNo".into(), Value::from("ORD-778"));
        inquiry.extra.insert("pin".into(), Value::from("4411"));
        inquiry.extra.insert("internalFlag".into(), Value::from(true));
        client.set_inquiry(inquiry);

        let adapter = RiaAdapter::new(
            client.clone(),
            Arc::new(MemoryStore::new()),
            LocationContext::default(),
            Duration::from_secs(1),
        );
        let staged = adapter
            .stage_disburse_remit(Remittance {
                order_id: "ORD-RIA-1".into(),
                control_number: "RIA1234".into(),
                agent: Agent {
                    user_id: "teller-7".into(),
                    ..Default::default()
                },
                ..Default::default()
            })
            .await
            .unwrap();

        adapter
            .process_remit(ProcessRemit::new(staged.transaction_id.unwrap()))
            .await
            .unwrap();

        let payout = client.last_payout().unwrap();
        assert_eq!(payout.echo["orderNo"], "ORD-778");
        assert_eq!(payout.echo["pin"], "4411");
        assert!(!payout.echo.contains_key("internalFlag"));
        assert_eq!(payout.principal_amount, "50.00");
        // No confirming caller given, so the stager is carried
        assert_eq!(payout.agent.user_id, "teller-7");
        assert_eq!(payout.caller_id, "teller-7");
    }

    #[tokio::test]
    async fn test_http_payout_without_result_completes() {
        let base = test_server::serve(vec![
            (
                "/inquire",
                200,
                r#"{"code":"0","message":"OK","result":{"controlNumber":"CTRL-HTTP","status":"AVAILABLE","currency":"PHP","principalAmount":"100.00"}}"#,
            ),
            ("/payout", 200, r#"{"code":"0","message":"Paid"}"#),
        ])
        .await;
        let client = test_server::client("RIA", &base);
        let store = Arc::new(MemoryStore::new());
        let adapter = RiaAdapter::new(
            Arc::new(client),
            store.clone(),
            LocationContext::default(),
            Duration::from_secs(5),
        );

        let staged = adapter
            .stage_disburse_remit(Remittance {
                order_id: "ORD-RIA-HTTP".into(),
                control_number: "CTRL-HTTP".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let id = staged.transaction_id.unwrap();

        let done = adapter.process_remit(ProcessRemit::new(id)).await.unwrap();
        assert_eq!(done.control_number, "CTRL-HTTP");

        let cached = store.get_cached_txn(id).await.unwrap().unwrap();
        assert_eq!(cached.step, Step::Completed);
        let rows = store.history_for(id);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, HistoryStatus::Success);
    }
}
