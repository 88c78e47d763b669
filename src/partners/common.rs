//! Helpers shared by every partner adapter

use chrono::Utc;
use rand::Rng;
use serde_json::{Map, Value};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::client::types::INQUIRY_NORMALIZED_KEYS;
use crate::client::{InquireResponse, PartnerError, PartnerErrorClass};
use crate::money::{Currency, Money};
use crate::remit::error::{ErrorKind, RemitError};
use crate::remit::types::Remittance;
use crate::store::TransactionStore;

/// One documented partner error code and its normalized meaning
#[derive(Debug, Clone, Copy)]
pub struct ErrorRule {
    pub code: &'static str,
    pub kind: ErrorKind,
    /// Caller-visible message
    pub message: &'static str,
}

impl ErrorRule {
    pub const fn new(code: &'static str, kind: ErrorKind, message: &'static str) -> Self {
        Self {
            code,
            kind,
            message,
        }
    }
}

/// Map a partner client error through a partner's code table
///
/// Transport and internal failures become `Internal`. Partner rejections with
/// a code missing from the table fall back to the HTTP status class.
pub fn map_with_table(err: &PartnerError, table: &[ErrorRule]) -> RemitError {
    let mapped = match err.class {
        PartnerErrorClass::Transport => RemitError::internal("partner service unreachable"),
        PartnerErrorClass::Internal => RemitError::internal("unexpected partner response"),
        PartnerErrorClass::Partner => {
            let code = err.code.trim();
            match table.iter().find(|rule| rule.code.eq_ignore_ascii_case(code)) {
                Some(rule) => RemitError::new(rule.kind, rule.message),
                None => fallback_by_status(err.http_status),
            }
        }
    };

    let fault_code = if err.code.is_empty() {
        err.class.to_string()
    } else {
        err.code.clone()
    };
    mapped.with_partner_fault(fault_code, err.message.clone())
}

fn fallback_by_status(http_status: Option<u16>) -> RemitError {
    match http_status {
        Some(400) | Some(422) => RemitError::invalid_argument("request rejected by partner"),
        Some(404) => RemitError::not_found("transaction not found at partner"),
        Some(409) => RemitError::already_exists("transaction already processed by partner"),
        Some(412) => RemitError::failed_precondition("partner requires a prior step"),
        _ => RemitError::internal("partner error"),
    }
}

/// Run one partner call under the partner's timeout
pub async fn call_partner<T, F>(
    partner: &str,
    op: &'static str,
    timeout: Duration,
    call: F,
) -> Result<T, PartnerError>
where
    F: Future<Output = Result<T, PartnerError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            warn!(partner, op, class = %e.class, code = %e.code, "Partner call failed");
            Err(e)
        }
        Err(_) => {
            warn!(partner, op, timeout_ms = timeout.as_millis() as u64, "Partner call timed out");
            Err(PartnerError::timeout(timeout))
        }
    }
}

/// Parse a partner-reported currency and check it is accepted
pub fn accept_currency(code: &str, accepted: &[Currency]) -> Result<Currency, RemitError> {
    let currency = Currency::new(code)?;
    if !accepted.contains(&currency) {
        return Err(RemitError::invalid_argument(format!(
            "currency {} is not accepted",
            currency
        )));
    }
    Ok(currency)
}

/// Parse a major-unit amount string; empty means zero
pub fn parse_amount(amount: &str, currency: Currency) -> Result<Money, RemitError> {
    if amount.trim().is_empty() {
        return Ok(Money::zero(currency));
    }
    Ok(Money::parse(amount, currency)?)
}

/// Case-insensitive status check
pub fn status_matches(status: &str, accepted: &[&str]) -> bool {
    let status = status.trim();
    accepted.iter().any(|s| s.eq_ignore_ascii_case(status))
}

/// Reference number sent with every partner call: code + timestamp + random suffix
pub fn new_reference_number(partner: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{}{}{:06}", partner, Utc::now().format("%y%m%d%H%M%S"), suffix)
}

/// Serialize an inquiry without the fields already surfaced as normalized columns
pub fn strip_internal_fields(inquiry: &InquireResponse) -> Result<String, RemitError> {
    let mut value = serde_json::to_value(inquiry)?;
    if let Value::Object(map) = &mut value {
        for key in INQUIRY_NORMALIZED_KEYS {
            map.remove(*key);
        }
    }
    Ok(serde_json::to_string(&value)?)
}

/// Copy the listed keys out of a partner's extra inquiry fields
pub fn echo_fields(extra: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    keys.iter()
        .filter_map(|key| extra.get(*key).map(|v| (key.to_string(), v.clone())))
        .collect()
}

pub fn require_order_id(remittance: &Remittance) -> Result<(), RemitError> {
    if remittance.order_id.trim().is_empty() {
        return Err(RemitError::invalid_argument("order id is required"));
    }
    Ok(())
}

/// Fail with `AlreadyExists` if the caller order id was already staged
pub async fn ensure_new_order(
    store: &dyn TransactionStore,
    order_id: &str,
) -> Result<(), RemitError> {
    if store.order_id_exists(order_id).await? {
        return Err(RemitError::already_exists(format!(
            "order id {} already exists",
            order_id
        )));
    }
    Ok(())
}
