//! Per-partner policy
//!
//! A profile is a zero-sized type carrying everything that differs between
//! partners: identity, accepted currencies, status vocabulary, extra KYC rules,
//! echoed inquiry fields and the error-code table. The staged flows themselves
//! live once in [`RemitAdapter`](super::adapter::RemitAdapter).

use crate::client::PartnerError;
use crate::money::Currency;
use crate::remit::error::RemitError;
use crate::remit::types::Remittance;

pub trait PartnerProfile: Send + Sync + 'static {
    /// Partner code used for registry lookup and persisted rows
    const CODE: &'static str;

    /// Display name, used in messages
    const NAME: &'static str;

    /// Whether the partner can originate transfers
    const SUPPORTS_SEND: bool;

    const ACCEPTED_CURRENCIES: &'static [Currency];

    /// Inquiry statuses meaning the transfer can be paid out (case-insensitive)
    const AWAITING_PAYMENT: &'static [&'static str];

    /// Validation statuses meaning the partner accepted the send quote
    const QUOTE_ACCEPTED: &'static [&'static str] = &[];

    /// Inquiry fields the partner needs back on payout
    const ECHO_FIELDS: &'static [&'static str] = &[];

    /// Translate a partner client error into the shared taxonomy
    fn handle_error(err: &PartnerError) -> RemitError;

    /// Extra preconditions on the disburse path, checked before any partner call
    fn check_disburse(_remittance: &Remittance) -> Result<(), RemitError> {
        Ok(())
    }

    /// Preconditions on the send path, checked before any partner call
    fn check_send(remittance: &Remittance) -> Result<(), RemitError> {
        if remittance.remitter.name.is_empty() {
            return Err(RemitError::invalid_argument("remitter name is required"));
        }
        if remittance.receiver.name.is_empty() {
            return Err(RemitError::invalid_argument("receiver name is required"));
        }
        if remittance.dest_country.trim().is_empty() {
            return Err(RemitError::invalid_argument("destination country is required"));
        }
        Ok(())
    }
}

// ============================================================================
// Reusable KYC checks
// ============================================================================

pub fn require_receiver_id(remittance: &Remittance) -> Result<(), RemitError> {
    match &remittance.receiver.identification {
        Some(id) if !id.id_type.trim().is_empty() && !id.number.trim().is_empty() => Ok(()),
        _ => Err(RemitError::invalid_argument(
            "receiver identification document is required",
        )),
    }
}

pub fn require_receiver_birth_date(remittance: &Remittance) -> Result<(), RemitError> {
    if remittance.receiver.birth_date.is_none() {
        return Err(RemitError::invalid_argument("receiver birth date is required"));
    }
    Ok(())
}

pub fn require_receiver_phone(remittance: &Remittance) -> Result<(), RemitError> {
    match &remittance.receiver.phone {
        Some(phone) if !phone.number.trim().is_empty() => Ok(()),
        _ => Err(RemitError::invalid_argument("receiver phone number is required")),
    }
}

pub fn require_purpose(remittance: &Remittance) -> Result<(), RemitError> {
    if remittance.purpose.trim().is_empty() {
        return Err(RemitError::invalid_argument("purpose of transaction is required"));
    }
    Ok(())
}
