//! Transfast
//!
//! Disburse only. Transfast identifies transfers by invoice; the invoice id
//! and payout pin from the inquiry are echoed on payout.

use super::RemitAdapter;
use super::common::{ErrorRule, map_with_table};
use super::profile::{PartnerProfile, require_receiver_birth_date};
use crate::client::PartnerError;
use crate::money::Currency;
use crate::remit::error::{ErrorKind, RemitError};
use crate::remit::types::Remittance;

pub const TRANSFAST_ERRORS: &[ErrorRule] = &[
    ErrorRule::new("TF-01", ErrorKind::NotFound, "invoice not found"),
    ErrorRule::new("TF-02", ErrorKind::AlreadyExists, "invoice already paid"),
    ErrorRule::new("TF-03", ErrorKind::InvalidArgument, "invoice was cancelled"),
    ErrorRule::new(
        "TF-05",
        ErrorKind::FailedPrecondition,
        "invoice is locked by another agent",
    ),
    ErrorRule::new("TF-07", ErrorKind::InvalidArgument, "receiver birth date mismatch"),
    ErrorRule::new("TF-99", ErrorKind::Internal, "partner system error"),
];

pub fn handle_transfast_error(err: &PartnerError) -> RemitError {
    map_with_table(err, TRANSFAST_ERRORS)
}

pub struct Transfast;

impl PartnerProfile for Transfast {
    const CODE: &'static str = "TF";
    const NAME: &'static str = "Transfast";
    const SUPPORTS_SEND: bool = false;
    const ACCEPTED_CURRENCIES: &'static [Currency] = &[Currency::PHP, Currency::USD];
    const AWAITING_PAYMENT: &'static [&'static str] = &["READY", "AVAILABLE"];
    const ECHO_FIELDS: &'static [&'static str] = &["invoiceId", "tfPin"];

    fn handle_error(err: &PartnerError) -> RemitError {
        handle_transfast_error(err)
    }

    fn check_disburse(remittance: &Remittance) -> Result<(), RemitError> {
        require_receiver_birth_date(remittance)
    }
}

pub type TransfastAdapter = RemitAdapter<Transfast>;
