//! Metrobank
//!
//! Disburse only. Payout requires a receiver identification document.

use super::RemitAdapter;
use super::common::{ErrorRule, map_with_table};
use super::profile::{PartnerProfile, require_receiver_id};
use crate::client::PartnerError;
use crate::money::Currency;
use crate::remit::error::{ErrorKind, RemitError};
use crate::remit::types::Remittance;

pub const METROBANK_ERRORS: &[ErrorRule] = &[
    ErrorRule::new("MB-404", ErrorKind::NotFound, "reference number not found"),
    ErrorRule::new("MB-409", ErrorKind::AlreadyExists, "transaction already paid"),
    ErrorRule::new(
        "MB-412",
        ErrorKind::FailedPrecondition,
        "identity verification required",
    ),
    ErrorRule::new(
        "MB-422",
        ErrorKind::InvalidArgument,
        "invalid receiver identification",
    ),
    ErrorRule::new("MB-500", ErrorKind::Internal, "partner system error"),
];

pub fn handle_metrobank_error(err: &PartnerError) -> RemitError {
    map_with_table(err, METROBANK_ERRORS)
}

pub struct Metrobank;

impl PartnerProfile for Metrobank {
    const CODE: &'static str = "MB";
    const NAME: &'static str = "Metrobank";
    const SUPPORTS_SEND: bool = false;
    const ACCEPTED_CURRENCIES: &'static [Currency] = &[Currency::PHP, Currency::USD];
    const AWAITING_PAYMENT: &'static [&'static str] = &["FOR PICKUP", "AVAILABLE"];
    const ECHO_FIELDS: &'static [&'static str] = &["refNo"];

    fn handle_error(err: &PartnerError) -> RemitError {
        handle_metrobank_error(err)
    }

    fn check_disburse(remittance: &Remittance) -> Result<(), RemitError> {
        require_receiver_id(remittance)
    }
}

pub type MetrobankAdapter = RemitAdapter<Metrobank>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_table() {
        for rule in METROBANK_ERRORS {
            let err = PartnerError::partner(rule.code, "mb error", Some(400));
            assert_eq!(handle_metrobank_error(&err).kind(), rule.kind, "code {}", rule.code);
        }
    }

    #[test]
    fn test_requires_receiver_id() {
        let err = Metrobank::check_disburse(&Remittance::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
