//! iRemit

use super::RemitAdapter;
use super::common::{ErrorRule, map_with_table};
use super::profile::{PartnerProfile, require_receiver_phone};
use crate::client::PartnerError;
use crate::money::Currency;
use crate::remit::error::{ErrorKind, RemitError};
use crate::remit::types::Remittance;

pub const IREMIT_ERRORS: &[ErrorRule] = &[
    ErrorRule::new("IR100", ErrorKind::NotFound, "control number not found"),
    ErrorRule::new("IR101", ErrorKind::AlreadyExists, "transaction already paid"),
    ErrorRule::new("IR102", ErrorKind::InvalidArgument, "transaction was cancelled"),
    ErrorRule::new(
        "IR103",
        ErrorKind::FailedPrecondition,
        "transaction awaiting compliance clearance",
    ),
    ErrorRule::new("IR110", ErrorKind::InvalidArgument, "invalid receiver mobile number"),
    ErrorRule::new("IR200", ErrorKind::Internal, "partner system error"),
];

pub fn handle_iremit_error(err: &PartnerError) -> RemitError {
    map_with_table(err, IREMIT_ERRORS)
}

pub struct IRemit;

impl PartnerProfile for IRemit {
    const CODE: &'static str = "IR";
    const NAME: &'static str = "iRemit";
    const SUPPORTS_SEND: bool = false;
    const ACCEPTED_CURRENCIES: &'static [Currency] = &[Currency::PHP, Currency::USD];
    const AWAITING_PAYMENT: &'static [&'static str] = &["FOR PAYMENT", "AVAILABLE"];
    const ECHO_FIELDS: &'static [&'static str] = &["iremitRefNo"];

    fn handle_error(err: &PartnerError) -> RemitError {
        handle_iremit_error(err)
    }

    fn check_disburse(remittance: &Remittance) -> Result<(), RemitError> {
        require_receiver_phone(remittance)
    }
}

pub type IRemitAdapter = RemitAdapter<IRemit>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_table() {
        for rule in IREMIT_ERRORS {
            let err = PartnerError::partner(rule.code, "iremit error", Some(200));
            assert_eq!(handle_iremit_error(&err).kind(), rule.kind, "code {}", rule.code);
        }
    }
}
