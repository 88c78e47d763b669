//! Uniteller

use super::RemitAdapter;
use super::common::{ErrorRule, map_with_table};
use super::profile::{PartnerProfile, require_purpose};
use crate::client::PartnerError;
use crate::money::Currency;
use crate::remit::error::{ErrorKind, RemitError};
use crate::remit::types::Remittance;

pub const UNITELLER_ERRORS: &[ErrorRule] = &[
    ErrorRule::new("UNT-4001", ErrorKind::NotFound, "control number not found"),
    ErrorRule::new("UNT-4002", ErrorKind::AlreadyExists, "transaction already paid"),
    ErrorRule::new(
        "UNT-4003",
        ErrorKind::FailedPrecondition,
        "transaction pending payer confirmation",
    ),
    ErrorRule::new("UNT-4010", ErrorKind::InvalidArgument, "invalid purpose of transaction"),
    ErrorRule::new("UNT-4020", ErrorKind::InvalidArgument, "invalid payer"),
    ErrorRule::new("UNT-5000", ErrorKind::Internal, "partner system error"),
];

pub fn handle_uniteller_error(err: &PartnerError) -> RemitError {
    map_with_table(err, UNITELLER_ERRORS)
}

pub struct Uniteller;

impl PartnerProfile for Uniteller {
    const CODE: &'static str = "UNT";
    const NAME: &'static str = "Uniteller";
    const SUPPORTS_SEND: bool = false;
    const ACCEPTED_CURRENCIES: &'static [Currency] = &[Currency::PHP, Currency::USD];
    const AWAITING_PAYMENT: &'static [&'static str] = &["AVAILABLE", "PENDING PAYOUT"];
    const ECHO_FIELDS: &'static [&'static str] = &["payerId", "payerBranchId"];

    fn handle_error(err: &PartnerError) -> RemitError {
        handle_uniteller_error(err)
    }

    fn check_disburse(remittance: &Remittance) -> Result<(), RemitError> {
        require_purpose(remittance)
    }
}

pub type UnitellerAdapter = RemitAdapter<Uniteller>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_table() {
        for rule in UNITELLER_ERRORS {
            let err = PartnerError::partner(rule.code, "unt error", Some(422));
            let mapped = handle_uniteller_error(&err);
            assert_eq!(mapped.kind(), rule.kind, "code {}", rule.code);
            assert_eq!(mapped.partner_fault().unwrap().code, rule.code);
        }
    }

    #[test]
    fn test_purpose_required() {
        let mut rem = Remittance::default();
        assert!(Uniteller::check_disburse(&rem).is_err());
        rem.purpose = "EDUCATION".into();
        assert!(Uniteller::check_disburse(&rem).is_ok());
    }
}
