//! USSC

use super::RemitAdapter;
use super::common::{ErrorRule, map_with_table};
use super::profile::PartnerProfile;
use crate::client::PartnerError;
use crate::money::Currency;
use crate::remit::error::{ErrorKind, RemitError};

pub const USSC_ERRORS: &[ErrorRule] = &[
    ErrorRule::new("101", ErrorKind::NotFound, "control number not found"),
    ErrorRule::new("102", ErrorKind::AlreadyExists, "transaction already claimed"),
    ErrorRule::new("103", ErrorKind::InvalidArgument, "invalid amount"),
    ErrorRule::new("104", ErrorKind::InvalidArgument, "transaction cancelled by sender"),
    ErrorRule::new("105", ErrorKind::FailedPrecondition, "transaction is under review"),
    ErrorRule::new("301", ErrorKind::InvalidArgument, "invalid branch code"),
    ErrorRule::new("999", ErrorKind::Internal, "partner system error"),
];

pub fn handle_ussc_error(err: &PartnerError) -> RemitError {
    map_with_table(err, USSC_ERRORS)
}

pub struct Ussc;

impl PartnerProfile for Ussc {
    const CODE: &'static str = "USSC";
    const NAME: &'static str = "USSC";
    const SUPPORTS_SEND: bool = true;
    const ACCEPTED_CURRENCIES: &'static [Currency] = &[Currency::PHP];
    const AWAITING_PAYMENT: &'static [&'static str] = &["UNCLAIMED", "FOR PAYOUT"];
    const QUOTE_ACCEPTED: &'static [&'static str] = &["SUCCESS", "APPROVED"];
    const ECHO_FIELDS: &'static [&'static str] = &["referenceNo"];

    fn handle_error(err: &PartnerError) -> RemitError {
        handle_ussc_error(err)
    }
}

pub type UsscAdapter = RemitAdapter<Ussc>;
