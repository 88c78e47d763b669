//! JapanRemit (PHP payouts only)

use super::RemitAdapter;
use super::common::{ErrorRule, map_with_table};
use super::profile::PartnerProfile;
use crate::client::PartnerError;
use crate::money::Currency;
use crate::remit::error::{ErrorKind, RemitError};

pub const JAPANREMIT_ERRORS: &[ErrorRule] = &[
    ErrorRule::new("J001", ErrorKind::NotFound, "control number not found"),
    ErrorRule::new("J002", ErrorKind::AlreadyExists, "transaction already paid"),
    ErrorRule::new("J003", ErrorKind::InvalidArgument, "transaction cancelled by sender"),
    ErrorRule::new("J004", ErrorKind::FailedPrecondition, "transaction is on hold"),
    ErrorRule::new("J009", ErrorKind::Internal, "partner system error"),
];

pub fn handle_japanremit_error(err: &PartnerError) -> RemitError {
    map_with_table(err, JAPANREMIT_ERRORS)
}

pub struct JapanRemit;

impl PartnerProfile for JapanRemit {
    const CODE: &'static str = "JPR";
    const NAME: &'static str = "JapanRemit";
    const SUPPORTS_SEND: bool = false;
    const ACCEPTED_CURRENCIES: &'static [Currency] = &[Currency::PHP];
    const AWAITING_PAYMENT: &'static [&'static str] = &["AVAILABLE", "UNPAID"];
    const ECHO_FIELDS: &'static [&'static str] = &["jrReference"];

    fn handle_error(err: &PartnerError) -> RemitError {
        handle_japanremit_error(err)
    }
}

pub type JapanRemitAdapter = RemitAdapter<JapanRemit>;
