//! Remittance Error Types
//!
//! One taxonomy for every partner. Adapters translate partner-specific codes
//! into a [`RemitError`] immediately after the partner call returns; nothing
//! above the adapter layer inspects a partner code.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::money::MoneyError;
use crate::store::StoreError;

/// Generic message for store failures. Storage internals are logged, never returned.
pub const STORE_FAILURE_MESSAGE: &str = "transaction store unavailable";

/// Error kind (the caller-visible part of every error)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed or out-of-policy input (wrong currency, precondition not met)
    InvalidArgument,
    /// Unknown transaction id, control number, or history row
    NotFound,
    /// Duplicate order id, or transfer already claimed/paid by the partner
    AlreadyExists,
    /// Partner demands a prior step
    FailedPrecondition,
    /// Store, serialization, or partner transport failure
    Internal,
    /// Operation not offered by this partner
    Unavailable,
    /// No adapter registered for the partner code
    NotSupported,
}

impl ErrorKind {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::AlreadyExists => "ALREADY_EXISTS",
            ErrorKind::FailedPrecondition => "FAILED_PRECONDITION",
            ErrorKind::Internal => "INTERNAL",
            ErrorKind::Unavailable => "UNAVAILABLE",
            ErrorKind::NotSupported => "NOT_SUPPORTED",
        }
    }

    /// Inverse of [`ErrorKind::code`]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "INVALID_ARGUMENT" => Some(ErrorKind::InvalidArgument),
            "NOT_FOUND" => Some(ErrorKind::NotFound),
            "ALREADY_EXISTS" => Some(ErrorKind::AlreadyExists),
            "FAILED_PRECONDITION" => Some(ErrorKind::FailedPrecondition),
            "INTERNAL" => Some(ErrorKind::Internal),
            "UNAVAILABLE" => Some(ErrorKind::Unavailable),
            "NOT_SUPPORTED" => Some(ErrorKind::NotSupported),
            _ => None,
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::InvalidArgument => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::AlreadyExists => 409,
            ErrorKind::FailedPrecondition => 412,
            ErrorKind::Internal => 500,
            ErrorKind::NotSupported => 501,
            ErrorKind::Unavailable => 503,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Partner-side detail kept for the history row, never shown to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerFault {
    pub code: String,
    pub message: String,
}

/// Normalized remittance error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct RemitError {
    kind: ErrorKind,
    message: String,
    partner: Option<PartnerFault>,
}

impl RemitError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            partner: None,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyExists, message)
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FailedPrecondition, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }

    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotSupported, message)
    }

    /// Attach the partner's own code and message for auditing
    pub fn with_partner_fault(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.partner = Some(PartnerFault {
            code: code.into(),
            message: message.into(),
        });
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn partner_fault(&self) -> Option<&PartnerFault> {
        self.partner.as_ref()
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn http_status(&self) -> u16 {
        self.kind.http_status()
    }
}

impl From<StoreError> for RemitError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(what) => {
                RemitError::already_exists(format!("{} already exists", what))
            }
            other => {
                tracing::error!(error = %other, "Transaction store failure");
                RemitError::internal(STORE_FAILURE_MESSAGE)
            }
        }
    }
}

impl From<serde_json::Error> for RemitError {
    fn from(e: serde_json::Error) -> Self {
        tracing::error!(error = %e, "Payload serialization failure");
        RemitError::internal("failed to encode transaction payload")
    }
}

impl From<MoneyError> for RemitError {
    fn from(e: MoneyError) -> Self {
        match e {
            MoneyError::Overflow => RemitError::internal(e.to_string()),
            other => RemitError::invalid_argument(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorKind::InvalidArgument.code(), "INVALID_ARGUMENT");
        assert_eq!(ErrorKind::AlreadyExists.code(), "ALREADY_EXISTS");
        assert_eq!(ErrorKind::Unavailable.code(), "UNAVAILABLE");
        assert_eq!(ErrorKind::from_code("NOT_SUPPORTED"), Some(ErrorKind::NotSupported));
        assert_eq!(ErrorKind::from_code("nope"), None);
    }

    #[test]
    fn test_http_status() {
        assert_eq!(RemitError::invalid_argument("x").http_status(), 400);
        assert_eq!(RemitError::not_found("x").http_status(), 404);
        assert_eq!(RemitError::already_exists("x").http_status(), 409);
        assert_eq!(RemitError::internal("x").http_status(), 500);
        assert_eq!(RemitError::unavailable("x").http_status(), 503);
    }

    #[test]
    fn test_display_hides_partner_fault() {
        let err = RemitError::not_found("control number not found")
            .with_partner_fault("E404-CTRL", "MTCN 1234 not on file, secret=abc");
        assert_eq!(err.to_string(), "NOT_FOUND: control number not found");
        assert_eq!(err.partner_fault().unwrap().code, "E404-CTRL");
    }

    #[test]
    fn test_store_error_is_generic() {
        let err: RemitError = StoreError::Database("relation cached_txn_tb does not exist".into()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.message(), STORE_FAILURE_MESSAGE);

        let dup: RemitError = StoreError::Duplicate("order id ORD1".into()).into();
        assert_eq!(dup.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_money_error_mapping() {
        let err: RemitError = MoneyError::InvalidFormat("abc".into()).into();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err: RemitError = MoneyError::Overflow.into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
