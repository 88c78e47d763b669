//! Partner client errors

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Outer status class, already bucketed by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartnerErrorClass {
    /// The partner answered and rejected the request
    Partner,
    /// Network failure or timeout; the outcome is unknown
    Transport,
    /// Local failure (encoding, unexpected response shape)
    Internal,
}

impl fmt::Display for PartnerErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PartnerErrorClass::Partner => "PARTNER",
            PartnerErrorClass::Transport => "TRANSPORT",
            PartnerErrorClass::Internal => "INTERNAL",
        };
        f.write_str(s)
    }
}

/// Typed error returned by every [`PartnerClient`](super::PartnerClient)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{class} error {code}: {message}")]
pub struct PartnerError {
    pub class: PartnerErrorClass,
    /// Partner's internal error code (empty for non-partner classes)
    pub code: String,
    pub message: String,
    pub http_status: Option<u16>,
}

impl PartnerError {
    pub fn partner(code: impl Into<String>, message: impl Into<String>, http_status: Option<u16>) -> Self {
        Self {
            class: PartnerErrorClass::Partner,
            code: code.into(),
            message: message.into(),
            http_status,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            class: PartnerErrorClass::Transport,
            code: String::new(),
            message: message.into(),
            http_status: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            class: PartnerErrorClass::Internal,
            code: String::new(),
            message: message.into(),
            http_status: None,
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::transport(format!("partner call timed out after {}ms", after.as_millis()))
    }

    #[inline]
    pub fn is_partner(&self) -> bool {
        self.class == PartnerErrorClass::Partner
    }
}

impl From<reqwest::Error> for PartnerError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            PartnerError::internal(format!("unexpected partner response: {}", e))
        } else {
            PartnerError::transport(e.to_string())
        }
    }
}
