//! Transaction Lifecycle State Definitions
//!
//! State IDs are stored as SMALLINT in PostgreSQL.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle step of a cached (in-flight) transaction
///
/// ```text
/// STAGED → PROCESSING → COMPLETED
///               ↓
///            FAILED
/// ```
///
/// Only a `Staged` row can be processed. The move to `Processing` is a
/// conditional update, so two concurrent confirms cannot both reach the partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i16)]
pub enum Step {
    /// Amounts fixed with the partner, waiting for confirm
    Staged = 10,
    /// Claimed by a confirm call, partner request in flight
    Processing = 20,
    /// Terminal: partner confirmed
    Completed = 30,
    /// Terminal: partner rejected the confirm
    Failed = -10,
}

impl Step {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::Completed | Step::Failed)
    }

    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            10 => Some(Step::Staged),
            20 => Some(Step::Processing),
            30 => Some(Step::Completed),
            -10 => Some(Step::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Staged => "STAGED",
            Step::Processing => "PROCESSING",
            Step::Completed => "COMPLETED",
            Step::Failed => "FAILED",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for Step {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Step::from_id(value).ok_or(())
    }
}

/// Which side of a transfer the transaction handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i16)]
pub enum TxnKind {
    /// Originating a transfer (send money)
    Create = 1,
    /// Paying out a transfer to the receiver
    Disburse = 2,
}

impl TxnKind {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(TxnKind::Create),
            2 => Some(TxnKind::Disburse),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxnKind::Create => "CREATE",
            TxnKind::Disburse => "DISBURSE",
        }
    }
}

impl fmt::Display for TxnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome recorded on a history row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i16)]
pub enum HistoryStatus {
    /// Stage succeeded (send partners record the quote)
    Staged = 10,
    /// Confirm succeeded
    Success = 30,
    /// Stage or confirm failed
    Failed = -10,
}

impl HistoryStatus {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            10 => Some(HistoryStatus::Staged),
            30 => Some(HistoryStatus::Success),
            -10 => Some(HistoryStatus::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryStatus::Staged => "STAGED",
            HistoryStatus::Success => "SUCCESS",
            HistoryStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for HistoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
