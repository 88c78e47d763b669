//! Persisted record shapes: cached (staged) transactions and history rows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{ErrorKind, RemitError};
use super::state::{HistoryStatus, Step, TxnKind};
use super::types::{Remittance, TransactionId};
use crate::client::{InquireRequest, InquireResponse, SendQuote, SendValidateRequest};

/// History row identifier
pub type HistoryId = ulid::Ulid;

/// Staged send: outbound validation request plus the partner's quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendStaged {
    pub remittance: Remittance,
    pub request: SendValidateRequest,
    pub quote: SendQuote,
}

/// Staged payout: inquiry request plus the partner's inquiry response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisburseStaged {
    pub remittance: Remittance,
    pub request: InquireRequest,
    pub inquiry: InquireResponse,
}

/// Cached payload envelope
///
/// Opaque to the orchestrator and the store. Only the adapter whose partner
/// code matches [`CachedTxn::partner_code`] interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StagedPayload {
    Send(SendStaged),
    Disburse(DisburseStaged),
}

impl StagedPayload {
    pub fn remittance(&self) -> &Remittance {
        match self {
            StagedPayload::Send(s) => &s.remittance,
            StagedPayload::Disburse(d) => &d.remittance,
        }
    }

    pub fn txn_kind(&self) -> TxnKind {
        match self {
            StagedPayload::Send(_) => TxnKind::Create,
            StagedPayload::Disburse(_) => TxnKind::Disburse,
        }
    }
}

/// Staged transaction awaiting confirm
#[derive(Debug, Clone, PartialEq)]
pub struct CachedTxn {
    pub transaction_id: TransactionId,
    pub caller_id: String,
    pub order_id: String,
    pub org_id: u64,
    pub partner_code: String,
    pub kind: TxnKind,
    pub step: Step,
    pub payload: StagedPayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CachedTxn {
    /// Create a cached transaction in STAGED step
    pub fn staged(
        transaction_id: TransactionId,
        partner_code: &str,
        caller_id: &str,
        payload: StagedPayload,
    ) -> Self {
        let now = Utc::now();
        let remittance = payload.remittance();
        Self {
            transaction_id,
            caller_id: caller_id.to_string(),
            order_id: remittance.order_id.clone(),
            org_id: remittance.agent.org_id,
            partner_code: partner_code.to_string(),
            kind: payload.txn_kind(),
            step: Step::Staged,
            payload,
            created_at: now,
            updated_at: now,
        }
    }
}

impl fmt::Display for CachedTxn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CachedTxn[{}] partner={} kind={} order={} step={}",
            self.transaction_id, self.partner_code, self.kind, self.order_id, self.step
        )
    }
}

/// Append-only record of a staged, completed, or failed transaction
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionHistory {
    pub id: HistoryId,
    pub transaction_id: TransactionId,
    pub org_id: u64,
    pub order_id: String,
    pub control_number: String,
    pub partner_code: String,
    pub kind: TxnKind,
    pub remit_type: String,
    pub remittance: Remittance,
    pub status: HistoryStatus,
    pub error_kind: Option<ErrorKind>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub staged_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TransactionHistory {
    /// Start a history row for an operation still in progress
    pub fn draft(
        transaction_id: TransactionId,
        partner_code: &str,
        kind: TxnKind,
        remittance: &Remittance,
    ) -> Self {
        let now = Utc::now();
        let mut row = Self {
            id: ulid::Ulid::new(),
            transaction_id,
            org_id: 0,
            order_id: String::new(),
            control_number: String::new(),
            partner_code: partner_code.to_string(),
            kind,
            remit_type: String::new(),
            remittance: Remittance::default(),
            status: HistoryStatus::Failed,
            error_kind: None,
            error_code: None,
            error_message: None,
            staged_at: now,
            completed_at: None,
            created_at: now,
        };
        row.set_remittance(remittance);
        row
    }

    /// Replace the snapshot and the columns derived from it
    pub fn set_remittance(&mut self, remittance: &Remittance) {
        self.org_id = remittance.agent.org_id;
        self.order_id = remittance.order_id.clone();
        self.control_number = remittance.control_number.clone();
        self.remit_type = remittance.remit_type.clone();
        self.remittance = remittance.clone();
    }

    /// Fill in failure columns from a normalized error
    pub fn set_error(&mut self, err: &RemitError) {
        self.status = HistoryStatus::Failed;
        self.error_kind = Some(err.kind());
        match err.partner_fault() {
            Some(fault) => {
                self.error_code = Some(fault.code.clone());
                self.error_message = Some(fault.message.clone());
            }
            None => {
                self.error_code = Some(err.code().to_string());
                self.error_message = Some(err.message().to_string());
            }
        }
    }
}
