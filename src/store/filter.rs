//! History listing filter

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::remit::records::TransactionHistory;
use crate::remit::state::HistoryStatus;
use crate::remit::types::TransactionId;

pub const DEFAULT_LIST_LIMIT: u32 = 50;
pub const MAX_LIST_LIMIT: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(format!("invalid sort order: {}", other)),
        }
    }
}

/// Sortable history columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    CreatedAt,
    StagedAt,
    CompletedAt,
    ControlNumber,
    PartnerCode,
    OrderId,
    Status,
}

impl SortColumn {
    /// Column name in `remit_history_tb`
    pub fn column(&self) -> &'static str {
        match self {
            SortColumn::CreatedAt => "created_at",
            SortColumn::StagedAt => "staged_at",
            SortColumn::CompletedAt => "completed_at",
            SortColumn::ControlNumber => "control_number",
            SortColumn::PartnerCode => "partner_code",
            SortColumn::OrderId => "order_id",
            SortColumn::Status => "status",
        }
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created_at" => Ok(SortColumn::CreatedAt),
            "staged_at" | "txn_staged_time" => Ok(SortColumn::StagedAt),
            "completed_at" | "txn_completed_time" => Ok(SortColumn::CompletedAt),
            "control_number" => Ok(SortColumn::ControlNumber),
            "partner_code" | "partner" => Ok(SortColumn::PartnerCode),
            "order_id" => Ok(SortColumn::OrderId),
            "status" => Ok(SortColumn::Status),
            other => Err(format!("invalid sort column: {}", other)),
        }
    }
}

/// Filter for `ListRemit`
///
/// The date range applies to the row creation time and is inclusive on both
/// ends. `exclude_type` matches the remittance type column.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Tenant scope
    pub org_id: Option<u64>,
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub offset: u32,
    pub sort_by: SortColumn,
    pub sort_order: SortOrder,
    pub control_numbers: Vec<String>,
    pub partner: Option<String>,
    pub exclude_partner: Vec<String>,
    pub exclude_type: Vec<String>,
    pub transaction_id: Option<TransactionId>,
    pub status: Option<HistoryStatus>,
}

impl ListFilter {
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }

    /// Partner filter, normalized to the stored upper-case form
    pub fn partner_code(&self) -> Option<String> {
        self.partner
            .as_deref()
            .map(|p| p.trim().to_ascii_uppercase())
    }

    /// Excluded partners, normalized to the stored upper-case form
    pub fn excluded_partners(&self) -> Vec<String> {
        self.exclude_partner
            .iter()
            .map(|p| p.trim().to_ascii_uppercase())
            .collect()
    }

    /// Whether a row passes every filter (pagination excluded)
    pub fn matches(&self, row: &TransactionHistory) -> bool {
        if let Some(org_id) = self.org_id
            && row.org_id != org_id
        {
            return false;
        }
        if let Some(from) = self.from
            && row.created_at < from
        {
            return false;
        }
        if let Some(until) = self.until
            && row.created_at > until
        {
            return false;
        }
        if !self.control_numbers.is_empty() && !self.control_numbers.contains(&row.control_number) {
            return false;
        }
        if let Some(partner) = self.partner_code()
            && !row.partner_code.eq_ignore_ascii_case(&partner)
        {
            return false;
        }
        if self
            .excluded_partners()
            .iter()
            .any(|p| row.partner_code.eq_ignore_ascii_case(p))
        {
            return false;
        }
        if self.exclude_type.contains(&row.remit_type) {
            return false;
        }
        if let Some(id) = self.transaction_id
            && row.transaction_id != id
        {
            return false;
        }
        if let Some(status) = self.status
            && row.status != status
        {
            return false;
        }
        true
    }

    /// Ordering for in-memory sorting, ties broken by row id
    pub fn compare(&self, a: &TransactionHistory, b: &TransactionHistory) -> Ordering {
        let ord = match self.sort_by {
            SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
            SortColumn::StagedAt => a.staged_at.cmp(&b.staged_at),
            SortColumn::CompletedAt => a.completed_at.cmp(&b.completed_at),
            SortColumn::ControlNumber => a.control_number.cmp(&b.control_number),
            SortColumn::PartnerCode => a.partner_code.cmp(&b.partner_code),
            SortColumn::OrderId => a.order_id.cmp(&b.order_id),
            SortColumn::Status => a.status.id().cmp(&b.status.id()),
        }
        .then_with(|| a.id.cmp(&b.id));

        match self.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}
