//! Remittance Core Types
//!
//! The canonical transfer description shared by every partner adapter.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money::Money;

/// Transaction ID - ULID generated on first stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(ulid::Ulid);

impl TransactionId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    pub fn inner(&self) -> ulid::Ulid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

// ============================================================================
// KYC records
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
}

impl PersonName {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            middle_name: String::new(),
            last_name: last_name.to_string(),
        }
    }

    /// "First Middle Last", skipping empty parts
    pub fn full_name(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.trim().is_empty() && self.last_name.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub country_code: String,
    pub number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identification {
    pub id_type: String,
    pub number: String,
    pub issuer_country: String,
    pub issued: Option<NaiveDate>,
    pub expiry: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employment {
    pub employer: String,
    pub occupation: String,
    pub position_level: String,
}

/// Remitter or receiver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub name: PersonName,
    pub address: Address,
    pub phone: Option<Phone>,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
    pub birth_place: String,
    pub nationality: String,
    pub gender: String,
    pub identification: Option<Identification>,
    pub employment: Employment,
    pub source_of_funds: String,
}

/// Operator context of the branch/device making the request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub user_id: String,
    pub device_id: String,
    pub ip_address: String,
    pub location_id: String,
    pub location_name: String,
    /// Tenant scope
    pub org_id: u64,
}

// ============================================================================
// Operations
// ============================================================================

/// Canonical in-flight transfer description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remittance {
    /// Caller-supplied idempotency key
    pub order_id: String,
    pub transaction_id: Option<TransactionId>,
    pub control_number: String,
    pub partner_code: String,
    /// Partner send/disburse type (e.g. cash pickup, account credit)
    pub remit_type: String,
    pub purpose: String,
    pub origin_country: String,
    pub dest_country: String,
    pub remitter: Party,
    pub receiver: Party,
    pub agent: Agent,
    pub source_amount: Option<Money>,
    pub dest_amount: Option<Money>,
    pub tax: Option<Money>,
    pub charge: Option<Money>,
    pub gross_total: Option<Money>,
}

/// Result of stage-create: the transaction id and fee breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemitResponse {
    pub transaction_id: TransactionId,
    pub principal: Money,
    pub charge: Money,
    pub tax: Money,
    pub gross_total: Money,
}

/// Confirm request; `control_number` and `processed_at` are filled on success
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRemit {
    pub transaction_id: Option<TransactionId>,
    pub caller_id: String,
    pub agent: Agent,
    pub control_number: String,
    pub processed_at: Option<DateTime<Utc>>,
}

impl ProcessRemit {
    pub fn new(transaction_id: TransactionId) -> Self {
        Self {
            transaction_id: Some(transaction_id),
            ..Default::default()
        }
    }
}

/// Partner-side inquiry, normalized
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRemit {
    pub control_number: String,
    pub agent: Agent,
    pub status: String,
    pub remitter: PersonName,
    pub receiver: PersonName,
    pub principal: Option<Money>,
    pub origin_country: String,
    pub dest_country: String,
    /// Remaining partner fields as a JSON object
    pub other_info: String,
}

impl SearchRemit {
    pub fn new(control_number: &str) -> Self {
        Self {
            control_number: control_number.to_string(),
            ..Default::default()
        }
    }
}
