//! Normalized partner request/response shapes
//!
//! Each [`PartnerClient`](super::PartnerClient) translates these into its
//! partner's own wire format. Partner fields without a normalized home travel
//! in the flattened `extra` maps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::remit::types::{Agent, Party, PersonName};

/// Static branch/agent context sent with every partner call
///
/// Injected per partner from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocationContext {
    pub location_code: String,
    pub location_id: String,
    pub location_name: String,
    pub device_id: String,
    pub agent_id: String,
    pub agent_code: String,
    pub user_code: String,
    pub branch_code: String,
}

// ============================================================================
// Inquire
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquireRequest {
    pub control_number: String,
    pub reference_number: String,
    pub location: LocationContext,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquireResponse {
    pub control_number: String,
    pub status: String,
    pub currency: String,
    /// Decimal major-unit string, e.g. `"100.00"`
    pub principal_amount: String,
    #[serde(default)]
    pub sender_name: PersonName,
    #[serde(default)]
    pub receiver_name: PersonName,
    #[serde(default)]
    pub origin_country: String,
    #[serde(default)]
    pub dest_country: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keys of [`InquireResponse`] that are surfaced through normalized fields
pub const INQUIRY_NORMALIZED_KEYS: &[&str] =
    &["status", "controlNumber", "currency", "principalAmount"];

// ============================================================================
// Payout
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRequest {
    pub reference_number: String,
    pub control_number: String,
    pub location: LocationContext,
    pub principal_amount: String,
    pub currency: String,
    pub sender_name: PersonName,
    pub receiver_name: PersonName,
    pub receiver: Party,
    pub agent: Agent,
    /// Identity of the confirming caller
    #[serde(default)]
    pub caller_id: String,
    pub remit_type: String,
    pub purpose: String,
    /// Partner-specific fields echoed from the inquiry
    #[serde(flatten)]
    pub echo: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutResponse {
    #[serde(default)]
    pub control_number: String,
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Send
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendValidateRequest {
    pub reference_number: String,
    pub order_id: String,
    pub location: LocationContext,
    pub principal_amount: String,
    pub currency: String,
    pub dest_country: String,
    pub remit_type: String,
    pub purpose: String,
    pub remitter: Party,
    pub receiver: Party,
    pub agent: Agent,
}

/// Partner's fee quote for a send
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendQuote {
    pub status: String,
    pub currency: String,
    pub principal_amount: String,
    pub service_charge: String,
    pub tax: String,
    /// Some partners assign the control number at validation time
    #[serde(default)]
    pub control_number: String,
    #[serde(default)]
    pub dest_amount: String,
    #[serde(default)]
    pub dest_currency: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMoneyRequest {
    pub request: SendValidateRequest,
    pub quote: SendQuote,
    /// Identity of the confirming caller
    #[serde(default)]
    pub caller_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendAck {
    #[serde(default)]
    pub control_number: String,
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
