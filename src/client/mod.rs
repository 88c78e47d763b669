//! Partner Clients
//!
//! One client per money-transfer partner. A client only translates the
//! normalized field set into the partner's wire format and back; it never
//! decides policy. Errors come back as [`PartnerError`] already bucketed into
//! partner / transport / internal classes.

pub mod error;
pub mod http;
#[cfg(any(test, feature = "mock-partners"))]
pub mod mock;
pub mod types;

pub use error::{PartnerError, PartnerErrorClass};
pub use http::HttpPartnerClient;
#[cfg(any(test, feature = "mock-partners"))]
pub use mock::MockPartnerClient;
pub use types::{
    InquireRequest, InquireResponse, LocationContext, PayoutRequest, PayoutResponse, SendAck,
    SendMoneyRequest, SendQuote, SendValidateRequest,
};

use async_trait::async_trait;

/// Narrow HTTP capability of one partner
#[async_trait]
pub trait PartnerClient: Send + Sync {
    /// Partner code this client talks to
    fn partner_code(&self) -> &str;

    /// Look up a transfer by control number
    async fn inquire(&self, req: &InquireRequest) -> Result<InquireResponse, PartnerError>;

    /// Pay out a transfer to its receiver
    async fn payout(&self, req: &PayoutRequest) -> Result<PayoutResponse, PartnerError>;

    /// Validate a new transfer and obtain the fee quote
    async fn validate_send(&self, req: &SendValidateRequest) -> Result<SendQuote, PartnerError>;

    /// Originate a transfer previously validated
    async fn send_money(&self, req: &SendMoneyRequest) -> Result<SendAck, PartnerError>;
}
