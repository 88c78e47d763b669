//! In-process partner simulator
//!
//! Used by the test suite and by `mock://` partner URLs in development
//! configs. Responses and failures are configured per call type; every call is
//! counted so tests can assert on network I/O.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use super::PartnerClient;
use super::error::PartnerError;
use super::types::{
    InquireRequest, InquireResponse, PayoutRequest, PayoutResponse, SendAck, SendMoneyRequest,
    SendQuote, SendValidateRequest,
};

pub struct MockPartnerClient {
    partner_code: String,
    inquiry: Mutex<Option<InquireResponse>>,
    quote: Mutex<Option<SendQuote>>,
    inquire_error: Mutex<Option<PartnerError>>,
    payout_error: Mutex<Option<PartnerError>>,
    validate_error: Mutex<Option<PartnerError>>,
    send_error: Mutex<Option<PartnerError>>,
    last_payout: Mutex<Option<PayoutRequest>>,
    last_send: Mutex<Option<SendMoneyRequest>>,
    inquire_count: AtomicUsize,
    payout_count: AtomicUsize,
    validate_count: AtomicUsize,
    send_count: AtomicUsize,
    delay_ms: AtomicU64,
}

impl MockPartnerClient {
    pub fn new(partner_code: &str) -> Self {
        Self {
            partner_code: partner_code.to_string(),
            inquiry: Mutex::new(None),
            quote: Mutex::new(None),
            inquire_error: Mutex::new(None),
            payout_error: Mutex::new(None),
            validate_error: Mutex::new(None),
            send_error: Mutex::new(None),
            last_payout: Mutex::new(None),
            last_send: Mutex::new(None),
            inquire_count: AtomicUsize::new(0),
            payout_count: AtomicUsize::new(0),
            validate_count: AtomicUsize::new(0),
            send_count: AtomicUsize::new(0),
            delay_ms: AtomicU64::new(0),
        }
    }

    fn set<T>(slot: &Mutex<Option<T>>, value: Option<T>) {
        if let Ok(mut guard) = slot.lock() {
            *guard = value;
        }
    }

    fn get<T: Clone>(slot: &Mutex<Option<T>>) -> Option<T> {
        slot.lock().ok().and_then(|guard| guard.clone())
    }

    pub fn set_inquiry(&self, inquiry: InquireResponse) {
        Self::set(&self.inquiry, Some(inquiry));
    }

    pub fn set_quote(&self, quote: SendQuote) {
        Self::set(&self.quote, Some(quote));
    }

    pub fn set_inquire_error(&self, err: Option<PartnerError>) {
        Self::set(&self.inquire_error, err);
    }

    pub fn set_payout_error(&self, err: Option<PartnerError>) {
        Self::set(&self.payout_error, err);
    }

    pub fn set_validate_error(&self, err: Option<PartnerError>) {
        Self::set(&self.validate_error, err);
    }

    pub fn set_send_error(&self, err: Option<PartnerError>) {
        Self::set(&self.send_error, err);
    }

    /// Artificial latency applied before every response
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    async fn simulate_latency(&self) {
        let ms = self.delay_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    pub fn last_payout(&self) -> Option<PayoutRequest> {
        Self::get(&self.last_payout)
    }

    pub fn last_send(&self) -> Option<SendMoneyRequest> {
        Self::get(&self.last_send)
    }

    pub fn inquire_count(&self) -> usize {
        self.inquire_count.load(Ordering::SeqCst)
    }

    pub fn payout_count(&self) -> usize {
        self.payout_count.load(Ordering::SeqCst)
    }

    pub fn validate_count(&self) -> usize {
        self.validate_count.load(Ordering::SeqCst)
    }

    pub fn send_count(&self) -> usize {
        self.send_count.load(Ordering::SeqCst)
    }

    /// Total partner round-trips of any kind
    pub fn call_count(&self) -> usize {
        self.inquire_count() + self.payout_count() + self.validate_count() + self.send_count()
    }
}

#[async_trait]
impl PartnerClient for MockPartnerClient {
    fn partner_code(&self) -> &str {
        &self.partner_code
    }

    async fn inquire(&self, req: &InquireRequest) -> Result<InquireResponse, PartnerError> {
        self.inquire_count.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if let Some(err) = Self::get(&self.inquire_error) {
            return Err(err);
        }
        match Self::get(&self.inquiry) {
            Some(inquiry) if inquiry.control_number == req.control_number => Ok(inquiry),
            _ => Err(PartnerError::partner(
                "MOCK-404",
                format!("control number {} not found", req.control_number),
                Some(404),
            )),
        }
    }

    async fn payout(&self, req: &PayoutRequest) -> Result<PayoutResponse, PartnerError> {
        self.payout_count.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        Self::set(&self.last_payout, Some(req.clone()));

        if let Some(err) = Self::get(&self.payout_error) {
            return Err(err);
        }
        Ok(PayoutResponse {
            control_number: req.control_number.clone(),
            status: "PAID".to_string(),
            extra: Default::default(),
        })
    }

    async fn validate_send(&self, req: &SendValidateRequest) -> Result<SendQuote, PartnerError> {
        self.validate_count.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if let Some(err) = Self::get(&self.validate_error) {
            return Err(err);
        }
        Self::get(&self.quote).ok_or_else(|| {
            PartnerError::partner(
                "MOCK-500",
                format!("no quote configured for order {}", req.order_id),
                Some(500),
            )
        })
    }

    async fn send_money(&self, req: &SendMoneyRequest) -> Result<SendAck, PartnerError> {
        self.send_count.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        Self::set(&self.last_send, Some(req.clone()));

        if let Some(err) = Self::get(&self.send_error) {
            return Err(err);
        }
        let control_number = if req.quote.control_number.is_empty() {
            format!("MOCK{}", ulid::Ulid::new())
        } else {
            req.quote.control_number.clone()
        };
        Ok(SendAck {
            control_number,
            status: "SENT".to_string(),
            extra: Default::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::types::LocationContext;

    fn inquire_req(control_number: &str) -> InquireRequest {
        InquireRequest {
            control_number: control_number.to_string(),
            reference_number: "REF1".to_string(),
            location: LocationContext::default(),
        }
    }

    #[tokio::test]
    async fn test_mock_inquiry_lookup() {
        let client = MockPartnerClient::new("RIA");
        client.set_inquiry(InquireResponse {
            control_number: "CTRL123".into(),
            status: "Available".into(),
            currency: "PHP".into(),
            principal_amount: "100.00".into(),
            ..Default::default()
        });

        assert!(client.inquire(&inquire_req("CTRL123")).await.is_ok());
        let err = client.inquire(&inquire_req("OTHER")).await.unwrap_err();
        assert_eq!(err.code, "MOCK-404");
        assert_eq!(client.inquire_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_injected_failure() {
        let client = MockPartnerClient::new("RIA");
        client.set_inquire_error(Some(PartnerError::transport("connection reset")));
        let err = client.inquire(&inquire_req("CTRL123")).await.unwrap_err();
        assert!(!err.is_partner());
        assert_eq!(client.call_count(), 1);
    }
}
