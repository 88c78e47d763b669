//! HTTP partner client
//!
//! Posts normalized JSON to the partner's gateway and decodes the common
//! envelope:
//!
//! ```text
//! { "code": "200", "message": "Good", "result": { ... } }
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::PartnerError;
use super::types::{
    InquireRequest, InquireResponse, PayoutRequest, PayoutResponse, SendAck, SendMoneyRequest,
    SendQuote, SendValidateRequest,
};
use super::PartnerClient;

/// Envelope codes that mean success
const SUCCESS_CODES: &[&str] = &["0", "200", "00", "000"];

/// Response envelope shared by partner gateways
#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    code: Value,
    #[serde(default)]
    message: String,
    result: Option<T>,
}

fn code_to_string(code: &Value) -> String {
    match code {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Partner client over HTTP/JSON
pub struct HttpPartnerClient {
    partner_code: String,
    base_url: String,
    client: reqwest::Client,
}

impl HttpPartnerClient {
    /// Create a client for `partner_code` rooted at `base_url`
    pub fn new(partner_code: &str, base_url: &str, timeout: Duration) -> Result<Self, PartnerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PartnerError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(partner_code, base_url, client))
    }

    /// Create a client over an already configured `reqwest::Client`
    pub fn with_client(partner_code: &str, base_url: &str, client: reqwest::Client) -> Self {
        Self {
            partner_code: partner_code.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn endpoint(&self, operation: &str) -> String {
        format!(
            "{}/v1/remit/{}/{}",
            self.base_url,
            self.partner_code.to_ascii_lowercase(),
            operation
        )
    }

    /// Send one request and unwrap the envelope
    ///
    /// `Ok(None)` is a success envelope without a `result` body.
    async fn call<B, R>(&self, operation: &str, body: &B) -> Result<Option<R>, PartnerError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(operation);
        debug!(partner = %self.partner_code, url = %url, "Partner request");

        let response = self
            .client
            .post(&url)
            .header("X-Partner-Code", &self.partner_code)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        let envelope: Envelope<R> = match serde_json::from_str(&text) {
            Ok(env) => env,
            Err(e) => {
                if status.is_success() {
                    return Err(PartnerError::internal(format!(
                        "unexpected partner response: {}",
                        e
                    )));
                }
                // Error pages without an envelope
                return Err(PartnerError::partner(
                    status.as_u16().to_string(),
                    status.canonical_reason().unwrap_or("partner error"),
                    Some(status.as_u16()),
                ));
            }
        };

        let code = code_to_string(&envelope.code);
        let ok_code = code.is_empty() || SUCCESS_CODES.contains(&code.as_str());
        if status.is_success() && ok_code {
            return Ok(envelope.result);
        }

        warn!(
            partner = %self.partner_code,
            operation = operation,
            http_status = status.as_u16(),
            code = %code,
            "Partner rejected request"
        );
        let code = if code.is_empty() {
            status.as_u16().to_string()
        } else {
            code
        };
        Err(PartnerError::partner(
            code,
            envelope.message,
            Some(status.as_u16()),
        ))
    }

    /// Call an operation whose success must carry a `result`
    async fn post<B, R>(&self, operation: &str, body: &B) -> Result<R, PartnerError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        self.call(operation, body)
            .await?
            .ok_or_else(|| PartnerError::internal(format!("{} response has no result", operation)))
    }

    /// Call an acknowledgement-style operation; a bare success envelope is an empty ack
    async fn post_ack<B, R>(&self, operation: &str, body: &B) -> Result<R, PartnerError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Default,
    {
        Ok(self.call(operation, body).await?.unwrap_or_default())
    }
}

#[async_trait]
impl PartnerClient for HttpPartnerClient {
    fn partner_code(&self) -> &str {
        &self.partner_code
    }

    async fn inquire(&self, req: &InquireRequest) -> Result<InquireResponse, PartnerError> {
        self.post("inquire", req).await
    }

    async fn payout(&self, req: &PayoutRequest) -> Result<PayoutResponse, PartnerError> {
        self.post_ack("payout", req).await
    }

    async fn validate_send(&self, req: &SendValidateRequest) -> Result<SendQuote, PartnerError> {
        self.post("send/validate", req).await
    }

    async fn send_money(&self, req: &SendMoneyRequest) -> Result<SendAck, PartnerError> {
        self.post_ack("send/confirm", req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PartnerErrorClass;

    #[test]
    fn test_endpoint_layout() {
        let client =
            HttpPartnerClient::new("RIA", "https://partners.local/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.partner_code(), "RIA");
        assert_eq!(
            client.endpoint("inquire"),
            "https://partners.local/v1/remit/ria/inquire"
        );
    }

    #[test]
    fn test_envelope_code_forms() {
        let env: Envelope<Value> =
            serde_json::from_str(r#"{"code": 200, "message": "Good", "result": {}}"#).unwrap();
        assert_eq!(code_to_string(&env.code), "200");
        let env: Envelope<Value> =
            serde_json::from_str(r#"{"code": "T-001", "message": "Bad"}"#).unwrap();
        assert_eq!(code_to_string(&env.code), "T-001");
        assert!(env.result.is_none());
    }

    #[tokio::test]
    async fn test_bare_success_envelope() {
        let base = test_server::serve(vec![
            ("/payout", 200, r#"{"code":"0","message":"Paid"}"#),
            ("/send/confirm", 200, r#"{"code":"200","message":"Good","result":null}"#),
            ("/inquire", 200, r#"{"code":"0","message":"OK"}"#),
        ])
        .await;
        let client = test_server::client("RIA", &base);
        let body = serde_json::json!({});

        let ack: PayoutResponse = client.post_ack("payout", &body).await.unwrap();
        assert!(ack.control_number.is_empty());
        let ack: SendAck = client.post_ack("send/confirm", &body).await.unwrap();
        assert_eq!(ack, SendAck::default());

        // Inquiry data is required
        let err = client
            .post::<_, InquireResponse>("inquire", &body)
            .await
            .unwrap_err();
        assert_eq!(err.class, PartnerErrorClass::Internal);
    }

    #[tokio::test]
    async fn test_rejections_are_partner_errors() {
        let base = test_server::serve(vec![
            ("/payout", 200, r#"{"code":"1002","message":"Already paid"}"#),
            ("/send/confirm", 503, r#"{"code":"","message":"Down"}"#),
        ])
        .await;
        let client = test_server::client("RIA", &base);
        let body = serde_json::json!({});

        let err = client
            .post_ack::<_, PayoutResponse>("payout", &body)
            .await
            .unwrap_err();
        assert!(err.is_partner());
        assert_eq!(err.code, "1002");
        assert_eq!(err.http_status, Some(200));

        let err = client
            .post_ack::<_, SendAck>("send/confirm", &body)
            .await
            .unwrap_err();
        assert!(err.is_partner());
        assert_eq!(err.code, "503");
    }
}
