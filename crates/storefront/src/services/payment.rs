//! Razorpay payment gateway client.
//!
//! Two responsibilities: creating a gateway order (payment intent) for a
//! cart total, and verifying the HMAC signature Razorpay returns after
//! the customer completes payment.
//!
//! Verification is fail-closed: any mismatch, malformed input, or missing
//! configuration yields `false`. An unverifiable payment is never treated
//! as confirmed.

use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, instrument};

use protein_perks_core::Rupees;

use crate::config::RazorpayConfig;

/// Razorpay REST API base URL.
const RAZORPAY_API_BASE: &str = "https://api.razorpay.com";

/// Gateway calls are single-attempt with a bounded timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Gateway credentials are not configured.
    #[error("payment gateway is not configured")]
    NotConfigured,

    /// HTTP request failed (connect, timeout, or body decode).
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway rejected the request.
    #[error("gateway rejected request ({status}): {message}")]
    Gateway { status: u16, message: String },
}

/// A gateway order created for a checkout intent.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    /// Gateway-assigned order ID, echoed back during verification
    pub id: String,
    /// Amount in paise
    pub amount: i64,
    pub currency: String,
}

#[derive(Deserialize)]
struct GatewayErrorBody {
    error: Option<GatewayErrorDetail>,
}

#[derive(Deserialize)]
struct GatewayErrorDetail {
    description: Option<String>,
}

/// Client for the Razorpay Orders API.
#[derive(Clone)]
pub struct RazorpayClient {
    client: Client,
    key_id: String,
    key_secret: SecretString,
    base_url: String,
}

impl std::fmt::Debug for RazorpayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayClient")
            .field("key_id", &self.key_id)
            .field("key_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl RazorpayClient {
    /// Create a new gateway client.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the underlying HTTP client cannot be
    /// built.
    pub fn new(config: &RazorpayConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
            base_url: RAZORPAY_API_BASE.to_string(),
        })
    }

    /// The key ID, needed by the client-side checkout widget.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Create a gateway order for `amount`, converted to paise on the
    /// wire.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Gateway` if the gateway rejects the
    /// request, or `PaymentError::Http` on transport failure. Single
    /// attempt, no retry.
    #[instrument(skip(self), fields(amount = %amount))]
    pub async fn create_order(
        &self,
        amount: Rupees,
        receipt: &str,
    ) -> Result<GatewayOrder, PaymentError> {
        let response = self
            .client
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(&serde_json::json!({
                "amount": amount.to_paise(),
                "currency": "INR",
                "receipt": receipt,
                "payment_capture": 1,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<GatewayErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.description)
                .unwrap_or_else(|| "no error details provided".to_string());

            return Err(PaymentError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        let order = response.json::<GatewayOrder>().await?;
        debug!(gateway_order_id = %order.id, "gateway order created");
        Ok(order)
    }

    /// Verify the payment signature returned by the gateway.
    ///
    /// Razorpay signs `"{order_id}|{payment_id}"` with the key secret
    /// using HMAC-SHA256 and hex-encodes the result. Returns `false` for
    /// any mismatch or setup failure - never an error.
    #[must_use]
    pub fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let payload = format!("{order_id}|{payment_id}");

        let Ok(mut mac) =
            Hmac::<Sha256>::new_from_slice(self.key_secret.expose_secret().as_bytes())
        else {
            return false;
        };
        mac.update(payload.as_bytes());

        let expected = hex::encode(mac.finalize().into_bytes());
        constant_time_compare(&expected, signature)
    }
}

/// Verify a payment signature against an optionally-configured client.
///
/// A missing client means the payment cannot be verified, which is a
/// verification failure, not a pass.
#[must_use]
pub fn verify_payment(
    client: Option<&RazorpayClient>,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    client.is_some_and(|c| c.verify_signature(order_id, payment_id, signature))
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_client() -> RazorpayClient {
        RazorpayClient::new(&RazorpayConfig {
            key_id: "rzp_test_abc123".to_string(),
            key_secret: SecretString::from("test_key_secret_value"),
        })
        .unwrap()
    }

    fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_verify_signature_accepts_valid() {
        let client = test_client();
        let signature = sign("test_key_secret_value", "order_abc", "pay_xyz");
        assert!(client.verify_signature("order_abc", "pay_xyz", &signature));
    }

    #[test]
    fn test_verify_signature_rejects_tampered_payment_id() {
        let client = test_client();
        let signature = sign("test_key_secret_value", "order_abc", "pay_xyz");
        assert!(!client.verify_signature("order_abc", "pay_other", &signature));
    }

    #[test]
    fn test_verify_signature_rejects_tampered_signature() {
        let client = test_client();
        let mut signature = sign("test_key_secret_value", "order_abc", "pay_xyz");
        signature.replace_range(0..1, if signature.starts_with('0') { "1" } else { "0" });
        assert!(!client.verify_signature("order_abc", "pay_xyz", &signature));
    }

    #[test]
    fn test_verify_signature_rejects_wrong_secret() {
        let client = test_client();
        let signature = sign("some_other_secret", "order_abc", "pay_xyz");
        assert!(!client.verify_signature("order_abc", "pay_xyz", &signature));
    }

    #[test]
    fn test_verify_payment_unconfigured_is_false() {
        let signature = sign("test_key_secret_value", "order_abc", "pay_xyz");
        assert!(!verify_payment(None, "order_abc", "pay_xyz", &signature));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abcd", "abcd"));
        assert!(!constant_time_compare("abcd", "abce"));
        assert!(!constant_time_compare("abcd", "abc"));
        assert!(constant_time_compare("", ""));
    }
}
