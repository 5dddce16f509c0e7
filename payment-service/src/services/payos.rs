//! PayOS hosted checkout client.
//!
//! Implements the payment-request API for checkout-link generation. The
//! request signature is HMAC-SHA256 over the alphabetically ordered
//! key=value pairs, keyed by the merchant checksum key.

use anyhow::{anyhow, Result};
use hmac::{Hmac, Mac};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::PayosConfig;

#[derive(Clone)]
pub struct PayosClient {
    client: Client,
    config: PayosConfig,
}

/// Request body for a PayOS payment link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentLinkRequest {
    /// Merchant-side order reference; must be unique per link.
    pub order_code: i64,
    /// Amount in whole currency units.
    pub amount: u64,
    pub description: String,
    pub cancel_url: String,
    pub return_url: String,
    pub signature: String,
}

#[derive(Debug, Deserialize)]
pub struct PayosResponse {
    pub code: String,
    pub desc: String,
    pub data: Option<PaymentLinkData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkData {
    pub payment_link_id: String,
    pub checkout_url: String,
    pub order_code: i64,
    pub amount: u64,
    pub status: String,
}

impl PayosClient {
    pub fn new(config: PayosConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Check if PayOS is configured (credentials are set).
    pub fn is_configured(&self) -> bool {
        !self.config.client_id.is_empty()
            && !self.config.api_key.expose_secret().is_empty()
            && !self.config.checksum_key.expose_secret().is_empty()
    }

    /// Create a hosted checkout link for the given order.
    ///
    /// # Arguments
    /// * `order_code` - Merchant order reference (the invoice id)
    /// * `amount` - Amount in whole currency units, must be positive
    /// * `description` - Short text shown on the checkout page
    pub async fn create_payment_link(
        &self,
        order_code: i64,
        amount: u64,
        description: &str,
    ) -> Result<PaymentLinkData> {
        if !self.is_configured() {
            return Err(anyhow!("PayOS credentials not configured"));
        }
        if order_code <= 0 {
            return Err(anyhow!("Order code must be positive"));
        }
        if amount == 0 {
            return Err(anyhow!("Amount must be positive"));
        }

        let signature = self.sign_payment_request(order_code, amount, description)?;

        let request = CreatePaymentLinkRequest {
            order_code,
            amount,
            description: description.to_string(),
            cancel_url: self.config.cancel_url.clone(),
            return_url: self.config.return_url.clone(),
            signature,
        };

        let url = format!("{}/v2/payment-requests", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("x-client-id", &self.config.client_id)
            .header("x-api-key", self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, body = %body, "PayOS create_payment_link response");

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "PayOS request failed");
            return Err(anyhow!("PayOS request failed with status {}", status));
        }

        let parsed: PayosResponse = serde_json::from_str(&body)?;
        // "00" is PayOS's success code
        if parsed.code != "00" {
            tracing::error!(
                code = %parsed.code,
                desc = %parsed.desc,
                "PayOS rejected payment link request"
            );
            return Err(anyhow!("PayOS error: {} - {}", parsed.code, parsed.desc));
        }

        let data = parsed
            .data
            .ok_or_else(|| anyhow!("PayOS response missing payment link data"))?;

        tracing::info!(
            order_code = data.order_code,
            amount = data.amount,
            payment_link_id = %data.payment_link_id,
            "PayOS payment link created"
        );

        Ok(data)
    }

    /// Signature payload keys must stay in alphabetical order.
    fn sign_payment_request(
        &self,
        order_code: i64,
        amount: u64,
        description: &str,
    ) -> Result<String> {
        let payload = format!(
            "amount={}&cancelUrl={}&description={}&orderCode={}&returnUrl={}",
            amount, self.config.cancel_url, description, order_code, self.config.return_url
        );
        self.compute_signature(&payload, self.config.checksum_key.expose_secret())
    }

    /// Compute HMAC-SHA256 signature.
    fn compute_signature(&self, payload: &str, secret: &str) -> Result<String> {
        type HmacSha256 = Hmac<Sha256>;
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| anyhow!("Invalid key length"))?;
        mac.update(payload.as_bytes());
        let result = mac.finalize();
        Ok(hex::encode(result.into_bytes()))
    }
}
