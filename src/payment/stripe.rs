use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{PaymentGateway, PaymentToken};
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
struct StripeObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

/// Charges and refunds through the Stripe REST API.
#[derive(Clone)]
pub struct StripeGateway {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl StripeGateway {
    pub fn new(api_base: &str, secret_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Payment(format!("Failed to build payment client: {}", e)))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    async fn post(
        &self,
        path: &str,
        form: &[(&str, String)],
        idempotency_key: Option<&str>,
    ) -> Result<StripeObject> {
        let mut request = self
            .client
            .post(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.secret_key)
            .form(form);
        if let Some(key) = idempotency_key {
            request = request.header("Idempotency-Key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Payment(format!("Payment service unreachable: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<StripeObject>()
                .await
                .map_err(|e| AppError::Payment(format!("Unreadable payment response: {}", e)));
        }

        let message = response
            .json::<StripeErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or_else(|| format!("Payment request failed with status {}", status));
        warn!("Stripe {} returned {}: {}", path, status, message);
        Err(AppError::Payment(message))
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn charge(
        &self,
        amount: i64,
        currency: &str,
        token: &PaymentToken,
        idempotency_key: &str,
    ) -> Result<String> {
        let form = [
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
            ("source", token.id.clone()),
            ("receipt_email", token.email.clone()),
        ];

        let charge = self.post("/v1/charges", &form, Some(idempotency_key)).await?;
        debug!("Captured charge {}", charge.id);
        Ok(charge.id)
    }

    async fn refund(&self, payment_id: &str, idempotency_key: &str) -> Result<()> {
        let form = [("charge", payment_id.to_string())];

        let refund = self
            .post("/v1/refunds", &form, Some(idempotency_key))
            .await?;
        debug!("Refunded charge {} as {}", payment_id, refund.id);
        Ok(())
    }
}
