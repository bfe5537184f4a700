pub mod stripe;

use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::Result;

pub use stripe::StripeGateway;

/// Card token produced by the client-side checkout widget.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PaymentToken {
    pub id: String,
    pub email: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Captures `amount` (minor units) and returns the processor's payment id.
    /// The same `idempotency_key` never charges twice.
    async fn charge(
        &self,
        amount: i64,
        currency: &str,
        token: &PaymentToken,
        idempotency_key: &str,
    ) -> Result<String>;

    /// Refunds the full amount of a captured payment. Retrying with the same
    /// `idempotency_key` replays the first outcome instead of refunding again.
    async fn refund(&self, payment_id: &str, idempotency_key: &str) -> Result<()>;
}
