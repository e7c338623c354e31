//! Payment-intent boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Processor returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("payment processor is not configured")]
    NotConfigured,
}

/// A request to authorize a card payment, amount in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRequest {
    pub amount: i64,
    pub currency: String,
    pub payment_method_types: Vec<String>,
}

impl IntentRequest {
    /// USD card payment for `amount` cents.
    pub fn card_usd(amount: i64) -> Self {
        Self {
            amount,
            currency: "usd".to_string(),
            payment_method_types: vec!["card".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_intent(&self, request: IntentRequest) -> Result<PaymentIntent, GatewayError>;
}

/// Stand-in used when no processor key is configured.
#[derive(Debug, Default)]
pub struct UnconfiguredGateway;

#[async_trait]
impl PaymentGateway for UnconfiguredGateway {
    async fn create_intent(&self, _request: IntentRequest) -> Result<PaymentIntent, GatewayError> {
        Err(GatewayError::NotConfigured)
    }
}
