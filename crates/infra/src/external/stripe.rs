//! Stripe payment-intents client.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::payment_gateway::{GatewayError, IntentRequest, PaymentGateway, PaymentIntent};

#[derive(Clone)]
pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: SecretString,
    api_base: String,
}

impl StripeGateway {
    pub fn new(secret_key: SecretString, api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn form(request: &IntentRequest) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("amount", request.amount.to_string()),
            ("currency", request.currency.clone()),
        ];
        for method in &request.payment_method_types {
            form.push(("payment_method_types[]", method.clone()));
        }
        form
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(&self, request: IntentRequest) -> Result<PaymentIntent, GatewayError> {
        let url = format!("{}/v1/payment_intents", self.api_base);
        debug!(amount = request.amount, currency = %request.currency, "creating payment intent");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .form(&Self::form(&request))
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))
    }
}
