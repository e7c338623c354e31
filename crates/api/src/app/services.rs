//! Service wiring: stores, payment gateway, and token signing.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::info;

use bistro_auth::{Hs256Jwt, JwtValidator, TokenIssuer};
use bistro_infra::external::{PaymentGateway, StripeGateway, UnconfiguredGateway};
use bistro_infra::{GatewaySettings, Persistence, Settings, StoreError, Stores};

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppServices {
    pub stores: Stores,
    pub gateway: Arc<dyn PaymentGateway>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub jwt: Arc<dyn JwtValidator>,
}

impl AppServices {
    pub fn new(stores: Stores, gateway: Arc<dyn PaymentGateway>, jwt_secret: &[u8]) -> Self {
        let jwt = Arc::new(Hs256Jwt::new(jwt_secret));
        Self {
            stores,
            gateway,
            tokens: jwt.clone(),
            jwt,
        }
    }

    /// Build production services from settings, connecting to MongoDB if
    /// persistence is enabled.
    pub async fn from_settings(settings: &Settings) -> Result<Self, StoreError> {
        let stores = match &settings.persistence {
            Persistence::InMemory => Stores::in_memory(),
            Persistence::Mongo(mongo) => Stores::connect_mongo(mongo).await?,
        };

        Ok(Self::new(
            stores,
            payment_gateway(&settings.gateway),
            settings.jwt_secret.expose_secret().as_bytes(),
        ))
    }
}

fn payment_gateway(settings: &GatewaySettings) -> Arc<dyn PaymentGateway> {
    match &settings.stripe_secret_key {
        Some(key) => {
            info!(api_base = %settings.api_base, "payment intents go to Stripe");
            Arc::new(StripeGateway::new(key.clone(), settings.api_base.clone()))
        }
        None => Arc::new(UnconfiguredGateway),
    }
}
