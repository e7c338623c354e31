//! External service clients.

pub mod payment_gateway;
pub mod stripe;

pub use payment_gateway::{
    GatewayError, IntentRequest, PaymentGateway, PaymentIntent, UnconfiguredGateway,
};
pub use stripe::StripeGateway;
