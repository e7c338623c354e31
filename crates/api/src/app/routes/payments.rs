use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
};
use tracing::info;

use bistro_core::{Payment, to_minor_units};
use bistro_infra::external::IntentRequest;
use bistro_infra::{PaymentReceipt, record_payment};

use crate::app::dto::{EmailQuery, PaymentIntentRequest, PaymentIntentResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz::authorize_self;
use crate::context::Identity;

/// Open a card payment with the processor for `price` dollars.
///
/// The price is not validated; a non-numeric one reaches the gateway as 0.
pub async fn create_payment_intent(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, ApiError> {
    let amount = to_minor_units(body.price());
    let intent = services
        .gateway
        .create_intent(IntentRequest::card_usd(amount))
        .await?;

    Ok(Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}

pub async fn create_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Json(payment): Json<Payment>,
) -> Result<Json<PaymentReceipt>, ApiError> {
    let email = payment.email.clone();
    let receipt = record_payment(
        services.stores.payments.as_ref(),
        services.stores.carts.as_ref(),
        payment,
    )
    .await?;

    info!(
        email = %email,
        carts_cleared = receipt.delete_result.deleted_count,
        "payment recorded"
    );
    Ok(Json(receipt))
}

/// Payment history, readable only by its owner.
pub async fn list_payments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    authorize_self(&identity, query.email.as_deref())?;

    let payments = services.stores.payments.list_by_email(identity.email()).await?;
    Ok(Json(payments))
}
