//! Payment recording.
//!
//! A checkout stores the payment document and then clears the cart entries it
//! consumed. The two writes are not atomic: if the cart cleanup fails the
//! payment stays recorded and the error is reported to the caller.

use serde::Serialize;
use tracing::{debug, warn};

use bistro_core::{DeleteOutcome, DocumentId, InsertOutcome, Payment};

use crate::store::{CartStore, PaymentStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub payment_result: InsertOutcome,
    pub delete_result: DeleteOutcome,
}

pub async fn record_payment(
    payments: &dyn PaymentStore,
    carts: &dyn CartStore,
    payment: Payment,
) -> Result<PaymentReceipt, StoreError> {
    let cart_ids = consumed_cart_ids(&payment.cart_ids);

    let payment_result = payments.insert(payment).await?;
    debug!(inserted_id = ?payment_result.inserted_id, "payment recorded");

    let delete_result = carts.delete_many(&cart_ids).await?;

    Ok(PaymentReceipt {
        payment_result,
        delete_result,
    })
}

/// Ids that do not parse cannot match any cart entry and are dropped.
fn consumed_cart_ids(raw: &[String]) -> Vec<DocumentId> {
    raw.iter()
        .filter_map(|id| match id.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(cart_id = %id, "ignoring malformed cart id in payment");
                None
            }
        })
        .collect()
}
