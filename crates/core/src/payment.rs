//! Payment records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::impl_entity;
use crate::{DocumentId, Extra};

/// A completed checkout.
///
/// `cart_ids` are the cart entries consumed by this payment; `menu_item_ids`
/// are the purchased dishes and drive the category rollup. Both hold document
/// identifiers as plain strings, exactly as the client sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub cart_ids: Vec<String>,
    #[serde(default)]
    pub menu_item_ids: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl_entity!(Payment);

/// Convert a major-unit price to integer minor units (cents), truncating.
///
/// No validation happens here: negative prices stay negative and non-finite
/// input collapses to 0.
pub fn to_minor_units(price: f64) -> i64 {
    (price * 100.0).trunc() as i64
}
