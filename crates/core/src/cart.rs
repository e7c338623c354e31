//! Cart items.

use serde::{Deserialize, Serialize};

use crate::entity::impl_entity;
use crate::{DocumentId, Extra};

/// A menu item placed in a customer's cart, with a snapshot of its listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub menu_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl_entity!(CartItem);
