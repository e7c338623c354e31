//! Menu items.

use serde::{Deserialize, Serialize};

use crate::entity::impl_entity;
use crate::{DocumentId, Extra};

/// A dish on the menu.
///
/// `price` is in major currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub recipe: String,
    #[serde(default)]
    pub image: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl_entity!(MenuItem);

/// Partial update of the editable menu fields.
///
/// Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl MenuItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.recipe.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.image.is_none()
    }

    /// Apply the update in place. Returns whether any field actually changed.
    pub fn apply_to(&self, item: &mut MenuItem) -> bool {
        let before = item.clone();
        if let Some(name) = &self.name {
            item.name.clone_from(name);
        }
        if let Some(recipe) = &self.recipe {
            item.recipe.clone_from(recipe);
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(category) = &self.category {
            item.category.clone_from(category);
        }
        if let Some(image) = &self.image {
            item.image.clone_from(image);
        }
        *item != before
    }
}
