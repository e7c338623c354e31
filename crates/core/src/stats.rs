//! Revenue and category rollups over payments.
//!
//! These are the in-process equivalents of the store's aggregation pipelines:
//! pure functions of the current payment and menu documents.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{DocumentId, MenuItem, Payment};

/// Dashboard counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub users: u64,
    pub menu_items: u64,
    pub orders: u64,
    pub revenue: f64,
}

/// Items sold and revenue for one menu category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: String,
    pub quantity: u64,
    pub revenue: f64,
}

/// Sum of `price` over all payments; 0 when there are none.
pub fn total_revenue(payments: &[Payment]) -> f64 {
    payments.iter().map(|p| p.price).sum()
}

/// Per-category quantity and revenue.
///
/// Each payment contributes one row per entry in `menu_item_ids`. Entries that
/// do not name an existing menu item contribute nothing. Revenue sums the
/// menu item's *current* price, not what was paid at checkout.
///
/// Categories are returned in first-seen order; callers must not rely on it.
pub fn category_breakdown(payments: &[Payment], menu: &[MenuItem]) -> Vec<CategoryStats> {
    let by_id: HashMap<&DocumentId, &MenuItem> = menu
        .iter()
        .filter_map(|item| item.id.as_ref().map(|id| (id, item)))
        .collect();

    let mut rows: Vec<CategoryStats> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let resolved = payments
        .iter()
        .flat_map(|p| p.menu_item_ids.iter())
        .filter_map(|raw| raw.parse::<DocumentId>().ok())
        .filter_map(|id| by_id.get(&id).copied());

    for item in resolved {
        let slot = *index.entry(item.category.clone()).or_insert_with(|| {
            rows.push(CategoryStats {
                category: item.category.clone(),
                quantity: 0,
                revenue: 0.0,
            });
            rows.len() - 1
        });
        let row = &mut rows[slot];
        row.quantity += 1;
        row.revenue += item.price;
    }

    rows
}
