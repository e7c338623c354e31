//! Aggregation pipelines executed by the database.

use mongodb::bson::{Bson, Document, doc};

/// Sum of `price` across every payment, as a single `totalRevenue` row.
/// Produces no rows when there are no payments.
pub fn total_revenue() -> Vec<Document> {
    vec![doc! {
        "$group": {
            "_id": Bson::Null,
            "totalRevenue": { "$sum": "$price" },
        }
    }]
}

/// Per-category quantity and revenue over payments' `menuItemIds`.
///
/// Each id is joined against `menu_collection` by `_id`; ids that are not valid
/// object ids convert to null and, like ids with no menu document, drop out at
/// the second `$unwind`. Revenue sums the menu document's current `price`.
pub fn order_stats(menu_collection: &str) -> Vec<Document> {
    vec![
        doc! { "$unwind": "$menuItemIds" },
        doc! {
            "$addFields": {
                "menuItemObjectId": {
                    "$convert": {
                        "input": "$menuItemIds",
                        "to": "objectId",
                        "onError": Bson::Null,
                        "onNull": Bson::Null,
                    }
                }
            }
        },
        doc! {
            "$lookup": {
                "from": menu_collection,
                "localField": "menuItemObjectId",
                "foreignField": "_id",
                "as": "menuItems",
            }
        },
        doc! { "$unwind": "$menuItems" },
        doc! {
            "$group": {
                "_id": "$menuItems.category",
                "quantity": { "$sum": 1 },
                "revenue": { "$sum": "$menuItems.price" },
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "category": { "$ifNull": ["$_id", ""] },
                "quantity": "$quantity",
                "revenue": "$revenue",
            }
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_names(pipeline: &[Document]) -> Vec<&str> {
        pipeline
            .iter()
            .map(|stage| stage.keys().next().map(String::as_str).unwrap_or_default())
            .collect()
    }

    #[test]
    fn revenue_groups_everything_together() {
        let pipeline = total_revenue();
        assert_eq!(stage_names(&pipeline), vec!["$group"]);

        let group = pipeline[0].get_document("$group").unwrap();
        assert_eq!(group.get("_id"), Some(&Bson::Null));
        assert_eq!(
            group.get_document("totalRevenue").unwrap().get_str("$sum").unwrap(),
            "$price"
        );
    }

    #[test]
    fn order_stats_unwinds_joins_and_groups() {
        let pipeline = order_stats("menu");
        assert_eq!(
            stage_names(&pipeline),
            vec!["$unwind", "$addFields", "$lookup", "$unwind", "$group", "$project"]
        );

        let lookup = pipeline[2].get_document("$lookup").unwrap();
        assert_eq!(lookup.get_str("from").unwrap(), "menu");
        assert_eq!(lookup.get_str("foreignField").unwrap(), "_id");

        let group = pipeline[4].get_document("$group").unwrap();
        assert_eq!(group.get_str("_id").unwrap(), "$menuItems.category");
        assert_eq!(
            group.get_document("revenue").unwrap().get_str("$sum").unwrap(),
            "$menuItems.price"
        );
    }
}
