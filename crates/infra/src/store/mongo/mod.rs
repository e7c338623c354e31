//! MongoDB implementation of the store traits.

pub mod codec;
pub mod pipelines;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Document, doc};
use mongodb::{Client, Collection, Database};
use secrecy::ExposeSecret;
use tracing::info;

use bistro_core::{
    AdminStats, CartItem, CategoryStats, DeleteOutcome, DocumentId, InsertOutcome, MenuItem,
    MenuItemUpdate, Payment, Review, Role, UpdateOutcome, User,
};

use self::codec::{decode, decode_all, encode_new, number, object_id};
use super::{Analytics, CartStore, MenuStore, PaymentStore, ReviewStore, StoreError, UserStore};
use crate::config::MongoSettings;

/// Collection names.
pub const MENU_COLLECTION: &str = "menu";
pub const REVIEWS_COLLECTION: &str = "reviews";
pub const CARTS_COLLECTION: &str = "carts";
pub const USERS_COLLECTION: &str = "users";
pub const PAYMENTS_COLLECTION: &str = "payments";

/// MongoDB-backed store: one handle per collection, sharing the driver's pool.
pub struct MongoStore {
    menu: Collection<Document>,
    reviews: Collection<Document>,
    carts: Collection<Document>,
    users: Collection<Document>,
    payments: Collection<Document>,
}

impl MongoStore {
    /// Connect, verify the deployment answers a ping, and open the collections.
    pub async fn connect(settings: &MongoSettings) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(settings.uri.expose_secret()).await?;
        let database = client.database(&settings.database);

        database.run_command(doc! { "ping": 1 }).await?;
        info!(database = %settings.database, "connected to MongoDB");

        Ok(Self::new(&database))
    }

    pub fn new(database: &Database) -> Self {
        Self {
            menu: database.collection(MENU_COLLECTION),
            reviews: database.collection(REVIEWS_COLLECTION),
            carts: database.collection(CARTS_COLLECTION),
            users: database.collection(USERS_COLLECTION),
            payments: database.collection(PAYMENTS_COLLECTION),
        }
    }
}

async fn find_all<T: serde::de::DeserializeOwned>(
    collection: &Collection<Document>,
    filter: Document,
) -> Result<Vec<T>, StoreError> {
    let docs: Vec<Document> = collection.find(filter).await?.try_collect().await?;
    decode_all(docs)
}

async fn find_one<T: serde::de::DeserializeOwned>(
    collection: &Collection<Document>,
    filter: Document,
) -> Result<Option<T>, StoreError> {
    collection.find_one(filter).await?.map(decode).transpose()
}

async fn insert<T: serde::Serialize>(
    collection: &Collection<Document>,
    value: &T,
) -> Result<InsertOutcome, StoreError> {
    let (id, doc) = encode_new(value)?;
    collection.insert_one(doc).await?;
    Ok(InsertOutcome::inserted(id))
}

async fn delete_by_id(
    collection: &Collection<Document>,
    id: &DocumentId,
) -> Result<DeleteOutcome, StoreError> {
    let result = collection.delete_one(doc! { "_id": object_id(id)? }).await?;
    Ok(DeleteOutcome::deleted(result.deleted_count))
}

fn by_email(email: Option<&str>) -> Document {
    email.map(|e| doc! { "email": e }).unwrap_or_default()
}

#[async_trait]
impl MenuStore for MongoStore {
    async fn list(&self) -> Result<Vec<MenuItem>, StoreError> {
        find_all(&self.menu, doc! {}).await
    }

    async fn get(&self, id: &DocumentId) -> Result<Option<MenuItem>, StoreError> {
        find_one(&self.menu, doc! { "_id": object_id(id)? }).await
    }

    async fn insert(&self, item: MenuItem) -> Result<InsertOutcome, StoreError> {
        insert(&self.menu, &item).await
    }

    async fn update(&self, id: &DocumentId, update: &MenuItemUpdate) -> Result<UpdateOutcome, StoreError> {
        let filter = doc! { "_id": object_id(id)? };

        // The server rejects an empty `$set`.
        if update.is_empty() {
            let matched = self.menu.count_documents(filter).await?;
            return Ok(UpdateOutcome::new(matched, 0));
        }

        let fields = bson::to_document(update).map_err(|e| StoreError::Codec(e.to_string()))?;
        let result = self.menu.update_one(filter, doc! { "$set": fields }).await?;
        Ok(UpdateOutcome::new(result.matched_count, result.modified_count))
    }

    async fn delete(&self, id: &DocumentId) -> Result<DeleteOutcome, StoreError> {
        delete_by_id(&self.menu, id).await
    }
}

#[async_trait]
impl UserStore for MongoStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        find_one(&self.users, doc! { "email": email }).await
    }

    async fn insert(&self, user: User) -> Result<InsertOutcome, StoreError> {
        insert(&self.users, &user).await
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        find_all(&self.users, doc! {}).await
    }

    async fn delete(&self, id: &DocumentId) -> Result<DeleteOutcome, StoreError> {
        delete_by_id(&self.users, id).await
    }

    async fn set_role(&self, id: &DocumentId, role: Role) -> Result<UpdateOutcome, StoreError> {
        let result = self
            .users
            .update_one(
                doc! { "_id": object_id(id)? },
                doc! { "$set": { "role": role.as_str() } },
            )
            .await?;
        Ok(UpdateOutcome::new(result.matched_count, result.modified_count))
    }
}

#[async_trait]
impl CartStore for MongoStore {
    async fn list(&self, email: Option<&str>) -> Result<Vec<CartItem>, StoreError> {
        find_all(&self.carts, by_email(email)).await
    }

    async fn insert(&self, item: CartItem) -> Result<InsertOutcome, StoreError> {
        insert(&self.carts, &item).await
    }

    async fn delete(&self, id: &DocumentId) -> Result<DeleteOutcome, StoreError> {
        delete_by_id(&self.carts, id).await
    }

    async fn delete_many(&self, ids: &[DocumentId]) -> Result<DeleteOutcome, StoreError> {
        let oids = ids.iter().map(object_id).collect::<Result<Vec<_>, _>>()?;
        let result = self
            .carts
            .delete_many(doc! { "_id": { "$in": oids } })
            .await?;
        Ok(DeleteOutcome::deleted(result.deleted_count))
    }
}

#[async_trait]
impl ReviewStore for MongoStore {
    async fn list(&self, email: Option<&str>) -> Result<Vec<Review>, StoreError> {
        find_all(&self.reviews, by_email(email)).await
    }

    async fn insert(&self, review: Review) -> Result<InsertOutcome, StoreError> {
        insert(&self.reviews, &review).await
    }
}

#[async_trait]
impl PaymentStore for MongoStore {
    async fn insert(&self, payment: Payment) -> Result<InsertOutcome, StoreError> {
        insert(&self.payments, &payment).await
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<Payment>, StoreError> {
        find_all(&self.payments, doc! { "email": email }).await
    }
}

#[async_trait]
impl Analytics for MongoStore {
    async fn admin_summary(&self) -> Result<AdminStats, StoreError> {
        let users = self.users.estimated_document_count().await?;
        let menu_items = self.menu.estimated_document_count().await?;
        let orders = self.payments.estimated_document_count().await?;

        let rows: Vec<Document> = self
            .payments
            .aggregate(pipelines::total_revenue())
            .await?
            .try_collect()
            .await?;
        let revenue = match rows.first() {
            Some(row) => number(row.get("totalRevenue"))?,
            None => 0.0,
        };

        Ok(AdminStats {
            users,
            menu_items,
            orders,
            revenue,
        })
    }

    async fn order_stats(&self) -> Result<Vec<CategoryStats>, StoreError> {
        let rows: Vec<Document> = self
            .payments
            .aggregate(pipelines::order_stats(MENU_COLLECTION))
            .await?
            .try_collect()
            .await?;
        decode_all(rows)
    }
}
