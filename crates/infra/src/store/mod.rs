//! Document store boundary.
//!
//! One trait per collection plus the [`Analytics`] aggregation engine. Routes
//! talk to these traits only; [`Stores`] bundles the handles chosen at startup
//! so they can be injected wherever they are needed.

pub mod in_memory;
pub mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use bistro_core::{
    AdminStats, CartItem, CategoryStats, DeleteOutcome, DocumentId, InsertOutcome, MenuItem,
    MenuItemUpdate, Payment, Review, Role, UpdateOutcome, User,
};

pub use in_memory::InMemoryStore;
pub use mongo::MongoStore;

use crate::config::MongoSettings;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("document codec error: {0}")]
    Codec(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait MenuStore: Send + Sync {
    async fn list(&self) -> Result<Vec<MenuItem>, StoreError>;
    async fn get(&self, id: &DocumentId) -> Result<Option<MenuItem>, StoreError>;
    async fn insert(&self, item: MenuItem) -> Result<InsertOutcome, StoreError>;
    async fn update(&self, id: &DocumentId, update: &MenuItemUpdate) -> Result<UpdateOutcome, StoreError>;
    async fn delete(&self, id: &DocumentId) -> Result<DeleteOutcome, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn insert(&self, user: User) -> Result<InsertOutcome, StoreError>;
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    async fn delete(&self, id: &DocumentId) -> Result<DeleteOutcome, StoreError>;
    async fn set_role(&self, id: &DocumentId, role: Role) -> Result<UpdateOutcome, StoreError>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
    /// All cart entries, or only those owned by `email`.
    async fn list(&self, email: Option<&str>) -> Result<Vec<CartItem>, StoreError>;
    async fn insert(&self, item: CartItem) -> Result<InsertOutcome, StoreError>;
    async fn delete(&self, id: &DocumentId) -> Result<DeleteOutcome, StoreError>;
    /// Delete every entry whose id is in `ids`. Missing ids are ignored.
    async fn delete_many(&self, ids: &[DocumentId]) -> Result<DeleteOutcome, StoreError>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn list(&self, email: Option<&str>) -> Result<Vec<Review>, StoreError>;
    async fn insert(&self, review: Review) -> Result<InsertOutcome, StoreError>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn insert(&self, payment: Payment) -> Result<InsertOutcome, StoreError>;
    async fn list_by_email(&self, email: &str) -> Result<Vec<Payment>, StoreError>;
}

/// Read-only rollups over payments and the menu, computed at query time.
#[async_trait]
pub trait Analytics: Send + Sync {
    /// Estimated collection sizes plus total revenue (0 with no payments).
    async fn admin_summary(&self) -> Result<AdminStats, StoreError>;

    /// Quantity and current-price revenue per menu category. Unordered.
    async fn order_stats(&self) -> Result<Vec<CategoryStats>, StoreError>;
}

/// Collection handles injected into the API.
#[derive(Clone)]
pub struct Stores {
    pub menu: Arc<dyn MenuStore>,
    pub users: Arc<dyn UserStore>,
    pub carts: Arc<dyn CartStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub payments: Arc<dyn PaymentStore>,
    pub analytics: Arc<dyn Analytics>,
}

impl Stores {
    /// Use one backend for every collection.
    pub fn from_backend<S>(store: Arc<S>) -> Self
    where
        S: MenuStore + UserStore + CartStore + ReviewStore + PaymentStore + Analytics + 'static,
    {
        Self {
            menu: store.clone(),
            users: store.clone(),
            carts: store.clone(),
            reviews: store.clone(),
            payments: store.clone(),
            analytics: store,
        }
    }

    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(InMemoryStore::new()))
    }

    pub async fn connect_mongo(settings: &MongoSettings) -> Result<Self, StoreError> {
        let store = MongoStore::connect(settings).await?;
        Ok(Self::from_backend(Arc::new(store)))
    }
}
