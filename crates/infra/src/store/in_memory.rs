use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use bistro_core::stats::{category_breakdown, total_revenue};
use bistro_core::{
    AdminStats, CartItem, CategoryStats, DeleteOutcome, DocumentId, Entity, InsertOutcome, MenuItem,
    MenuItemUpdate, Payment, Review, Role, UpdateOutcome, User,
};

use super::{Analytics, CartStore, MenuStore, PaymentStore, ReviewStore, StoreError, UserStore};

/// One collection: documents in insertion order.
#[derive(Debug)]
struct Collection<T> {
    docs: RwLock<Vec<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Entity + Clone> Collection<T> {
    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>, StoreError> {
        self.docs
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>, StoreError> {
        self.docs
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn insert(&self, mut doc: T) -> Result<InsertOutcome, StoreError> {
        let id = DocumentId::new();
        doc.set_id(id.clone());
        self.write()?.push(doc);
        Ok(InsertOutcome::inserted(id))
    }

    fn find(&self, pred: impl Fn(&T) -> bool) -> Result<Vec<T>, StoreError> {
        Ok(self.read()?.iter().filter(|d| pred(d)).cloned().collect())
    }

    fn find_by_id(&self, id: &DocumentId) -> Result<Option<T>, StoreError> {
        Ok(self.read()?.iter().find(|d| d.id() == Some(id)).cloned())
    }

    fn len(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.len() as u64)
    }

    fn delete_where(&self, pred: impl Fn(&T) -> bool) -> Result<DeleteOutcome, StoreError> {
        let mut docs = self.write()?;
        let before = docs.len();
        docs.retain(|d| !pred(d));
        Ok(DeleteOutcome::deleted((before - docs.len()) as u64))
    }

    /// `change` returns whether it modified the document.
    fn update_by_id(
        &self,
        id: &DocumentId,
        change: impl FnOnce(&mut T) -> bool,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut docs = self.write()?;
        match docs.iter_mut().find(|d| d.id() == Some(id)) {
            Some(doc) => Ok(UpdateOutcome::new(1, u64::from(change(doc)))),
            None => Ok(UpdateOutcome::new(0, 0)),
        }
    }
}

/// In-memory document store for tests/dev.
///
/// Each collection sits behind its own lock. Writes never hold two locks.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    menu: Collection<MenuItem>,
    users: Collection<User>,
    carts: Collection<CartItem>,
    reviews: Collection<Review>,
    payments: Collection<Payment>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MenuStore for InMemoryStore {
    async fn list(&self) -> Result<Vec<MenuItem>, StoreError> {
        self.menu.find(|_| true)
    }

    async fn get(&self, id: &DocumentId) -> Result<Option<MenuItem>, StoreError> {
        self.menu.find_by_id(id)
    }

    async fn insert(&self, item: MenuItem) -> Result<InsertOutcome, StoreError> {
        self.menu.insert(item)
    }

    async fn update(&self, id: &DocumentId, update: &MenuItemUpdate) -> Result<UpdateOutcome, StoreError> {
        self.menu.update_by_id(id, |item| update.apply_to(item))
    }

    async fn delete(&self, id: &DocumentId) -> Result<DeleteOutcome, StoreError> {
        self.menu.delete_where(|d| d.id.as_ref() == Some(id))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.find(|u| u.email == email)?.into_iter().next())
    }

    async fn insert(&self, user: User) -> Result<InsertOutcome, StoreError> {
        self.users.insert(user)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.users.find(|_| true)
    }

    async fn delete(&self, id: &DocumentId) -> Result<DeleteOutcome, StoreError> {
        self.users.delete_where(|d| d.id.as_ref() == Some(id))
    }

    async fn set_role(&self, id: &DocumentId, role: Role) -> Result<UpdateOutcome, StoreError> {
        self.users.update_by_id(id, |user| {
            let changed = user.role.as_ref() != Some(&role);
            user.role = Some(role);
            changed
        })
    }
}

#[async_trait]
impl CartStore for InMemoryStore {
    async fn list(&self, email: Option<&str>) -> Result<Vec<CartItem>, StoreError> {
        self.carts.find(|c| email.is_none_or(|e| c.email == e))
    }

    async fn insert(&self, item: CartItem) -> Result<InsertOutcome, StoreError> {
        self.carts.insert(item)
    }

    async fn delete(&self, id: &DocumentId) -> Result<DeleteOutcome, StoreError> {
        self.carts.delete_where(|d| d.id.as_ref() == Some(id))
    }

    async fn delete_many(&self, ids: &[DocumentId]) -> Result<DeleteOutcome, StoreError> {
        self.carts
            .delete_where(|d| d.id.as_ref().is_some_and(|id| ids.contains(id)))
    }
}

#[async_trait]
impl ReviewStore for InMemoryStore {
    async fn list(&self, email: Option<&str>) -> Result<Vec<Review>, StoreError> {
        self.reviews
            .find(|r| email.is_none_or(|e| r.email.as_deref() == Some(e)))
    }

    async fn insert(&self, review: Review) -> Result<InsertOutcome, StoreError> {
        self.reviews.insert(review)
    }
}

#[async_trait]
impl PaymentStore for InMemoryStore {
    async fn insert(&self, payment: Payment) -> Result<InsertOutcome, StoreError> {
        self.payments.insert(payment)
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<Payment>, StoreError> {
        self.payments.find(|p| p.email == email)
    }
}

#[async_trait]
impl Analytics for InMemoryStore {
    async fn admin_summary(&self) -> Result<AdminStats, StoreError> {
        let payments = self.payments.read()?;
        Ok(AdminStats {
            users: self.users.len()?,
            menu_items: self.menu.len()?,
            orders: payments.len() as u64,
            revenue: total_revenue(&payments),
        })
    }

    async fn order_stats(&self) -> Result<Vec<CategoryStats>, StoreError> {
        let payments = self.payments.read()?;
        let menu = self.menu.read()?;
        Ok(category_breakdown(&payments, &menu))
    }
}
