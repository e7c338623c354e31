//! Entity trait: identity of a stored document.

use crate::DocumentId;

/// A document that lives in one of the store's collections.
///
/// Identifiers are assigned by the store on insert, so a freshly built document
/// has none.
pub trait Entity {
    /// Returns the document identifier, if it has been stored.
    fn id(&self) -> Option<&DocumentId>;

    /// Assign the identifier chosen by the store.
    fn set_id(&mut self, id: DocumentId);
}

macro_rules! impl_entity {
    ($t:ty) => {
        impl $crate::entity::Entity for $t {
            fn id(&self) -> Option<&$crate::DocumentId> {
                self.id.as_ref()
            }

            fn set_id(&mut self, id: $crate::DocumentId) {
                self.id = Some(id);
            }
        }
    };
}

pub(crate) use impl_entity;
