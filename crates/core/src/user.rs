//! User accounts.

use serde::{Deserialize, Serialize};

use crate::entity::impl_entity;
use crate::{DocumentId, Extra, Role};

/// A signed-in customer or staff member, keyed by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Remaining profile fields, stored as sent.
    #[serde(flatten)]
    pub profile: Extra,
}

impl_entity!(User);

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
            role: None,
            name: None,
            profile: Extra::new(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_ref() == Some(&Role::ADMIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_admin_tag_is_admin() {
        let mut user = User::new("a@example.com");
        assert!(!user.is_admin());

        user.role = Some(Role::new("Admin"));
        assert!(!user.is_admin());

        user.role = Some(Role::ADMIN);
        assert!(user.is_admin());
    }

    #[test]
    fn profile_fields_round_trip() {
        let user: User = serde_json::from_value(serde_json::json!({
            "email": "a@example.com",
            "name": "Ada",
            "photoURL": "https://img.example/ada.png"
        }))
        .unwrap();

        assert_eq!(user.name.as_deref(), Some("Ada"));
        assert_eq!(user.profile["photoURL"], "https://img.example/ada.png");

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["photoURL"], "https://img.example/ada.png");
        assert!(back.get("role").is_none());
    }
}
