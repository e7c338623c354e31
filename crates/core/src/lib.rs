//! `bistro-core`: documents and pure domain rules of the ordering backend.
//!
//! This crate contains **pure domain** types (no storage or transport concerns).

pub mod cart;
pub mod entity;
pub mod error;
pub mod id;
pub mod menu;
pub mod outcome;
pub mod payment;
pub mod review;
pub mod role;
pub mod stats;
pub mod user;

pub use cart::CartItem;
pub use entity::Entity;
pub use error::DomainError;
pub use id::DocumentId;
pub use menu::{MenuItem, MenuItemUpdate};
pub use outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
pub use payment::{Payment, to_minor_units};
pub use review::Review;
pub use role::Role;
pub use stats::{AdminStats, CategoryStats};
pub use user::User;

/// Free-form document fields carried through untouched.
pub type Extra = serde_json::Map<String, serde_json::Value>;
