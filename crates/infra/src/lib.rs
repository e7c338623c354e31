//! Infrastructure layer: configuration, document stores, and external services.

pub mod checkout;
pub mod config;
pub mod external;
pub mod store;

pub use checkout::{PaymentReceipt, record_payment};
pub use config::{ConfigError, GatewaySettings, MongoSettings, Persistence, Settings};
pub use store::{
    Analytics, CartStore, InMemoryStore, MenuStore, MongoStore, PaymentStore, ReviewStore,
    StoreError, Stores, UserStore,
};
