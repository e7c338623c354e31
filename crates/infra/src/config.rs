//! Configuration loading and representation.
//!
//! Everything comes from environment variables (optionally seeded from a
//! `.env` file). Parsing goes through a lookup function so it can be exercised
//! without touching the process environment.

use core::fmt::Display;
use core::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{info, warn};

use bistro_observability::LogFormat;

const DEFAULT_PORT: &str = "5000";
const DEFAULT_DB_NAME: &str = "bistro-boss";
const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Process configuration, parsed once at startup.
#[derive(Debug)]
pub struct Settings {
    pub port: u16,
    pub jwt_secret: SecretString,
    pub log_format: LogFormat,
    pub gateway: GatewaySettings,
    pub persistence: Persistence,
}

#[derive(Debug)]
pub struct GatewaySettings {
    /// Unset means payment-intent calls fail at request time.
    pub stripe_secret_key: Option<SecretString>,
    pub api_base: String,
}

/// Which store backs the collections.
#[derive(Debug)]
pub enum Persistence {
    InMemory,
    Mongo(MongoSettings),
}

#[derive(Debug)]
pub struct MongoSettings {
    pub uri: SecretString,
    pub database: String,
}

impl Settings {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Log the effective setup. Call once logging is installed.
    pub fn report(&self) {
        match &self.persistence {
            Persistence::InMemory => info!(port = self.port, "using in-memory stores"),
            Persistence::Mongo(mongo) => {
                info!(port = self.port, database = %mongo.database, "using MongoDB stores")
            }
        }
        if self.jwt_secret.expose_secret() == DEV_JWT_SECRET {
            warn!("JWT_SECRET not set; using insecure dev default");
        }
        if self.gateway.stripe_secret_key.is_none() {
            warn!("STRIPE_SECRET_KEY not set; payment intents will fail");
        }
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let log_format = parse_or(&lookup, "LOG_FORMAT", "json")?;

        let jwt_secret =
            non_empty(&lookup, "JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string());

        let gateway = GatewaySettings {
            stripe_secret_key: non_empty(&lookup, "STRIPE_SECRET_KEY").map(SecretString::from),
            api_base: non_empty(&lookup, "STRIPE_API_BASE")
                .unwrap_or_else(|| DEFAULT_STRIPE_API_BASE.to_string()),
        };

        let use_persistent: bool = parse_or(&lookup, "USE_PERSISTENT_STORES", "false")?;

        let persistence = if use_persistent {
            Persistence::Mongo(MongoSettings {
                uri: SecretString::from(mongo_uri(&lookup)?),
                database: non_empty(&lookup, "DB_NAME")
                    .unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            })
        } else {
            Persistence::InMemory
        };

        Ok(Self {
            port,
            jwt_secret: SecretString::from(jwt_secret),
            log_format,
            gateway,
            persistence,
        })
    }
}

/// `MONGODB_URI` wins; otherwise an Atlas-style URI is composed from parts.
fn mongo_uri<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(uri) = non_empty(lookup, "MONGODB_URI") {
        return Ok(uri);
    }

    let user = non_empty(lookup, "DB_USER").ok_or(ConfigError::Missing("MONGODB_URI or DB_USER"))?;
    let pass = non_empty(lookup, "DB_PASS").ok_or(ConfigError::Missing("DB_PASS"))?;
    let host = non_empty(lookup, "DB_HOST").ok_or(ConfigError::Missing("DB_HOST"))?;

    Ok(format!(
        "mongodb+srv://{user}:{pass}@{host}/?retryWrites=true&w=majority"
    ))
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = non_empty(lookup, key).unwrap_or_else(|| default.to_string());
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        message: e.to_string(),
    })
}
