//! Request/response bodies that are not plain documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use bistro_core::{DocumentId, InsertOutcome};

use crate::app::errors::ApiError;

/// Parse a path identifier, rejecting anything that is not a document id.
pub fn document_id(raw: &str) -> Result<DocumentId, ApiError> {
    Ok(raw.parse()?)
}

#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct AdminCheckResponse {
    pub admin: bool,
}

/// `POST /users` answers with either a fresh insert or a notice that the
/// email is already registered.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreateUserResponse {
    Created(InsertOutcome),
    Exists {
        message: &'static str,
        #[serde(rename = "insertedId")]
        inserted_id: Option<DocumentId>,
    },
}

impl CreateUserResponse {
    pub fn exists() -> Self {
        Self::Exists {
            message: "user already exists",
            inserted_id: None,
        }
    }
}

/// `price` is taken as sent: numbers and numeric strings are amounts, anything
/// else becomes NaN and is left for the gateway to judge.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentIntentRequest {
    #[serde(default)]
    pub price: Value,
}

impl PaymentIntentRequest {
    /// Price in major currency units, coerced like JavaScript's `Number()`.
    pub fn price(&self) -> f64 {
        match &self.price {
            Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    0.0
                } else {
                    s.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .unwrap_or(f64::NAN)
                }
            }
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Null | Value::Array(_) | Value::Object(_) => f64::NAN,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}
