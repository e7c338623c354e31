use std::sync::Arc;

use axum::{Json, extract::Extension};
use chrono::Utc;

use bistro_core::Extra;

use crate::app::dto::TokenResponse;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

/// Sign whatever identity object the client posts; it must carry an email.
pub async fn issue_token(
    Extension(services): Extension<Arc<AppServices>>,
    Json(mut identity): Json<Extra>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = match identity.remove("email") {
        Some(serde_json::Value::String(email)) if !email.is_empty() => email,
        _ => return Err(ApiError::Validation("email is required".to_string())),
    };

    let token = services.tokens.issue(&email, identity, Utc::now())?;
    Ok(Json(TokenResponse { token }))
}
