use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use bistro_auth::{AuthzError, TokenError};
use bistro_core::DomainError;
use bistro_infra::StoreError;
use bistro_infra::external::GatewayError;

/// Everything a handler or gate can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("forbidden access")]
    Unauthenticated,

    #[error("forbidden access")]
    Forbidden,

    #[error("unauthorized access")]
    IdentityMismatch,

    #[error("{0}")]
    InvalidId(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Unauthenticated => Self::Unauthenticated,
            AuthzError::NotAdmin => Self::Forbidden,
            AuthzError::IdentityMismatch => Self::IdentityMismatch,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidId(msg) => Self::InvalidId(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => {
                json_error(StatusCode::UNAUTHORIZED, "unauthorized", self.to_string())
            }
            Self::Forbidden | Self::IdentityMismatch => {
                json_error(StatusCode::FORBIDDEN, "forbidden", self.to_string())
            }
            Self::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
            Self::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
            Self::Store(_) | Self::Gateway(_) | Self::Token(_) => {
                error!(error = %self, "request failed");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal Server Error",
                )
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
