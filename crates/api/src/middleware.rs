use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use bistro_auth::{AuthzError, Gate, Guard, JwtValidator, TokenClaims, require_admin};
use bistro_infra::UserStore;

use crate::app::errors::ApiError;
use crate::context::Identity;

/// Everything a route gate needs to decide.
#[derive(Clone)]
pub struct GateState {
    pub jwt: Arc<dyn JwtValidator>,
    pub users: Arc<dyn UserStore>,
    pub gate: Gate,
}

impl GateState {
    pub fn with_gate(&self, gate: Gate) -> Self {
        Self {
            gate,
            ..self.clone()
        }
    }
}

/// Run the route's guards in order, stopping at the first denial.
pub async fn enforce(
    State(state): State<GateState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    for guard in state.gate.guards() {
        match guard {
            Guard::Token => {
                let claims = verify_token(state.jwt.as_ref(), req.headers())?;
                req.extensions_mut().insert(Identity::new(claims));
            }
            Guard::Admin => {
                let email = req
                    .extensions()
                    .get::<Identity>()
                    .map(|identity| identity.email().to_string())
                    .ok_or(AuthzError::Unauthenticated)?;

                let user = state.users.find_by_email(&email).await?;
                require_admin(user.as_ref()).inspect_err(|_| {
                    debug!(email = %email, path = %req.uri().path(), "admin gate denied");
                })?;
            }
        }
    }

    Ok(next.run(req).await)
}

fn verify_token(jwt: &dyn JwtValidator, headers: &HeaderMap) -> Result<TokenClaims, AuthzError> {
    let token = extract_bearer(headers)?;

    jwt.validate(token, Utc::now()).map_err(|e| {
        debug!(error = %e, "token rejected");
        AuthzError::Unauthenticated
    })
}

/// The token is whatever follows the first space of the header value.
fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthzError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthzError::Unauthenticated)?;

    let header = header.to_str().map_err(|_| AuthzError::Unauthenticated)?;

    let token = header
        .split(' ')
        .nth(1)
        .filter(|token| !token.is_empty())
        .ok_or(AuthzError::Unauthenticated)?;

    Ok(token)
}
