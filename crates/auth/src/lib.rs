//! `bistro-auth`: token and authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: callers fetch
//! whatever documents a decision needs and hand them in.

pub mod authorize;
pub mod claims;
pub mod jwt;

pub use authorize::{AuthzError, Gate, Guard, require_admin, require_same_identity};
pub use claims::{TokenClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256Jwt, JwtValidator, TOKEN_TTL_SECS, TokenError, TokenIssuer};
