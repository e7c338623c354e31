//! Authorization decisions for gated routes.
//!
//! - No IO
//! - No panics
//! - Callers load the user document; this module only decides.

use thiserror::Error;

use bistro_core::User;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthzError {
    /// No usable identity: header missing or token rejected.
    #[error("forbidden access")]
    Unauthenticated,

    /// Identity is fine but the user record lacks the admin role.
    #[error("forbidden access")]
    NotAdmin,

    /// Identity does not match the resource it asks for.
    #[error("unauthorized access")]
    IdentityMismatch,
}

/// One check in a route's gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Bearer token must verify; establishes the caller's identity.
    Token,
    /// Caller's user record must carry the admin role. Needs `Token` first.
    Admin,
}

/// Ordered guards applied to a route, evaluated first to last with
/// short-circuit on the first denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate(&'static [Guard]);

impl Gate {
    pub const TOKEN: Gate = Gate(&[Guard::Token]);
    pub const ADMIN: Gate = Gate(&[Guard::Token, Guard::Admin]);

    pub fn guards(&self) -> &'static [Guard] {
        self.0
    }
}

/// Admin gate decision for the user record found under the token's email.
pub fn require_admin(user: Option<&User>) -> Result<(), AuthzError> {
    match user {
        Some(user) if user.is_admin() => Ok(()),
        _ => Err(AuthzError::NotAdmin),
    }
}

/// Self-only check: the requested email must be the token's own.
///
/// A missing request email never matches.
pub fn require_same_identity(token_email: &str, requested: Option<&str>) -> Result<(), AuthzError> {
    if requested == Some(token_email) {
        Ok(())
    } else {
        Err(AuthzError::IdentityMismatch)
    }
}
