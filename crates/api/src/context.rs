use bistro_auth::TokenClaims;

/// Verified caller identity, attached to the request by the token guard.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    claims: TokenClaims,
}

impl Identity {
    pub fn new(claims: TokenClaims) -> Self {
        Self { claims }
    }

    pub fn email(&self) -> &str {
        &self.claims.email
    }
}
