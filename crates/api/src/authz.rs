//! Handler-side authorization checks.
//!
//! Route gates run in middleware; checks that depend on request data (such as
//! the email a caller asks about) run here, before any store access.

use bistro_auth::{AuthzError, require_same_identity};
use tracing::debug;

use crate::context::Identity;

/// Self-only access: callers may only read records under their own email.
pub fn authorize_self(identity: &Identity, requested: Option<&str>) -> Result<(), AuthzError> {
    require_same_identity(identity.email(), requested).inspect_err(|_| {
        debug!(
            caller = identity.email(),
            requested = requested.unwrap_or_default(),
            "self-only check denied"
        );
    })
}
