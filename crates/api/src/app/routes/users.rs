use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
};
use tracing::info;

use bistro_core::{DeleteOutcome, Role, UpdateOutcome, User};

use crate::app::dto::{self, AdminCheckResponse, CreateUserResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz::authorize_self;
use crate::context::Identity;

/// Register a user unless the email is already known.
///
/// Roles are never taken from the request body; promotion goes through
/// [`make_admin`].
pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Json(mut user): Json<User>,
) -> Result<Json<CreateUserResponse>, ApiError> {
    if services.stores.users.find_by_email(&user.email).await?.is_some() {
        return Ok(Json(CreateUserResponse::exists()));
    }

    user.role = None;
    let outcome = services.stores.users.insert(user).await?;
    Ok(Json(CreateUserResponse::Created(outcome)))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(services.stores.users.list().await?))
}

/// Whether the caller (and only the caller) holds the admin role.
pub async fn check_admin(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<Identity>,
    Path(email): Path<String>,
) -> Result<Json<AdminCheckResponse>, ApiError> {
    authorize_self(&identity, Some(&email))?;

    let user = services.stores.users.find_by_email(&email).await?;
    Ok(Json(AdminCheckResponse {
        admin: user.is_some_and(|u| u.is_admin()),
    }))
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let id = dto::document_id(&id)?;
    Ok(Json(services.stores.users.delete(&id).await?))
}

pub async fn make_admin(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let id = dto::document_id(&id)?;
    let outcome = services.stores.users.set_role(&id, Role::ADMIN).await?;
    if outcome.modified_count > 0 {
        info!(user_id = %id, "user promoted to admin");
    }
    Ok(Json(outcome))
}
