use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query},
};

use bistro_core::{CartItem, DeleteOutcome, InsertOutcome};

use crate::app::dto::{self, EmailQuery};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn list_carts(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<CartItem>>, ApiError> {
    Ok(Json(services.stores.carts.list(query.email.as_deref()).await?))
}

pub async fn add_to_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Json(item): Json<CartItem>,
) -> Result<Json<InsertOutcome>, ApiError> {
    Ok(Json(services.stores.carts.insert(item).await?))
}

// TODO: check the entry belongs to the caller once carts routes carry a token gate.
pub async fn remove_from_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let id = dto::document_id(&id)?;
    Ok(Json(services.stores.carts.delete(&id).await?))
}
