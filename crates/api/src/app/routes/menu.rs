use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
};

use bistro_core::{DeleteOutcome, InsertOutcome, MenuItem, MenuItemUpdate, UpdateOutcome};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn list_menu(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    Ok(Json(services.stores.menu.list().await?))
}

/// Absent items come back as `null`, not 404.
pub async fn get_menu_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Option<MenuItem>>, ApiError> {
    let id = dto::document_id(&id)?;
    Ok(Json(services.stores.menu.get(&id).await?))
}

pub async fn create_menu_item(
    Extension(services): Extension<Arc<AppServices>>,
    Json(item): Json<MenuItem>,
) -> Result<Json<InsertOutcome>, ApiError> {
    Ok(Json(services.stores.menu.insert(item).await?))
}

pub async fn update_menu_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(update): Json<MenuItemUpdate>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let id = dto::document_id(&id)?;
    Ok(Json(services.stores.menu.update(&id, &update).await?))
}

pub async fn delete_menu_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let id = dto::document_id(&id)?;
    Ok(Json(services.stores.menu.delete(&id).await?))
}
