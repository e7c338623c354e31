use std::sync::Arc;

use axum::{Json, extract::Extension};

use bistro_core::{AdminStats, CategoryStats};

use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn admin_stats(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<AdminStats>, ApiError> {
    Ok(Json(services.stores.analytics.admin_summary().await?))
}

/// Units sold and revenue per menu category.
pub async fn order_stats(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<CategoryStats>>, ApiError> {
    Ok(Json(services.stores.analytics.order_stats().await?))
}
