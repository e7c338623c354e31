use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
};

use bistro_core::{InsertOutcome, Review};

use crate::app::dto::EmailQuery;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn list_reviews(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(services.stores.reviews.list(query.email.as_deref()).await?))
}

pub async fn create_review(
    Extension(services): Extension<Arc<AppServices>>,
    Json(review): Json<Review>,
) -> Result<Json<InsertOutcome>, ApiError> {
    Ok(Json(services.stores.reviews.insert(review).await?))
}
