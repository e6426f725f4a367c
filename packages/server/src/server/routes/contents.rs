//! Content record CRUD handlers.

use axum::extract::{Extension, Path, Query};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::store::{ContentPatch, ContentRecord};

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: Uuid,
}

/// Paginated scan, most recently created first.
pub async fn list_contents_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ContentRecord>>, ApiError> {
    let records = state.store.list(query.skip, query.limit).await?;
    Ok(Json(records))
}

/// Point-read a single record.
pub async fn get_content_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContentRecord>, ApiError> {
    let record = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("content not found: {}", id)))?;
    Ok(Json(record))
}

/// Shallow merge-update; returns the updated record.
pub async fn update_content_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ContentPatch>,
) -> Result<Json<ContentRecord>, ApiError> {
    if !state.store.merge_update(id, patch).await? {
        return Err(ApiError::not_found(format!("content not found: {}", id)));
    }

    let record = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("content not found: {}", id)))?;
    Ok(Json(record))
}

/// Delete a record.
pub async fn delete_content_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !state.store.delete(id).await? {
        return Err(ApiError::not_found(format!("content not found: {}", id)));
    }

    Ok(Json(DeleteResponse { deleted: true, id }))
}
