//! Generation, regeneration and task-status handlers.
//!
//! All three translate directly to orchestrator operations; none of
//! them waits on a worker.

use axum::extract::{Extension, Path};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::tasks::{TaskState, TaskStatus};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub reference_keywords: String,
    #[serde(default)]
    pub reference_posts: Vec<String>,
    pub provider: String,
}

#[derive(Debug, Deserialize)]
pub struct RegeneratePostRequest {
    pub content_id: Uuid,
    pub provider: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub task_id: Uuid,
    pub status: TaskState,
    pub message: String,
}

/// Initiate the idea → post generation chain.
pub async fn generate_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let task_id = state
        .orchestrator
        .initiate_generation(
            &request.reference_keywords,
            request.reference_posts,
            &request.provider,
        )
        .await?;

    Ok(Json(GenerateResponse {
        task_id,
        status: TaskState::Pending,
        message: "Content generation started".to_string(),
    }))
}

/// Generate one more post variant for an existing content record.
pub async fn regenerate_post_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<RegeneratePostRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let task_id = state
        .orchestrator
        .initiate_post_regeneration(request.content_id, &request.provider)
        .await?;

    Ok(Json(GenerateResponse {
        task_id,
        status: TaskState::Pending,
        message: "Post regeneration started".to_string(),
    }))
}

/// Poll the status of a task.
pub async fn task_status_handler(
    Extension(state): Extension<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<TaskStatus>, ApiError> {
    let status = state.orchestrator.task_status(task_id).await?;
    Ok(Json(status))
}
