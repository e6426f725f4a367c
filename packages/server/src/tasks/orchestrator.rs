//! Orchestrator operations: initiate generation, regenerate, query status.
//!
//! Validation happens here, synchronously, before anything is enqueued;
//! a request that fails validation never produces a task.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::queue::TaskQueue;
use super::task::{TaskKind, TaskPayload, TaskResult, TaskSnapshot, TaskState};
use crate::error::OrchestrateError;
use crate::store::ContentStore;
use ai_client::ProviderRegistry;

/// Externally reported task status.
///
/// `status` uses the pending / in_progress / succeeded / failed
/// vocabulary; exactly one of `result` and `error` is present once the
/// task is terminal.
#[derive(Debug, Clone, Serialize)]
pub struct TaskStatus {
    pub task_id: Uuid,
    pub status: TaskState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<TaskPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskStatus {
    /// Normalize a backend snapshot into the reported vocabulary.
    ///
    /// A terminal-success whose result is error-tagged is reported as
    /// `failed` with the embedded error: a failure inside the task body
    /// and a backend-level failure look identical from outside.
    fn from_snapshot(snapshot: TaskSnapshot) -> Self {
        let TaskSnapshot {
            task_id,
            state,
            progress_note,
            result,
        } = snapshot;

        match (state, result) {
            (TaskState::Succeeded, Some(TaskResult::Success(payload))) => Self {
                task_id,
                status: TaskState::Succeeded,
                progress_note: None,
                result: Some(payload),
                error: None,
            },
            (TaskState::Succeeded | TaskState::Failed, Some(TaskResult::Error { error })) => Self {
                task_id,
                status: TaskState::Failed,
                progress_note: None,
                result: None,
                error: Some(error),
            },
            (TaskState::Failed, _) => Self {
                task_id,
                status: TaskState::Failed,
                progress_note: None,
                result: None,
                error: Some("task failed without a recorded error".to_string()),
            },
            (state, _) => Self {
                task_id,
                status: state,
                progress_note,
                result: None,
                error: None,
            },
        }
    }
}

/// Accepts generation requests and answers status queries.
///
/// Owns neither content records nor task handles; it creates and reads
/// them through the store and the queue it was constructed with.
pub struct Orchestrator {
    queue: TaskQueue,
    store: Arc<dyn ContentStore>,
    providers: Arc<ProviderRegistry>,
}

impl Orchestrator {
    pub fn new(
        queue: TaskQueue,
        store: Arc<dyn ContentStore>,
        providers: Arc<ProviderRegistry>,
    ) -> Self {
        Self {
            queue,
            store,
            providers,
        }
    }

    /// Start the idea → post generation chain.
    ///
    /// Returns the idea task's id immediately; never waits for the task
    /// to run.
    pub async fn initiate_generation(
        &self,
        keywords: &str,
        reference_posts: Vec<String>,
        provider: &str,
    ) -> Result<Uuid, OrchestrateError> {
        if keywords.trim().is_empty() {
            return Err(OrchestrateError::EmptyInput);
        }
        if !self.providers.contains(provider) {
            return Err(OrchestrateError::InvalidProvider(provider.to_string()));
        }

        let task_id = self
            .queue
            .enqueue(TaskKind::GenerateIdea {
                keywords: keywords.to_string(),
                reference_posts,
                provider: provider.to_string(),
            })
            .await?;

        info!(%task_id, provider, "generation initiated");
        Ok(task_id)
    }

    /// Generate one more post variant for an existing record.
    pub async fn initiate_post_regeneration(
        &self,
        content_id: Uuid,
        provider: &str,
    ) -> Result<Uuid, OrchestrateError> {
        let record = self
            .store
            .get(content_id)
            .await?
            .ok_or(OrchestrateError::ContentNotFound(content_id))?;

        let idea = record
            .idea
            .filter(|idea| !idea.trim().is_empty())
            .ok_or(OrchestrateError::MissingIdea(content_id))?;

        if !self.providers.contains(provider) {
            return Err(OrchestrateError::InvalidProvider(provider.to_string()));
        }

        let task_id = self
            .queue
            .enqueue(TaskKind::GeneratePost {
                idea,
                keywords: record.input_text,
                reference_posts: record.reference_posts,
                provider: provider.to_string(),
                content_id: Some(content_id),
            })
            .await?;

        info!(%task_id, %content_id, provider, "post regeneration initiated");
        Ok(task_id)
    }

    /// Report the current status of a task.
    pub async fn task_status(&self, task_id: Uuid) -> Result<TaskStatus, OrchestrateError> {
        let snapshot = self
            .queue
            .snapshot(task_id)
            .await
            .ok_or(OrchestrateError::TaskNotFound(task_id))?;

        Ok(TaskStatus::from_snapshot(snapshot))
    }
}
