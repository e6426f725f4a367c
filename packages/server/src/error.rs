//! Typed errors for the orchestration core.
//!
//! Two layers, matching where an error can surface:
//! - [`OrchestrateError`] — synchronous request-time failures. These are
//!   returned to the caller immediately; no task is ever enqueued for
//!   them.
//! - [`TaskError`] — asynchronous task-body failures. These are caught
//!   at the task boundary and recorded as a structured failed result on
//!   the task handle, never propagated as an unhandled crash.

use thiserror::Error;
use uuid::Uuid;

use crate::prompt::RenderError;
use crate::store::StoreError;
use ai_client::ProducerError;

/// Failures surfaced synchronously by orchestrator operations.
#[derive(Debug, Error)]
pub enum OrchestrateError {
    /// Keywords were empty after trimming
    #[error("reference_keywords cannot be empty")]
    EmptyInput,

    /// Provider name is not on the allow-list
    #[error("unknown provider: {0}")]
    InvalidProvider(String),

    /// Content record does not exist
    #[error("content not found: {0}")]
    ContentNotFound(Uuid),

    /// Task handle does not exist in the execution backend
    #[error("task not found: {0}")]
    TaskNotFound(Uuid),

    /// Regeneration requested for a record with no idea to ground it
    #[error("content {0} has no idea; generate one before regenerating posts")]
    MissingIdea(Uuid),

    /// The task queue is no longer accepting work (shutdown)
    #[error("task queue is closed")]
    QueueClosed,

    /// Storage failure during a synchronous lookup
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures inside an asynchronous task body.
///
/// All variants are terminal for the task that hit them; there are no
/// automatic retries.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Prompt template missing or failed to render
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// The producer call failed or timed out
    #[error("provider error: {0}")]
    Provider(#[from] ProducerError),

    /// Persistence failure
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Provider disappeared from the registry between validation and
    /// execution (wiring bug)
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// Chained task could not be handed to the queue
    #[error("failed to enqueue chained task: {0}")]
    Chain(String),
}
