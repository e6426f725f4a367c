//! Task model: kinds, states, results.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One unit of asynchronous work.
///
/// Both variants carry everything the executor needs; nothing is read
/// back from the API layer once a task is queued.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskKind {
    /// Generate a post idea from keywords.
    GenerateIdea {
        keywords: String,
        reference_posts: Vec<String>,
        provider: String,
    },

    /// Generate a post body from an idea.
    ///
    /// `content_id` targets an existing record to append to; when
    /// absent a fresh record is created. Shared by the automatic
    /// idea → post chain and the explicit regeneration entry point.
    GeneratePost {
        idea: String,
        keywords: String,
        reference_posts: Vec<String>,
        provider: String,
        content_id: Option<Uuid>,
    },
}

impl TaskKind {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::GenerateIdea { .. } => "generate_idea",
            TaskKind::GeneratePost { .. } => "generate_post",
        }
    }

    /// The provider this task is bound to.
    pub fn provider(&self) -> &str {
        match self {
            TaskKind::GenerateIdea { provider, .. } => provider,
            TaskKind::GeneratePost { provider, .. } => provider,
        }
    }
}

/// Lifecycle state of a task.
///
/// `Succeeded` and `Failed` are terminal; nothing transitions out of
/// them. There is no cancelled state: once enqueued, a task runs to
/// completion or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Pending,
    InProgress,
    Succeeded,
    Failed,
}

impl TaskState {
    /// True for `Succeeded` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Succeeded | TaskState::Failed)
    }
}

/// Payload carried by a successful task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPayload {
    /// The generated text (idea or post body).
    pub text: String,

    /// The content record the text was persisted to.
    pub content_id: Uuid,
}

/// Terminal result stored on a task handle.
///
/// Serializes with a `status` discriminator ("success" / "error") so a
/// result is self-describing even outside the handle that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskResult {
    Success(TaskPayload),
    Error { error: String },
}

impl TaskResult {
    /// True when the result carries an error, regardless of how the
    /// backend classified the task.
    pub fn is_error(&self) -> bool {
        matches!(self, TaskResult::Error { .. })
    }
}

/// Point-in-time view of a task handle.
#[derive(Debug, Clone)]
pub struct TaskSnapshot {
    pub task_id: Uuid,
    pub state: TaskState,
    pub progress_note: Option<String>,
    pub result: Option<TaskResult>,
}
