//! In-process execution backend: task queue plus handle map.
//!
//! `TaskQueue::enqueue` is the single chokepoint through which every
//! task enters the system — the public API and internal idea → post
//! chaining both go through it, so the two call paths stay symmetric.
//!
//! Task handles live only here, in the backend's own map; they are
//! never duplicated into the content store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use super::task::{TaskKind, TaskResult, TaskSnapshot, TaskState};
use crate::error::OrchestrateError;

/// A task handed to the worker.
#[derive(Debug)]
pub struct QueuedTask {
    pub task_id: Uuid,
    pub kind: TaskKind,
}

/// Receiving side of the queue, consumed by the worker.
pub type TaskReceiver = mpsc::UnboundedReceiver<QueuedTask>;

/// The enqueue/status side of the execution backend.
#[derive(Clone)]
pub struct TaskQueue {
    sender: mpsc::UnboundedSender<QueuedTask>,
    handles: Arc<RwLock<HashMap<Uuid, TaskSnapshot>>>,
}

impl TaskQueue {
    /// Create a queue and its paired receiver.
    pub fn new() -> (Self, TaskReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let queue = Self {
            sender,
            handles: Arc::new(RwLock::new(HashMap::new())),
        };
        (queue, receiver)
    }

    /// Enqueue a task and return its handle id immediately.
    ///
    /// The handle is registered before the task is sent, so a status
    /// query for an accepted task can never miss it.
    pub async fn enqueue(&self, kind: TaskKind) -> Result<Uuid, OrchestrateError> {
        let task_id = Uuid::new_v4();

        self.handles.write().await.insert(
            task_id,
            TaskSnapshot {
                task_id,
                state: TaskState::Pending,
                progress_note: None,
                result: None,
            },
        );

        if self
            .sender
            .send(QueuedTask {
                task_id,
                kind: kind.clone(),
            })
            .is_err()
        {
            // Worker gone: retract the handle, nothing will run it.
            self.handles.write().await.remove(&task_id);
            warn!(task_type = kind.label(), "task queue closed, rejecting enqueue");
            return Err(OrchestrateError::QueueClosed);
        }

        debug!(%task_id, task_type = kind.label(), provider = kind.provider(), "task enqueued");
        Ok(task_id)
    }

    /// Read the current state of a task handle.
    pub async fn snapshot(&self, task_id: Uuid) -> Option<TaskSnapshot> {
        self.handles.read().await.get(&task_id).cloned()
    }

    /// Number of live task handles.
    pub async fn handle_count(&self) -> usize {
        self.handles.read().await.len()
    }

    /// Transition a task to in-progress, optionally updating the
    /// advisory progress note. Terminal states are never left.
    pub(crate) async fn mark_in_progress(&self, task_id: Uuid, note: Option<&str>) {
        let mut handles = self.handles.write().await;
        let Some(handle) = handles.get_mut(&task_id) else {
            return;
        };
        if handle.state.is_terminal() {
            return;
        }

        handle.state = TaskState::InProgress;
        if let Some(note) = note {
            handle.progress_note = Some(note.to_string());
        }
    }

    /// Record a terminal result. The state follows the result: an
    /// error-tagged result lands the task in `Failed`, anything else in
    /// `Succeeded`. A task already terminal is left untouched.
    pub(crate) async fn complete(&self, task_id: Uuid, result: TaskResult) {
        let mut handles = self.handles.write().await;
        let Some(handle) = handles.get_mut(&task_id) else {
            return;
        };
        if handle.state.is_terminal() {
            warn!(%task_id, "ignoring completion for already-terminal task");
            return;
        }

        handle.state = if result.is_error() {
            TaskState::Failed
        } else {
            TaskState::Succeeded
        };
        handle.result = Some(result);
    }
}

/// Progress reporting handle given to task bodies.
///
/// Notes are advisory: they update the handle's `progress_note` and
/// nothing else.
#[derive(Clone)]
pub struct Progress {
    queue: TaskQueue,
    task_id: Uuid,
}

impl Progress {
    pub(crate) fn new(queue: TaskQueue, task_id: Uuid) -> Self {
        Self { queue, task_id }
    }

    /// Report the current step.
    pub async fn note(&self, message: &str) {
        self.queue.mark_in_progress(self.task_id, Some(message)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::task::TaskPayload;

    fn idea_task() -> TaskKind {
        TaskKind::GenerateIdea {
            keywords: "rockets".into(),
            reference_posts: vec![],
            provider: "gemini".into(),
        }
    }

    #[tokio::test]
    async fn test_enqueue_registers_pending_handle() {
        let (queue, mut receiver) = TaskQueue::new();

        let task_id = queue.enqueue(idea_task()).await.unwrap();

        let snapshot = queue.snapshot(task_id).await.unwrap();
        assert_eq!(snapshot.state, TaskState::Pending);
        assert!(snapshot.result.is_none());

        let queued = receiver.recv().await.unwrap();
        assert_eq!(queued.task_id, task_id);
    }

    #[tokio::test]
    async fn test_enqueue_fails_when_receiver_dropped() {
        let (queue, receiver) = TaskQueue::new();
        drop(receiver);

        let err = queue.enqueue(idea_task()).await.unwrap_err();
        assert!(matches!(err, OrchestrateError::QueueClosed));
        // No orphan handle is left behind.
        assert_eq!(queue.handle_count().await, 0);
    }

    #[tokio::test]
    async fn test_progress_updates_note() {
        let (queue, _receiver) = TaskQueue::new();
        let task_id = queue.enqueue(idea_task()).await.unwrap();

        let progress = Progress::new(queue.clone(), task_id);
        progress.note("rendering idea prompt").await;

        let snapshot = queue.snapshot(task_id).await.unwrap();
        assert_eq!(snapshot.state, TaskState::InProgress);
        assert_eq!(
            snapshot.progress_note.as_deref(),
            Some("rendering idea prompt")
        );
    }

    #[tokio::test]
    async fn test_terminal_states_never_transition() {
        let (queue, _receiver) = TaskQueue::new();
        let task_id = queue.enqueue(idea_task()).await.unwrap();

        queue
            .complete(
                task_id,
                TaskResult::Success(TaskPayload {
                    text: "idea".into(),
                    content_id: Uuid::new_v4(),
                }),
            )
            .await;

        // A late failure report must not overwrite the terminal state.
        queue
            .complete(
                task_id,
                TaskResult::Error {
                    error: "late".into(),
                },
            )
            .await;
        queue.mark_in_progress(task_id, Some("late note")).await;

        let snapshot = queue.snapshot(task_id).await.unwrap();
        assert_eq!(snapshot.state, TaskState::Succeeded);
        assert!(snapshot.progress_note.is_none());
        assert!(!snapshot.result.unwrap().is_error());
    }

    #[tokio::test]
    async fn test_error_result_lands_in_failed() {
        let (queue, _receiver) = TaskQueue::new();
        let task_id = queue.enqueue(idea_task()).await.unwrap();

        queue
            .complete(
                task_id,
                TaskResult::Error {
                    error: "provider exploded".into(),
                },
            )
            .await;

        let snapshot = queue.snapshot(task_id).await.unwrap();
        assert_eq!(snapshot.state, TaskState::Failed);
    }
}
