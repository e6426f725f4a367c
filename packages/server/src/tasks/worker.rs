//! Task worker: pulls queued tasks and runs them to a terminal state.
//!
//! Every task-body error is caught here at the task boundary and
//! recorded as a structured failed result on the handle, so status
//! queries always get a diagnosable message instead of an opaque crash.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::queue::{Progress, QueuedTask, TaskQueue, TaskReceiver};
use super::task::{TaskKind, TaskPayload, TaskResult};
use crate::error::TaskError;

/// Configuration for the task worker.
#[derive(Debug, Clone)]
pub struct TaskWorkerConfig {
    /// Maximum number of tasks executing at once
    pub max_concurrency: usize,
    /// Worker ID for this instance
    pub worker_id: String,
}

impl Default for TaskWorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            worker_id: format!("worker-{}", Uuid::new_v4()),
        }
    }
}

/// Handler trait for executing task bodies.
///
/// Separated from the worker so the dispatch loop can be tested with a
/// trivial executor and the real executor tested without a loop.
#[async_trait::async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Run one task body to completion.
    async fn execute(&self, task: TaskKind, progress: &Progress) -> Result<TaskPayload, TaskError>;
}

/// Long-running service that drains the task queue.
pub struct TaskWorker {
    queue: TaskQueue,
    receiver: TaskReceiver,
    executor: Arc<dyn TaskExecutor>,
    config: TaskWorkerConfig,
}

impl TaskWorker {
    /// Create a worker with default configuration.
    pub fn new(queue: TaskQueue, receiver: TaskReceiver, executor: Arc<dyn TaskExecutor>) -> Self {
        Self {
            queue,
            receiver,
            executor,
            config: TaskWorkerConfig::default(),
        }
    }

    /// Create with custom configuration.
    pub fn with_config(
        queue: TaskQueue,
        receiver: TaskReceiver,
        executor: Arc<dyn TaskExecutor>,
        config: TaskWorkerConfig,
    ) -> Self {
        Self {
            queue,
            receiver,
            executor,
            config,
        }
    }

    /// Run until the queue closes or the token fires.
    ///
    /// Tasks already dequeued run to completion; shutdown does not
    /// cancel them (there is no cancellation primitive for tasks).
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(
            worker_id = %self.config.worker_id,
            max_concurrency = self.config.max_concurrency,
            "task worker starting"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));

        loop {
            let task = tokio::select! {
                _ = shutdown.cancelled() => break,
                next = self.receiver.recv() => match next {
                    Some(task) => task,
                    None => break,
                },
            };

            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };

            let queue = self.queue.clone();
            let executor = self.executor.clone();
            tokio::spawn(async move {
                process_task(queue, executor, task).await;
                drop(permit);
            });
        }

        info!(worker_id = %self.config.worker_id, "task worker stopped");
    }
}

/// Execute one task and record its terminal result.
async fn process_task(queue: TaskQueue, executor: Arc<dyn TaskExecutor>, task: QueuedTask) {
    let task_id = task.task_id;
    let label = task.kind.label();

    queue.mark_in_progress(task_id, None).await;

    let progress = Progress::new(queue.clone(), task_id);
    let result = match executor.execute(task.kind, &progress).await {
        Ok(payload) => {
            debug!(%task_id, task_type = label, content_id = %payload.content_id, "task succeeded");
            TaskResult::Success(payload)
        }
        Err(e) => {
            warn!(%task_id, task_type = label, error = %e, "task failed");
            TaskResult::Error {
                error: e.to_string(),
            }
        }
    };

    queue.complete(task_id, result).await;
}
