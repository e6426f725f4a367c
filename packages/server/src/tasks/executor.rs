//! Task bodies: idea generation and post generation.
//!
//! Provider selection goes through the registry's capability table; the
//! same post-task body serves both the automatic idea → post chain and
//! the explicit regeneration entry point.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::queue::{Progress, TaskQueue};
use super::task::{TaskKind, TaskPayload};
use super::worker::TaskExecutor;
use crate::error::TaskError;
use crate::prompt::{PromptContext, PromptRenderer};
use crate::scrape;
use crate::store::{ContentKind, ContentStore, NewContent};
use ai_client::{Generation, ProviderRegistry};

/// Executes generation tasks against the store and producers.
pub struct GenerationExecutor {
    store: Arc<dyn ContentStore>,
    providers: Arc<ProviderRegistry>,
    renderer: Arc<PromptRenderer>,
    queue: TaskQueue,
    http_client: reqwest::Client,
}

impl GenerationExecutor {
    pub fn new(
        store: Arc<dyn ContentStore>,
        providers: Arc<ProviderRegistry>,
        renderer: Arc<PromptRenderer>,
        queue: TaskQueue,
    ) -> Self {
        Self {
            store,
            providers,
            renderer,
            queue,
            http_client: scrape::scrape_client(),
        }
    }

    async fn call_provider(&self, provider: &str, prompt: &str) -> Result<Generation, TaskError> {
        let producer = self
            .providers
            .get(provider)
            .ok_or_else(|| TaskError::UnknownProvider(provider.to_string()))?;

        let generation = producer.generate(prompt).await?;

        if let Some(usage) = generation.usage {
            debug!(
                provider,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "provider token usage"
            );
        }

        Ok(generation)
    }

    /// Idea task: render, generate, persist, chain a post task.
    async fn run_idea(
        &self,
        keywords: String,
        reference_posts: Vec<String>,
        provider: String,
        progress: &Progress,
    ) -> Result<TaskPayload, TaskError> {
        progress.note("rendering idea prompt").await;

        let input_text = scrape::process_keywords(&self.http_client, &keywords).await;
        let prompt = self.renderer.render(
            "idea",
            &PromptContext {
                keywords: input_text.clone(),
                reference_posts: reference_posts.clone(),
                idea: None,
            },
        )?;

        progress.note("calling provider").await;
        let generation = self.call_provider(&provider, &prompt).await?;

        let record = self
            .store
            .create(NewContent {
                kind: ContentKind::Idea,
                provider: provider.clone(),
                input_text: input_text.clone(),
                reference_posts: reference_posts.clone(),
                idea: Some(generation.text.clone()),
                posts: vec![],
            })
            .await?;

        info!(content_id = %record.id, provider = %provider, "idea generated");

        // Chain the post task. The record create above has already
        // returned, so anyone who sees this task succeed is guaranteed
        // the post task is in the queue.
        self.queue
            .enqueue(TaskKind::GeneratePost {
                idea: generation.text.clone(),
                keywords: input_text,
                reference_posts,
                provider,
                content_id: Some(record.id),
            })
            .await
            .map_err(|e| TaskError::Chain(e.to_string()))?;

        Ok(TaskPayload {
            text: generation.text,
            content_id: record.id,
        })
    }

    /// Post task: render, generate, append (or create the record).
    async fn run_post(
        &self,
        idea: String,
        keywords: String,
        reference_posts: Vec<String>,
        provider: String,
        content_id: Option<Uuid>,
        progress: &Progress,
    ) -> Result<TaskPayload, TaskError> {
        progress.note("rendering post prompt").await;

        let prompt = self.renderer.render(
            "post",
            &PromptContext {
                keywords: keywords.clone(),
                reference_posts: reference_posts.clone(),
                idea: Some(idea.clone()),
            },
        )?;

        progress.note("calling provider").await;
        let generation = self.call_provider(&provider, &prompt).await?;

        let content_id = match content_id {
            Some(id) => {
                if self.store.append_post(id, &generation.text).await? {
                    id
                } else {
                    // Target record vanished between enqueue and now;
                    // recreate it rather than dropping the work.
                    warn!(content_id = %id, "target record missing, recreating");
                    let record = self
                        .store
                        .create(NewContent {
                            kind: ContentKind::Post,
                            provider: provider.clone(),
                            input_text: keywords,
                            reference_posts,
                            idea: Some(idea),
                            posts: vec![generation.text.clone()],
                        })
                        .await?;
                    record.id
                }
            }
            None => {
                let record = self
                    .store
                    .create(NewContent {
                        kind: ContentKind::Post,
                        provider: provider.clone(),
                        input_text: keywords,
                        reference_posts,
                        idea: Some(idea),
                        posts: vec![generation.text.clone()],
                    })
                    .await?;
                record.id
            }
        };

        info!(%content_id, provider = %provider, "post generated");

        Ok(TaskPayload {
            text: generation.text,
            content_id,
        })
    }
}

#[async_trait::async_trait]
impl TaskExecutor for GenerationExecutor {
    async fn execute(&self, task: TaskKind, progress: &Progress) -> Result<TaskPayload, TaskError> {
        match task {
            TaskKind::GenerateIdea {
                keywords,
                reference_posts,
                provider,
            } => {
                self.run_idea(keywords, reference_posts, provider, progress)
                    .await
            }
            TaskKind::GeneratePost {
                idea,
                keywords,
                reference_posts,
                provider,
                content_id,
            } => {
                self.run_post(idea, keywords, reference_posts, provider, content_id, progress)
                    .await
            }
        }
    }
}
