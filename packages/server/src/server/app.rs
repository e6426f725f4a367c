//! Application setup and router construction.

use std::sync::Arc;

use axum::extract::Extension;
use axum::http::{header::CONTENT_TYPE, Method};
use axum::routing::{get, post};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::Config;
use crate::prompt::PromptRenderer;
use crate::server::routes::{
    delete_content_handler, generate_handler, get_content_handler, health_handler,
    list_contents_handler, regenerate_post_handler, task_status_handler, update_content_handler,
};
use crate::store::ContentStore;
use crate::tasks::{GenerationExecutor, Orchestrator, TaskQueue, TaskWorker, TaskWorkerConfig};
use ai_client::{GeminiProducer, OpenAiProducer, ProviderRegistry};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub orchestrator: Arc<Orchestrator>,
}

/// Build the provider registry from configuration.
///
/// Only providers with an API key configured make it onto the
/// allow-list; requesting any other name is an invalid provider.
pub fn build_provider_registry(config: &Config) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    if let Some(key) = &config.gemini_api_key {
        registry.register(
            "gemini",
            Arc::new(GeminiProducer::new(key.clone()).with_model(&config.gemini_model)),
        );
    }
    if let Some(key) = &config.openai_api_key {
        registry.register(
            "gpt",
            Arc::new(OpenAiProducer::new(key.clone()).with_model(&config.openai_model)),
        );
    }

    if registry.is_empty() {
        warn!("no provider API keys configured; every generation request will be rejected");
    }

    registry
}

/// Build the axum application router.
///
/// Wires the task queue, spawns the background worker, and returns the
/// router plus a token that stops the worker on shutdown. Store and
/// providers are injected so tests can run against in-memory fakes.
///
/// Must be called from within a tokio runtime (it spawns the worker).
pub fn build_app(
    store: Arc<dyn ContentStore>,
    providers: Arc<ProviderRegistry>,
    worker_config: TaskWorkerConfig,
) -> (Router, CancellationToken) {
    let renderer = Arc::new(PromptRenderer::new());
    let (queue, receiver) = TaskQueue::new();

    let executor = Arc::new(GenerationExecutor::new(
        store.clone(),
        providers.clone(),
        renderer,
        queue.clone(),
    ));

    let shutdown = CancellationToken::new();
    let worker = TaskWorker::with_config(queue.clone(), receiver, executor, worker_config);
    tokio::spawn(worker.run(shutdown.clone()));

    let orchestrator = Arc::new(Orchestrator::new(queue, store.clone(), providers));

    let app_state = AppState {
        store,
        orchestrator,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    let app = Router::new()
        .route("/generate", post(generate_handler))
        .route("/regenerate-post", post(regenerate_post_handler))
        .route("/task/:task_id", get(task_status_handler))
        .route("/contents", get(list_contents_handler))
        .route(
            "/content/:id",
            get(get_content_handler)
                .put(update_content_handler)
                .delete(delete_content_handler),
        )
        .route("/health", get(health_handler))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    (app, shutdown)
}
