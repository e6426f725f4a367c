//! Content generation orchestration service.
//!
//! Accepts generation requests over HTTP, hands them to an asynchronous
//! task worker that calls a generative-AI producer, persists the result
//! as a content record, and lets clients poll task status or request
//! regeneration of a post.
//!
//! # Architecture
//!
//! ```text
//! API boundary (axum)
//!     │
//!     └─► Orchestrator.initiate_*()
//!             └─► TaskQueue.enqueue()        (single chokepoint)
//!
//! TaskWorker
//!     │
//!     ├─► recv queued task
//!     ├─► GenerationExecutor.execute()
//!     │       ├─► PromptRenderer.render()
//!     │       ├─► Producer.generate()
//!     │       ├─► ContentStore.create()/append_post()
//!     │       └─► TaskQueue.enqueue()        (idea → post chaining)
//!     └─► record terminal result on the task handle
//!
//! Client polls GET /task/{id} ─► Orchestrator.task_status()
//! ```
//!
//! Task handles live only in the in-process execution backend
//! ([`tasks::TaskQueue`]); content records live only in the
//! [`store::ContentStore`].

pub mod config;
pub mod error;
pub mod prompt;
pub mod scrape;
pub mod server;
pub mod store;
pub mod tasks;

pub use config::Config;
