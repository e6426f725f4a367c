//! Provider-agnostic client for generative-AI text producers.
//!
//! A producer turns a fully rendered prompt into generated text. Each
//! supported provider (Gemini, OpenAI) implements the same [`Producer`]
//! trait; callers select one by name through the [`ProviderRegistry`]
//! and never depend on a concrete provider type.
//!
//! # Example
//!
//! ```rust,ignore
//! use ai_client::{GeminiProducer, Producer, ProviderRegistry};
//! use std::sync::Arc;
//!
//! let mut registry = ProviderRegistry::new();
//! registry.register("gemini", Arc::new(GeminiProducer::new(api_key)));
//!
//! let producer = registry.get("gemini").expect("registered above");
//! let generation = producer.generate("Write a haiku about rockets").await?;
//! println!("{}", generation.text);
//! ```
//!
//! Failures are first-class: a provider call that errors surfaces as a
//! [`ProducerError`] and nothing else — there is no retry logic in this
//! crate. Token usage, when the provider reports it, rides along on
//! [`Generation`] as advisory observability data only.

pub mod error;
pub mod gemini;
pub mod openai;
pub mod registry;
pub mod testing;

pub use error::{ProducerError, Result};
pub use gemini::GeminiProducer;
pub use openai::OpenAiProducer;
pub use registry::ProviderRegistry;

use async_trait::async_trait;

/// Text generated by a producer, with optional usage metrics.
#[derive(Debug, Clone)]
pub struct Generation {
    /// The generated text.
    pub text: String,

    /// Token accounting reported by the provider, if any.
    ///
    /// Advisory only; never inspected for control flow.
    pub usage: Option<TokenUsage>,
}

impl Generation {
    /// Create a generation carrying only text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }

    /// Attach usage metrics.
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// Token counts reported by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A named generative-AI capability.
///
/// Implementations wrap one concrete provider API and handle the
/// specifics of request shape and response parsing. They hold no retry
/// logic; every failure propagates to the caller as a single terminal
/// [`ProducerError`].
#[async_trait]
pub trait Producer: Send + Sync {
    /// The provider name this producer answers to (e.g. "gemini").
    fn name(&self) -> &'static str;

    /// Turn a rendered prompt into generated text.
    async fn generate(&self, prompt: &str) -> Result<Generation>;
}
