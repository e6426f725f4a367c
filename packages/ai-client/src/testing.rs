//! Testing utilities including mock producers.
//!
//! These are useful for testing applications that orchestrate producers
//! without making real provider calls.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{ProducerError, Result};
use crate::{Generation, Producer, TokenUsage};

/// A mock producer for testing.
///
/// Returns scripted responses in order; once the script is exhausted it
/// falls back to a fixed default response. Every prompt received is
/// recorded for assertions.
#[derive(Default)]
pub struct MockProducer {
    script: RwLock<VecDeque<std::result::Result<String, String>>>,
    default_response: String,
    delay: Option<Duration>,
    prompts: Arc<RwLock<Vec<String>>>,
}

impl MockProducer {
    /// Create a mock that answers every prompt with "generated text".
    pub fn new() -> Self {
        Self {
            default_response: "generated text".to_string(),
            ..Default::default()
        }
    }

    /// Set the fallback response used once the script is exhausted.
    pub fn with_default_response(mut self, text: impl Into<String>) -> Self {
        self.default_response = text.into();
        self
    }

    /// Queue a scripted successful response.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.script.write().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queue a scripted failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.script.write().unwrap().push_back(Err(message.into()));
        self
    }

    /// Delay every call, to simulate provider latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of generate calls received so far.
    pub fn call_count(&self) -> usize {
        self.prompts.read().unwrap().len()
    }

    /// All prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Producer for MockProducer {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<Generation> {
        self.prompts.write().unwrap().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script.write().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(Generation::new(text).with_usage(TokenUsage {
                prompt_tokens: 1,
                completion_tokens: 1,
                total_tokens: 2,
            })),
            Some(Err(message)) => Err(ProducerError::Api(message)),
            None => Ok(Generation::new(self.default_response.clone())),
        }
    }
}
