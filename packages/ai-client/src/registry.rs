//! Provider registry: the capability table mapping names to producers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::Producer;

/// Registry of named producers.
///
/// The registry doubles as the provider allow-list: a name not present
/// here is an invalid provider, full stop. Built once at startup and
/// shared read-only afterwards.
#[derive(Default)]
pub struct ProviderRegistry {
    producers: HashMap<String, Arc<dyn Producer>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a producer under a name.
    ///
    /// # Panics
    ///
    /// Panics if the name is already registered; duplicate registration
    /// is a wiring bug, not a runtime condition.
    pub fn register(&mut self, name: impl Into<String>, producer: Arc<dyn Producer>) {
        let name = name.into();
        if self.producers.contains_key(&name) {
            panic!("producer already registered for provider: {}", name);
        }
        self.producers.insert(name, producer);
    }

    /// Look up a producer by provider name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Producer>> {
        self.producers.get(name).cloned()
    }

    /// Check whether a provider name is on the allow-list.
    pub fn contains(&self, name: &str) -> bool {
        self.producers.contains_key(name)
    }

    /// Names of all registered providers, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.producers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}
