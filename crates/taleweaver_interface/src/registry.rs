//! Name-indexed provider registry.

use crate::StoryProvider;
use std::collections::BTreeMap;
use std::sync::Arc;
use taleweaver_core::RequestClass;
use tracing::debug;

/// Configured providers, keyed by name.
///
/// Built once per process and shared read-only; adapters are reference
/// counted so concurrent requests can hold them across awaits.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, Arc<dyn StoryProvider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider under its profile name, replacing any previous entry.
    pub fn register(&mut self, provider: Arc<dyn StoryProvider>) -> &mut Self {
        let name = provider.name().to_string();
        debug!(provider = %name, classes = ?provider.profile().classes(), "Registering provider");
        self.providers.insert(name, provider);
        self
    }

    /// Builder-style registration.
    pub fn with(mut self, provider: Arc<dyn StoryProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Looks up a provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn StoryProvider>> {
        self.providers.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Names of providers that support a class, sorted.
    pub fn supporting(&self, class: RequestClass) -> impl Iterator<Item = &str> {
        self.providers
            .iter()
            .filter(move |(_, provider)| provider.supports(class))
            .map(|(name, _)| name.as_str())
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}
