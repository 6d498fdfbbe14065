//! Building adapters and the provider registry from configuration.

use std::sync::Arc;
use taleweaver_error::{ConfigError, TaleweaverResult};
use taleweaver_interface::{ProviderProfile, ProviderRegistry, StoryProvider};
use taleweaver_rate_limit::{ProviderConfig, ProviderKind, TaleweaverConfig};
use tracing::{debug, info, instrument, warn};

/// Builds one adapter.
///
/// `api_key` is sent as-is; an empty key is allowed for local endpoints.
/// Fails when the adapter's feature is not compiled in.
pub fn build_provider(
    name: &str,
    config: &ProviderConfig,
    api_key: &str,
) -> Result<Arc<dyn StoryProvider>, ConfigError> {
    let profile = ProviderProfile::builder()
        .name(name)
        .classes(config.classes.clone())
        .cost_class(config.cost_class)
        .latency_class(config.latency_class)
        .call_timeout(config.call_timeout())
        .build()
        .map_err(|e| ConfigError::for_key(format!("providers.{}", name), e.to_string()))?;

    match config.kind {
        #[cfg(feature = "openai")]
        ProviderKind::Openai => Ok(Arc::new(crate::OpenAiClient::new(profile, api_key, config))),
        #[cfg(feature = "anthropic")]
        ProviderKind::Anthropic => Ok(Arc::new(crate::AnthropicClient::new(
            profile, api_key, config,
        ))),
        #[cfg(feature = "stability")]
        ProviderKind::Stability => Ok(Arc::new(crate::StabilityClient::new(
            profile, api_key, config,
        ))),
        #[allow(unreachable_patterns)]
        kind => {
            let _ = (profile, api_key);
            Err(ConfigError::for_key(
                format!("providers.{}.kind", name),
                format!("the '{}' feature is not enabled in this build", kind),
            ))
        }
    }
}

/// Builds the registry of every configured provider that can be used.
///
/// A provider is skipped, with a warning, when its API key variable is unset
/// or its adapter is not compiled in. Skipped providers simply drop out of
/// delegation.
#[instrument(skip(config), fields(configured = config.providers.len()))]
pub fn build_registry(config: &TaleweaverConfig) -> TaleweaverResult<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();

    for (name, provider) in &config.providers {
        let api_key = match &provider.api_key_env {
            Some(var) => match std::env::var(var) {
                Ok(key) if !key.trim().is_empty() => key,
                _ => {
                    warn!(provider = %name, env = %var, "API key not set, skipping provider");
                    continue;
                }
            },
            None => String::new(),
        };

        match build_provider(name, provider, &api_key) {
            Ok(adapter) => {
                debug!(provider = %name, kind = %provider.kind, "Registered provider");
                registry.register(adapter);
            }
            Err(e) => warn!(provider = %name, error = %e, "Skipping provider"),
        }
    }

    info!(registered = registry.len(), "Provider registry ready");
    Ok(registry)
}
