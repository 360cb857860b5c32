//! Prefix-based model-to-provider routing.
//!
//! The [`ProviderRouter`] maps model name prefixes (e.g. "openai/", "groq/")
//! to their providers, so a single `model` string in config picks both the
//! endpoint and the model.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{self, LlmProviderConfig};
use crate::openai_compat::OpenAiCompatProvider;
use crate::provider::Provider;

/// Routes model names to providers based on prefix matching.
///
/// For "openai/gpt-4o-mini" the router finds the provider registered for
/// "openai/", strips the prefix and returns "gpt-4o-mini". Names without a
/// matching prefix go to the default provider unchanged.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    /// (prefix, provider name), longest prefix first.
    prefix_map: Vec<(String, String)>,
    default_provider: String,
}

impl ProviderRouter {
    /// Create a router from provider configurations. The first one becomes
    /// the default.
    pub fn from_configs(configs: Vec<LlmProviderConfig>) -> Self {
        let default_provider = configs.first().map(|c| c.name.clone()).unwrap_or_default();

        let mut providers: HashMap<String, Arc<dyn Provider>> = HashMap::new();
        let mut prefix_map = Vec::new();

        for config in configs {
            let name = config.name.clone();
            if let Some(ref prefix) = config.model_prefix {
                prefix_map.push((prefix.clone(), name.clone()));
            }
            providers.insert(name, Arc::new(OpenAiCompatProvider::new(config)));
        }

        prefix_map.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Self {
            providers,
            prefix_map,
            default_provider,
        }
    }

    /// Create a router with all built-in provider configurations.
    pub fn with_builtins() -> Self {
        Self::from_configs(config::builtin_providers())
    }

    /// Route a model name to its provider, returning the provider and the
    /// model name with the prefix stripped.
    pub fn route(&self, model: &str) -> Option<(Arc<dyn Provider>, String)> {
        for (prefix, provider_name) in &self.prefix_map {
            if let Some(stripped) = model.strip_prefix(prefix.as_str())
                && let Some(provider) = self.providers.get(provider_name)
            {
                return Some((Arc::clone(provider), stripped.to_string()));
            }
        }

        self.providers
            .get(&self.default_provider)
            .map(|p| (Arc::clone(p), model.to_string()))
    }

    /// Names of all registered providers, sorted.
    pub fn providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn default_provider(&self) -> &str {
        &self.default_provider
    }
}
