//! Provider configuration types and built-in provider definitions.
//!
//! Each [`LlmProviderConfig`] describes how to connect to an LLM provider:
//! the base URL, API key environment variable, model prefix for routing,
//! and any extra headers needed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for a single OpenAI-compatible endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    /// Human-readable provider name (e.g. "openai", "groq").
    pub name: String,

    /// Base URL for the API (e.g. "https://api.openai.com/v1").
    pub base_url: String,

    /// Environment variable that holds the API key (e.g. "OPENAI_API_KEY").
    pub api_key_env: String,

    /// Prefix used for routing model names to this provider (e.g. "openai/").
    /// The prefix is stripped before the request is sent.
    #[serde(default)]
    pub model_prefix: Option<String>,

    /// Extra HTTP headers to include in every request to this provider.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request timeout in seconds. No timeout when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl LlmProviderConfig {
    fn builtin(name: &str, base_url: &str, api_key_env: &str) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key_env: api_key_env.into(),
            model_prefix: Some(format!("{name}/")),
            headers: HashMap::new(),
            timeout_secs: None,
        }
    }
}

/// Returns the built-in provider configurations.
///
/// All of them support `response_format` with JSON Schema. The first entry
/// is the router's default provider.
pub fn builtin_providers() -> Vec<LlmProviderConfig> {
    vec![
        LlmProviderConfig::builtin("openai", "https://api.openai.com/v1", "OPENAI_API_KEY"),
        LlmProviderConfig::builtin("groq", "https://api.groq.com/openai/v1", "GROQ_API_KEY"),
        LlmProviderConfig::builtin("mistral", "https://api.mistral.ai/v1", "MISTRAL_API_KEY"),
        LlmProviderConfig::builtin(
            "openrouter",
            "https://openrouter.ai/api/v1",
            "OPENROUTER_API_KEY",
        ),
        LlmProviderConfig::builtin(
            "gemini",
            "https://generativelanguage.googleapis.com/v1beta/openai",
            "GOOGLE_GEMINI_API_KEY",
        ),
    ]
}
