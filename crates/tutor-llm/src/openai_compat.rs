//! OpenAI-compatible provider implementation.
//!
//! [`OpenAiCompatProvider`] works with any API that follows the OpenAI chat
//! completion format, including its `response_format` JSON Schema extension.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::config::LlmProviderConfig;
use crate::error::{ProviderError, Result};
use crate::provider::Provider;
use crate::types::{ChatRequest, ChatResponse};

/// An LLM provider that speaks the OpenAI chat completion API.
///
/// # Construction
///
/// ```rust,ignore
/// use tutor_llm::{LlmProviderConfig, OpenAiCompatProvider};
///
/// let config = tutor_llm::config::builtin_providers().remove(0);
/// let provider = OpenAiCompatProvider::new(config);
/// ```
pub struct OpenAiCompatProvider {
    config: LlmProviderConfig,
    http: reqwest::Client,
    api_key: Option<String>,
}

impl OpenAiCompatProvider {
    /// Create a new provider from configuration.
    ///
    /// The API key is resolved from `config.api_key_env` at request time.
    pub fn new(config: LlmProviderConfig) -> Self {
        let http = build_client(&config);
        Self {
            config,
            http,
            api_key: None,
        }
    }

    /// Create a new provider with an explicit API key, bypassing the
    /// environment lookup.
    pub fn with_api_key(config: LlmProviderConfig, api_key: String) -> Self {
        let http = build_client(&config);
        Self {
            config,
            http,
            api_key: Some(api_key),
        }
    }

    pub fn config(&self) -> &LlmProviderConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    /// Resolve the API key: explicit key > environment variable.
    fn resolve_api_key(&self) -> Result<String> {
        if let Some(ref key) = self.api_key {
            return Ok(key.clone());
        }
        std::env::var(&self.config.api_key_env).map_err(|_| {
            ProviderError::NotConfigured(format!("set {} env var", self.config.api_key_env))
        })
    }
}

fn build_client(config: &LlmProviderConfig) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    // Only fails when the TLS backend cannot initialise.
    builder.build().unwrap_or_else(|e| {
        warn!(provider = %config.name, error = %e, "falling back to default http client");
        reqwest::Client::new()
    })
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let api_key = self.resolve_api_key()?;

        debug!(
            provider = %self.config.name,
            model = %request.model,
            messages = request.messages.len(),
            structured = request.response_format.is_some(),
            "posting chat completion"
        );

        let response = self
            .config
            .headers
            .iter()
            .fold(
                self.http.post(self.completions_url()).bearer_auth(&api_key),
                |req, (name, value)| req.header(name.as_str(), value.as_str()),
            )
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_failure(status, &body, &request.model);
            warn!(provider = %self.config.name, %status, error = %err, "chat completion failed");
            return Err(err);
        }

        let completion: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("undecodable completion body: {e}"))
        })?;

        debug!(
            provider = %self.config.name,
            model = %completion.model,
            choices = completion.choices.len(),
            "chat completion received"
        );
        Ok(completion)
    }
}

/// Map a non-success status and its body to a [`ProviderError`].
fn classify_failure(status: StatusCode, body: &str, model: &str) -> ProviderError {
    let message = || api_error_message(body).unwrap_or_else(|| body.to_string());
    match status {
        StatusCode::TOO_MANY_REQUESTS if out_of_credit(body) => ProviderError::RequestFailed(
            api_error_message(body).unwrap_or_else(|| "account is out of credit".into()),
        ),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited(message()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthFailed(message()),
        StatusCode::NOT_FOUND => ProviderError::ModelNotFound(format!("model '{model}': {body}")),
        _ => ProviderError::RequestFailed(format!("HTTP {status}: {body}")),
    }
}

/// A 429 caused by billing never clears on its own.
fn out_of_credit(body: &str) -> bool {
    let body = body.to_lowercase();
    ["insufficient_quota", "quota exceeded", "billing", "spending limit", "exhausted"]
        .iter()
        .any(|marker| body.contains(marker))
}

/// `{"error": {"message": ".."}}` or `{"error": ".."}`.
fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    error
        .get("message")
        .unwrap_or(error)
        .as_str()
        .map(str::to_string)
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("name", &self.config.name)
            .field("base_url", &self.config.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}
