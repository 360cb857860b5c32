//! Errors returned by chat completion providers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    /// Non-success status without a more specific variant, or a billing 429.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// HTTP 401 or 403.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// HTTP 429 that is not a billing problem.
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// No API key in the provider's env var.
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// A 2xx body that carries no usable answer.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("timeout")]
    Timeout,

    #[error("http error: {0}")]
    Http(reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ProviderError::Timeout;
        }
        ProviderError::Http(err)
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
