//! The [`Provider`] seam between agents and a model endpoint.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatRequest, ChatResponse};

/// Something that answers chat completion requests.
///
/// One `complete` is one request. Implementations do not retry, fall back
/// to another endpoint, or stream.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse>;
}
