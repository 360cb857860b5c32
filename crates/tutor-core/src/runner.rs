//! Executing agents against a model.
//!
//! [`AgentRunner`] is the seam between the pipeline and the outside world:
//! one `run` is one external call. [`LlmRunner`] is the production
//! implementation over a [`tutor_llm::Provider`]; tests substitute a
//! scripted runner.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use tutor_llm::{ChatMessage, ChatRequest, Provider, ResponseFormat};
use tutor_types::{Result, TutorError};

use crate::agents::AgentSpec;
use crate::json_repair::parse_with_repair;

/// Runs one agent on one input and returns the raw response text.
#[async_trait]
pub trait AgentRunner: Send + Sync {
    async fn run(&self, agent: &AgentSpec, input: &str) -> Result<String>;
}

/// Run a structured agent and decode its answer as `T`.
///
/// Fences, surrounding prose and trailing commas are tolerated; anything
/// else that does not match `T` is [`TutorError::InvalidOutput`].
pub async fn run_structured<T: DeserializeOwned>(
    runner: &dyn AgentRunner,
    agent: &AgentSpec,
    input: &str,
) -> Result<T> {
    let text = runner.run(agent, input).await?;
    let value = parse_with_repair(&text).map_err(|e| TutorError::InvalidOutput {
        agent: agent.name.clone(),
        message: format!("not JSON ({e}): {text}"),
    })?;
    serde_json::from_value(value).map_err(|e| TutorError::InvalidOutput {
        agent: agent.name.clone(),
        message: e.to_string(),
    })
}

/// [`AgentRunner`] backed by a chat completion provider.
///
/// Instructions go out as the system message and the input as the single
/// user message. Structured agents also send their schema as a strict
/// `json_schema` response format.
pub struct LlmRunner {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: Option<f64>,
}

impl LlmRunner {
    /// `model` is the bare model name, already stripped of any routing prefix.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_for(&self, agent: &AgentSpec, input: &str) -> ChatRequest {
        let mut request = ChatRequest::new(
            self.model.clone(),
            vec![
                ChatMessage::system(agent.instructions.clone()),
                ChatMessage::user(input),
            ],
        )
        .with_temperature(self.temperature);

        if let Some(output) = &agent.output {
            request = request.with_response_format(ResponseFormat::json_schema(
                output.name.clone(),
                output.schema.clone(),
            ));
        }
        request
    }
}

#[async_trait]
impl AgentRunner for LlmRunner {
    async fn run(&self, agent: &AgentSpec, input: &str) -> Result<String> {
        let request = self.request_for(agent, input);

        debug!(
            agent = %agent.name,
            provider = %self.provider.name(),
            model = %self.model,
            structured = agent.is_structured(),
            "running agent"
        );

        let provider_err = |e: tutor_llm::ProviderError| TutorError::Provider {
            agent: agent.name.clone(),
            message: e.to_string(),
        };

        let response = self.provider.complete(&request).await.map_err(provider_err)?;
        let text = response.text().map_err(provider_err)?.to_string();

        trace!(agent = %agent.name, output = %text, "agent output");
        Ok(text)
    }
}

impl std::fmt::Debug for LlmRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmRunner")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::TutorAgents;
    use tutor_llm::{ChatResponse, ProviderError};
    use tutor_types::HomeworkVerdict;

    /// Provider double that answers every request with `reply`.
    struct FixedProvider {
        reply: std::result::Result<&'static str, &'static str>,
    }

    #[async_trait]
    impl Provider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _request: &ChatRequest) -> tutor_llm::Result<ChatResponse> {
            match self.reply {
                Ok(content) => Ok(serde_json::from_value(serde_json::json!({
                    "choices": [{"message": {"role": "assistant", "content": content}}]
                }))?),
                Err(msg) => Err(ProviderError::RequestFailed(msg.into())),
            }
        }
    }

    fn runner(reply: std::result::Result<&'static str, &'static str>) -> LlmRunner {
        LlmRunner::new(Arc::new(FixedProvider { reply }), "gpt-4o-mini")
    }

    #[test]
    fn structured_agent_request_carries_schema() {
        let agents = TutorAgents::standard();
        let request = runner(Ok("")).request_for(&agents.guardrail, "What is 9 times 7?");

        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[0].content, agents.guardrail.instructions);
        assert_eq!(request.messages[1].content, "What is 9 times 7?");
        match request.response_format {
            Some(ResponseFormat::JsonSchema { json_schema }) => {
                assert_eq!(json_schema.name, "homework_verdict");
                assert!(json_schema.strict);
            }
            other => panic!("expected json_schema format, got {other:?}"),
        }
    }

    #[test]
    fn tutor_request_is_free_text() {
        let agents = TutorAgents::standard();
        let request = runner(Ok(""))
            .with_temperature(Some(0.2))
            .request_for(&agents.math_tutor, "2+2");
        assert!(request.response_format.is_none());
        assert_eq!(request.temperature, Some(0.2));
    }

    #[tokio::test]
    async fn run_structured_decodes_verdict() {
        let agents = TutorAgents::standard();
        let r = runner(Ok("```json\n{\"is_homework\": true, \"reasoning\": \"math\",}\n```"));
        let verdict: HomeworkVerdict = run_structured(&r, &agents.guardrail, "2+2").await.unwrap();
        assert!(verdict.is_homework);
    }

    #[tokio::test]
    async fn run_structured_rejects_wrong_shape() {
        let agents = TutorAgents::standard();
        let r = runner(Ok(r#"{"homework": "yes"}"#));
        let err = run_structured::<HomeworkVerdict>(&r, &agents.guardrail, "2+2")
            .await
            .unwrap_err();
        match err {
            TutorError::InvalidOutput { agent, .. } => assert_eq!(agent, "Guardrail check"),
            other => panic!("expected InvalidOutput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn run_structured_rejects_plain_text() {
        let agents = TutorAgents::standard();
        let r = runner(Ok("Yes, this is homework."));
        let err = run_structured::<HomeworkVerdict>(&r, &agents.guardrail, "2+2")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not JSON"));
    }

    #[tokio::test]
    async fn provider_failure_names_agent() {
        let agents = TutorAgents::standard();
        let err = runner(Err("connection reset"))
            .run(&agents.history_tutor, "Who was Napoleon?")
            .await
            .unwrap_err();
        match err {
            TutorError::Provider { agent, message } => {
                assert_eq!(agent, "History Tutor");
                assert!(message.contains("connection reset"));
            }
            other => panic!("expected Provider error, got {other:?}"),
        }
    }
}
