//! Request and response types for LLM chat completion calls.
//!
//! These mirror the OpenAI chat completion format, including the
//! `response_format` extension for JSON Schema constrained output.

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// The role of the message author ("system" or "user").
    pub role: String,

    /// The content of the message.
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// Requested shape of the model output. Omitted for free-text agents.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Output constrained to a JSON Schema.
    JsonSchema { json_schema: JsonSchemaFormat },
}

impl ResponseFormat {
    /// A strict JSON Schema format named `name`.
    pub fn json_schema(name: impl Into<String>, schema: serde_json::Value) -> Self {
        ResponseFormat::JsonSchema {
            json_schema: JsonSchemaFormat {
                name: name.into(),
                schema,
                strict: true,
            },
        }
    }
}

/// The `json_schema` member of a [`ResponseFormat::JsonSchema`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JsonSchemaFormat {
    /// Schema name; `[a-zA-Z0-9_-]` only.
    pub name: String,

    pub schema: serde_json::Value,

    /// When true the provider guarantees schema-conformant output.
    pub strict: bool,
}

/// A chat completion request sent to an LLM provider.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// The model identifier, without any routing prefix.
    pub model: String,

    /// The conversation messages.
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature (0.0 = deterministic, 2.0 = creative).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    /// Create a minimal chat request with a model and messages.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            response_format: None,
        }
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A chat completion response (OpenAI format).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatResponse {
    /// Unique identifier for this completion. Some compatible servers omit it.
    #[serde(default)]
    pub id: String,

    pub choices: Vec<Choice>,

    #[serde(default)]
    pub model: String,
}

impl ChatResponse {
    /// The text of the first choice.
    ///
    /// A missing choice, a refusal, or a null content are all invalid
    /// responses for the tutor's purposes.
    pub fn text(&self) -> Result<&str> {
        let choice = self
            .choices
            .first()
            .ok_or_else(|| ProviderError::InvalidResponse("response has no choices".into()))?;

        if let Some(refusal) = &choice.message.refusal {
            return Err(ProviderError::InvalidResponse(format!(
                "model refused: {refusal}"
            )));
        }

        choice
            .message
            .content
            .as_deref()
            .ok_or_else(|| ProviderError::InvalidResponse("choice has no content".into()))
    }
}

/// A single completion choice within a response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Choice {
    #[serde(default)]
    pub index: i32,

    pub message: ResponseMessage,

    /// Why generation stopped (e.g. "stop", "length").
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The assistant message inside a [`Choice`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ResponseMessage {
    pub role: String,

    /// Null when the model refused a structured-output request.
    #[serde(default)]
    pub content: Option<String>,

    /// Refusal explanation for structured-output requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_helpers() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
    }

    #[test]
    fn minimal_request_omits_optional_fields() {
        let req = ChatRequest::new("gpt-4o-mini", vec![ChatMessage::user("Hi")]);
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""model":"gpt-4o-mini""#));
        assert!(!json.contains("response_format"));
        assert!(!json.contains("temperature"));
    }

    #[test]
    fn json_schema_response_format_shape() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {"allowed": {"type": "boolean"}},
            "required": ["allowed"],
            "additionalProperties": false
        });
        let req = ChatRequest::new("m", vec![])
            .with_response_format(ResponseFormat::json_schema("access_verdict", schema.clone()));
        let json = serde_json::to_value(&req).unwrap();
        let format = &json["response_format"];
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["name"], "access_verdict");
        assert_eq!(format["json_schema"]["strict"], true);
        assert_eq!(format["json_schema"]["schema"], schema);
    }

    #[test]
    fn response_text_from_first_choice() {
        let json = r#"{
            "id": "chatcmpl-abc123",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "63"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 1, "total_tokens": 11},
            "model": "gpt-4o-mini"
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.text().unwrap(), "63");
        assert_eq!(resp.model, "gpt-4o-mini");
    }

    #[test]
    fn response_without_id_or_model() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": "ok"}}]}"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(resp.id.is_empty());
        assert!(resp.model.is_empty());
        assert_eq!(resp.text().unwrap(), "ok");
    }

    #[test]
    fn refusal_is_invalid_response() {
        let json = r#"{"choices": [{"message": {
            "role": "assistant", "content": null, "refusal": "I can't help with that."
        }}]}"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        let err = resp.text().unwrap_err();
        assert!(err.to_string().contains("model refused"));
    }

    #[test]
    fn empty_choices_is_invalid_response() {
        let resp: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            resp.text().unwrap_err(),
            ProviderError::InvalidResponse(_)
        ));
    }
}
