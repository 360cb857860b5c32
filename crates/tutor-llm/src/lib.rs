//! LLM provider abstraction for the tutor.
//!
//! A small client for OpenAI-compatible chat completion endpoints. It has
//! no dependencies on other tutor crates.
//!
//! # Architecture
//!
//! - [`Provider`] trait defines the chat completion interface
//! - [`OpenAiCompatProvider`] implements it for any OpenAI-compatible API
//! - [`ProviderRouter`] routes model names (e.g. "openai/gpt-4o-mini") to providers
//! - [`LlmProviderConfig`] describes how to connect to a provider
//! - [`ResponseFormat`] asks the model for output matching a JSON Schema
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tutor_llm::{ChatMessage, ChatRequest, ProviderRouter};
//!
//! let router = ProviderRouter::with_builtins();
//! let (provider, model) = router.route("openai/gpt-4o-mini").unwrap();
//!
//! let request = ChatRequest::new(model, vec![
//!     ChatMessage::system("You provide the final numeric answer only."),
//!     ChatMessage::user("What is 9 times 7?"),
//! ]);
//!
//! let response = provider.complete(&request).await?;
//! println!("{}", response.text()?);
//! ```

pub mod config;
pub mod error;
pub mod openai_compat;
pub mod provider;
pub mod router;
pub mod types;

pub use config::LlmProviderConfig;
pub use error::{ProviderError, Result};
pub use openai_compat::OpenAiCompatProvider;
pub use provider::Provider;
pub use router::ProviderRouter;
pub use types::{ChatMessage, ChatRequest, ChatResponse, JsonSchemaFormat, ResponseFormat};
