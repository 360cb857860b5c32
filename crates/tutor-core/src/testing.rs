//! A scripted [`AgentRunner`] for tests and offline demos.
//!
//! Replies are keyed by agent name. Every call is recorded so tests can
//! assert exactly which agents ran, in what order, and with what input.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use tutor_types::{Result, TutorError};

use crate::agents::AgentSpec;
use crate::runner::AgentRunner;

#[derive(Debug, Default)]
pub struct ScriptedRunner {
    replies: HashMap<String, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call to `agent` with `text`.
    pub fn reply(mut self, agent: impl Into<String>, text: impl Into<String>) -> Self {
        self.replies.insert(agent.into(), text.into());
        self
    }

    /// Names of the agents called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().iter().map(|(name, _)| name.clone()).collect()
    }

    /// Input of the most recent call to `agent`.
    pub fn input_for(&self, agent: &str) -> Option<String> {
        self.lock()
            .iter()
            .rev()
            .find(|(name, _)| name == agent)
            .map(|(_, input)| input.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, String)>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AgentRunner for ScriptedRunner {
    async fn run(&self, agent: &AgentSpec, input: &str) -> Result<String> {
        self.lock().push((agent.name.clone(), input.to_string()));
        self.replies
            .get(&agent.name)
            .cloned()
            .ok_or_else(|| TutorError::Provider {
                agent: agent.name.clone(),
                message: "no scripted reply".into(),
            })
    }
}
