//! Agent definitions.
//!
//! An [`AgentSpec`] is an immutable record of everything one external call
//! needs besides its input: a name for logs and errors, the instructions
//! sent as the system message, and (for decision stages) the JSON Schema
//! the answer must match. [`TutorAgents`] builds the full set once at
//! start-up and is passed into the pipeline.

use serde_json::json;

use tutor_types::Subject;

/// Declared structured output of an agent.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    /// Schema name sent to the provider.
    pub name: String,
    pub schema: serde_json::Value,
}

/// One agent: instructions plus an optional output contract.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSpec {
    pub name: String,
    pub instructions: String,
    /// `None` for free-text agents (the tutors).
    pub output: Option<OutputSchema>,
    /// One-line description used when the agent is a handoff target.
    pub handoff_description: Option<String>,
}

impl AgentSpec {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            output: None,
            handoff_description: None,
        }
    }

    pub fn with_output(mut self, name: impl Into<String>, schema: serde_json::Value) -> Self {
        self.output = Some(OutputSchema {
            name: name.into(),
            schema,
        });
        self
    }

    pub fn with_handoff_description(mut self, description: impl Into<String>) -> Self {
        self.handoff_description = Some(description.into());
        self
    }

    pub fn is_structured(&self) -> bool {
        self.output.is_some()
    }
}

/// The full agent set used by the pipeline.
#[derive(Debug, Clone)]
pub struct TutorAgents {
    pub guardrail: AgentSpec,
    pub triage: AgentSpec,
    pub classifier: AgentSpec,
    pub access_control: AgentSpec,
    pub math_tutor: AgentSpec,
    pub history_tutor: AgentSpec,
}

impl TutorAgents {
    /// The standard agents and their instructions.
    pub fn standard() -> Self {
        let math_tutor = AgentSpec::new("Math Tutor", "You provide the final numeric answer only.")
            .with_handoff_description("Specialist agent for math questions");

        let history_tutor = AgentSpec::new(
            "History Tutor",
            "You provide assistance with historical queries. \
             Explain important events and context clearly.",
        )
        .with_handoff_description("Specialist agent for historical questions");

        let triage = AgentSpec::new(
            "Triage Agent",
            format!(
                "Check if the user is asking about homework, and decide which \
                 specialist should answer it. Available specialists:\n{}\n{}\n\
                 Respond with is_homework true/false, the subject as exactly \
                 'math' or 'history', and your reasoning. If a registered \
                 subject is given as context, use it only to understand the \
                 question, never to change its subject.",
                handoff_line(Subject::Math, &math_tutor),
                handoff_line(Subject::History, &history_tutor),
            ),
        )
        .with_output("triage_verdict", triage_schema());

        Self {
            guardrail: AgentSpec::new(
                "Guardrail check",
                "Check if the user is asking about homework. \
                 Respond with is_homework true/false and reasoning.",
            )
            .with_output("homework_verdict", homework_schema()),
            triage,
            classifier: AgentSpec::new(
                "Classifier Agent",
                "Classify the homework question as either 'math' or 'history'. \
                 Respond with the subject field as exactly 'math' or 'history'.",
            )
            .with_output("classification_verdict", classification_schema()),
            access_control: AgentSpec::new(
                "Access Control Agent",
                "You are an access control checker. \
                 You are given a natural-language policy, the student's subject and age, \
                 and the type of question (math or history). \
                 Respond ONLY with allowed true/false and reasoning.",
            )
            .with_output("access_verdict", access_schema()),
            math_tutor,
            history_tutor,
        }
    }

    /// The tutor that answers questions about `subject`.
    pub fn tutor_for(&self, subject: Subject) -> &AgentSpec {
        match subject {
            Subject::Math => &self.math_tutor,
            Subject::History => &self.history_tutor,
        }
    }
}

impl Default for TutorAgents {
    fn default() -> Self {
        Self::standard()
    }
}

fn handoff_line(subject: Subject, agent: &AgentSpec) -> String {
    format!(
        "- {subject}: {}",
        agent.handoff_description.as_deref().unwrap_or(&agent.name)
    )
}

fn subject_property() -> serde_json::Value {
    json!({
        "type": "string",
        "enum": Subject::ALL.iter().map(Subject::as_str).collect::<Vec<_>>()
    })
}

fn homework_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "is_homework": {"type": "boolean"},
            "reasoning": {"type": "string"}
        },
        "required": ["is_homework", "reasoning"],
        "additionalProperties": false
    })
}

fn triage_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "is_homework": {"type": "boolean"},
            "subject": subject_property(),
            "reasoning": {"type": "string"}
        },
        "required": ["is_homework", "subject", "reasoning"],
        "additionalProperties": false
    })
}

fn classification_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {"subject": subject_property()},
        "required": ["subject"],
        "additionalProperties": false
    })
}

fn access_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "allowed": {"type": "boolean"},
            "reasoning": {"type": "string"}
        },
        "required": ["allowed", "reasoning"],
        "additionalProperties": false
    })
}
