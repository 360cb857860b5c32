//! Terminal results of a pipeline run.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::student::{StudentRecord, Subject};

/// The single terminal outcome of one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// The guardrail decided the input is not a homework question.
    Blocked { reason: String },
    /// Authorization rejected the question, or its subject is unsupported.
    Denied { reason: String },
    /// A tutor answered.
    Answered { subject: Subject, text: String },
}

impl PipelineOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, PipelineOutcome::Answered { .. })
    }

    /// The answer text, if a tutor was reached.
    pub fn answer(&self) -> Option<&str> {
        match self {
            PipelineOutcome::Answered { text, .. } => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineOutcome::Blocked { reason } => write!(f, "BLOCKED: {reason}"),
            PipelineOutcome::Denied { reason } => write!(f, "ACCESS DENIED: {reason}"),
            PipelineOutcome::Answered { text, .. } => write!(f, "Answer: {text}"),
        }
    }
}

/// A decision or answering stage that issues one external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Guardrail,
    Triage,
    Classifier,
    AccessControl,
    MathTutor,
    HistoryTutor,
}

impl Stage {
    /// The tutor stage that handles `subject`.
    pub fn tutor_for(subject: Subject) -> Stage {
        match subject {
            Subject::Math => Stage::MathTutor,
            Subject::History => Stage::HistoryTutor,
        }
    }

    pub fn is_tutor(&self) -> bool {
        matches!(self, Stage::MathTutor | Stage::HistoryTutor)
    }
}

/// Everything one run produced: the outcome and the stages it took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub student: StudentRecord,
    pub outcome: PipelineOutcome,
    /// Stages invoked, in order.
    pub stages: Vec<Stage>,
}

impl RunReport {
    pub fn invoked(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }

    /// Number of tutor stages invoked (zero or one).
    pub fn tutor_calls(&self) -> usize {
        self.stages.iter().filter(|s| s.is_tutor()).count()
    }
}
