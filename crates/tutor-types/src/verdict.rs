//! Structured outputs produced by the decision stages.
//!
//! Each verdict is decoded from one agent response and consumed
//! immediately by the branch that follows it. Subject tags are kept as the
//! raw string the model returned; [`Subject`] parsing happens locally so an
//! out-of-set tag can be rejected instead of failing the decode.

use serde::{Deserialize, Serialize};

use crate::student::{Subject, UnsupportedSubject};

/// Guardrail output: is this a homework question at all?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeworkVerdict {
    pub is_homework: bool,
    pub reasoning: String,
}

/// Combined guardrail and subject routing output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageVerdict {
    pub is_homework: bool,
    /// Raw subject tag; see [`TriageVerdict::subject`].
    #[serde(rename = "subject")]
    pub subject_tag: String,
    pub reasoning: String,
}

impl TriageVerdict {
    pub fn subject(&self) -> Result<Subject, UnsupportedSubject> {
        self.subject_tag.parse()
    }
}

/// Standalone classifier output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationVerdict {
    #[serde(rename = "subject")]
    pub subject_tag: String,
}

impl ClassificationVerdict {
    pub fn subject(&self) -> Result<Subject, UnsupportedSubject> {
        self.subject_tag.parse()
    }
}

/// Access-control output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessVerdict {
    pub allowed: bool,
    pub reasoning: String,
}
