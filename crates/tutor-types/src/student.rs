//! Student records and the closed set of tutored subjects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A subject the tutors can answer questions about.
///
/// Serializes as a lowercase string (`"math"`, `"history"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    /// Arithmetic, algebra and other numeric questions.
    Math,
    /// Historical events and their context.
    History,
}

impl Subject {
    /// All supported subjects, in declaration order.
    pub const ALL: [Subject; 2] = [Subject::Math, Subject::History];

    /// The lowercase tag used on the wire and in the student table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Math => "math",
            Subject::History => "history",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subject tag outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedSubject(pub String);

impl fmt::Display for UnsupportedSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported subject '{}'", self.0)
    }
}

impl std::error::Error for UnsupportedSubject {}

impl FromStr for Subject {
    type Err = UnsupportedSubject;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "math" => Ok(Subject::Math),
            "history" => Ok(Subject::History),
            _ => Err(UnsupportedSubject(s.trim().to_string())),
        }
    }
}

/// A registered student, looked up by exact name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Unique lookup key.
    pub name: String,
    /// The subject the student is registered for.
    pub subject: Subject,
    /// Age in years.
    pub age: u32,
}

impl StudentRecord {
    pub fn new(name: impl Into<String>, subject: Subject, age: u32) -> Self {
        Self {
            name: name.into(),
            subject,
            age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_parses_case_insensitively() {
        assert_eq!("math".parse::<Subject>().unwrap(), Subject::Math);
        assert_eq!(" History\n".parse::<Subject>().unwrap(), Subject::History);
        assert_eq!("MATH".parse::<Subject>().unwrap(), Subject::Math);
    }

    #[test]
    fn unknown_subject_is_rejected() {
        let err = "geography".parse::<Subject>().unwrap_err();
        assert_eq!(err, UnsupportedSubject("geography".into()));
        assert_eq!(err.to_string(), "unsupported subject 'geography'");
    }

    #[test]
    fn subject_serializes_lowercase() {
        let json = serde_json::to_string(&Subject::History).unwrap();
        assert_eq!(json, r#""history""#);
        let parsed: Subject = serde_json::from_str(r#""math""#).unwrap();
        assert_eq!(parsed, Subject::Math);
    }

    #[test]
    fn display_matches_tag() {
        for subject in Subject::ALL {
            assert_eq!(subject.to_string(), subject.as_str());
        }
    }

    #[test]
    fn student_record_new() {
        let alice = StudentRecord::new("alice", Subject::Math, 12);
        assert_eq!(alice.name, "alice");
        assert_eq!(alice.subject, Subject::Math);
        assert_eq!(alice.age, 12);
    }
}
