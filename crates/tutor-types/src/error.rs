//! Error types for the tutor pipeline.
//!
//! Only [`TutorError::StudentNotFound`] is an expected, reportable
//! condition. Everything else is a fault that propagates to the caller.

use thiserror::Error;

/// Top-level error type for the tutor pipeline.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TutorError {
    /// No student record matches the given name.
    #[error("No student found with name {0}")]
    StudentNotFound(String),

    /// The student store could not be read or holds malformed rows.
    #[error("student store error: {0}")]
    Store(String),

    /// The external model call behind an agent failed.
    #[error("agent '{agent}' call failed: {message}")]
    Provider {
        /// Name of the agent whose call failed.
        agent: String,
        /// Provider-supplied error message.
        message: String,
    },

    /// An agent answered with output that does not match its declared shape.
    #[error("agent '{agent}' returned invalid output: {message}")]
    InvalidOutput {
        /// Name of the agent that produced the output.
        agent: String,
        /// What could not be decoded.
        message: String,
    },

    /// Configuration is malformed or semantically invalid.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenience alias used throughout the tutor crates.
pub type Result<T> = std::result::Result<T, TutorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_not_found_matches_operator_message() {
        let err = TutorError::StudentNotFound("carol".into());
        assert_eq!(err.to_string(), "No student found with name carol");
    }

    #[test]
    fn provider_error_names_agent() {
        let err = TutorError::Provider {
            agent: "Guardrail check".into(),
            message: "timeout".into(),
        };
        assert_eq!(err.to_string(), "agent 'Guardrail check' call failed: timeout");
    }

    #[test]
    fn invalid_output_display() {
        let err = TutorError::InvalidOutput {
            agent: "Classifier Agent".into(),
            message: "missing field `subject`".into(),
        };
        assert!(err.to_string().contains("Classifier Agent"));
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn json_error_converts() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: TutorError = bad.into();
        assert!(matches!(err, TutorError::Json(_)));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: TutorError = io.into();
        assert!(err.to_string().starts_with("io error:"));
    }
}
