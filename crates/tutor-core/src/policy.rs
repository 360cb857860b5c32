//! Local authorization decisions.
//!
//! [`AuthorizationPolicy::Evaluated`](tutor_types::AuthorizationPolicy::Evaluated)
//! is decided by the access-control agent; the rules here are the ones that
//! need no external call.

use tutor_types::{AccessVerdict, StudentRecord, Subject};

/// Result of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Allowed,
    Denied { reason: String },
}

impl Authorization {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Authorization::Allowed)
    }
}

impl From<AccessVerdict> for Authorization {
    fn from(verdict: AccessVerdict) -> Self {
        if verdict.allowed {
            Authorization::Allowed
        } else {
            Authorization::Denied {
                reason: verdict.reasoning,
            }
        }
    }
}

/// The question subject must equal the registered one. Age is ignored.
pub fn subject_match(student: &StudentRecord, question_subject: Subject) -> Authorization {
    if student.subject == question_subject {
        Authorization::Allowed
    } else {
        Authorization::Denied {
            reason: format!(
                "{} is registered for {}, not {}",
                student.name, student.subject, question_subject
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_subject_is_allowed() {
        let alice = StudentRecord::new("alice", Subject::Math, 12);
        assert!(subject_match(&alice, Subject::Math).is_allowed());
    }

    #[test]
    fn mismatch_names_both_subjects() {
        let bob = StudentRecord::new("bob", Subject::History, 15);
        assert_eq!(
            subject_match(&bob, Subject::Math),
            Authorization::Denied {
                reason: "bob is registered for history, not math".into()
            }
        );
    }

    #[test]
    fn access_verdict_conversion_keeps_reasoning() {
        let denied: Authorization = AccessVerdict {
            allowed: false,
            reasoning: "too young for history".into(),
        }
        .into();
        assert_eq!(
            denied,
            Authorization::Denied {
                reason: "too young for history".into()
            }
        );

        let allowed: Authorization = AccessVerdict {
            allowed: true,
            reasoning: "fine".into(),
        }
        .into();
        assert!(allowed.is_allowed());
    }
}
