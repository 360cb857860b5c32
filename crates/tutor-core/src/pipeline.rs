//! The question pipeline.
//!
//! One run is: student lookup, then homework validation (plain guardrail
//! or triage), then subject classification, then authorization, then the
//! tutor for the subject. Every step is awaited before the next one starts
//! and the first rejection ends the run. Which steps exist is decided by
//! [`PipelineSettings`]:
//!
//! | routing      | authorization   | stages                                         |
//! |--------------|-----------------|------------------------------------------------|
//! | `classifier` | `evaluated`     | guardrail, classifier, access control, tutor   |
//! | `triage`     | `open`          | triage, tutor                                  |
//! | `triage`     | `subject-match` | triage (with registered subject), tutor        |
//!
//! A subject tag outside the supported set is denied before authorization.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use tutor_types::{
    AuthorizationPolicy, PipelineOutcome, PipelineSettings, Result, RoutingMode, RunReport,
    Stage, StudentRecord, Subject, TutorError, UnsupportedSubject,
};

use crate::agents::TutorAgents;
use crate::policy::{self, Authorization};
use crate::runner::AgentRunner;
use crate::stages;
use crate::store::StudentStore;

/// Orchestrates one question at a time. Holds no per-run state.
pub struct TutorPipeline {
    settings: PipelineSettings,
    agents: TutorAgents,
    store: Arc<dyn StudentStore>,
    runner: Arc<dyn AgentRunner>,
}

/// The authorization step of one run, with its policy text already resolved.
enum Gate<'a> {
    Evaluated(&'a str),
    SubjectMatch,
    Open,
}

/// Where the validation step left the run.
enum Validation {
    Rejected(String),
    Subject(std::result::Result<Subject, UnsupportedSubject>),
}

impl TutorPipeline {
    pub fn new(
        settings: PipelineSettings,
        agents: TutorAgents,
        store: Arc<dyn StudentStore>,
        runner: Arc<dyn AgentRunner>,
    ) -> Self {
        Self {
            settings,
            agents,
            store,
            runner,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run one question for `student_name`.
    ///
    /// `policy` overrides the configured policy text and only matters under
    /// [`AuthorizationPolicy::Evaluated`].
    ///
    /// # Errors
    ///
    /// [`TutorError::StudentNotFound`] when the name is not registered (no
    /// stage runs), [`TutorError::ConfigInvalid`] when evaluated
    /// authorization has no policy text, and any store or agent failure.
    pub async fn run(
        &self,
        student_name: &str,
        question: &str,
        policy: Option<&str>,
    ) -> Result<RunReport> {
        let gate = match self.settings.authorization {
            AuthorizationPolicy::Evaluated => {
                Gate::Evaluated(self.settings.evaluated_policy(policy)?)
            }
            AuthorizationPolicy::SubjectMatch => Gate::SubjectMatch,
            AuthorizationPolicy::Open => Gate::Open,
        };
        let run_id = Uuid::new_v4();

        let student = self
            .store
            .find(student_name)
            .await?
            .ok_or_else(|| TutorError::StudentNotFound(student_name.to_string()))?;

        debug!(
            %run_id,
            student = %student.name,
            routing = ?self.settings.routing,
            authorization = ?self.settings.authorization,
            "starting run"
        );

        let mut trail = Vec::new();
        let outcome = self
            .decide(run_id, &student, question, gate, &mut trail)
            .await?;

        info!(
            %run_id,
            student = %student.name,
            stages = ?trail,
            answered = outcome.is_answered(),
            "run finished"
        );

        Ok(RunReport {
            run_id,
            student,
            outcome,
            stages: trail,
        })
    }

    async fn decide(
        &self,
        run_id: Uuid,
        student: &StudentRecord,
        question: &str,
        gate: Gate<'_>,
        trail: &mut Vec<Stage>,
    ) -> Result<PipelineOutcome> {
        let subject = match self.validate(student, question, trail).await? {
            Validation::Rejected(reason) => {
                debug!(%run_id, %reason, "blocked by guardrail");
                return Ok(PipelineOutcome::Blocked { reason });
            }
            Validation::Subject(Err(unsupported)) => {
                debug!(%run_id, tag = %unsupported.0, "unsupported subject");
                return Ok(PipelineOutcome::Denied {
                    reason: unsupported.to_string(),
                });
            }
            Validation::Subject(Ok(subject)) => subject,
        };

        let authorization = match gate {
            Gate::Evaluated(policy) => {
                trail.push(Stage::AccessControl);
                stages::access_control(
                    self.runner.as_ref(),
                    &self.agents.access_control,
                    policy,
                    student,
                    subject,
                )
                .await?
                .into()
            }
            Gate::SubjectMatch => policy::subject_match(student, subject),
            Gate::Open => Authorization::Allowed,
        };

        if let Authorization::Denied { reason } = authorization {
            debug!(%run_id, %reason, "access denied");
            return Ok(PipelineOutcome::Denied { reason });
        }

        trail.push(Stage::tutor_for(subject));
        let text = stages::tutor(
            self.runner.as_ref(),
            self.agents.tutor_for(subject),
            question,
        )
        .await?;

        Ok(PipelineOutcome::Answered { subject, text })
    }

    /// Homework check plus subject, via whichever routing is configured.
    async fn validate(
        &self,
        student: &StudentRecord,
        question: &str,
        trail: &mut Vec<Stage>,
    ) -> Result<Validation> {
        let runner = self.runner.as_ref();
        match self.settings.routing {
            RoutingMode::Classifier => {
                trail.push(Stage::Guardrail);
                let verdict = stages::guardrail(runner, &self.agents.guardrail, question).await?;
                if !verdict.is_homework {
                    return Ok(Validation::Rejected(verdict.reasoning));
                }

                trail.push(Stage::Classifier);
                let classified =
                    stages::classify(runner, &self.agents.classifier, question).await?;
                Ok(Validation::Subject(classified.subject()))
            }
            RoutingMode::Triage => {
                let context = (self.settings.authorization == AuthorizationPolicy::SubjectMatch)
                    .then_some(student.subject);

                trail.push(Stage::Triage);
                let verdict =
                    stages::triage(runner, &self.agents.triage, question, context).await?;
                if !verdict.is_homework {
                    return Ok(Validation::Rejected(verdict.reasoning));
                }
                Ok(Validation::Subject(verdict.subject()))
            }
        }
    }
}

impl std::fmt::Debug for TutorPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutorPipeline")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStudentStore;
    use crate::testing::ScriptedRunner;
    use tutor_types::Variant;

    const PERMISSIVE: &str = "Students may ask about any subject.";

    fn pipeline(variant: Variant, runner: Arc<ScriptedRunner>) -> TutorPipeline {
        TutorPipeline::new(
            PipelineSettings::from_variant(variant).with_policy(PERMISSIVE),
            TutorAgents::standard(),
            Arc::new(InMemoryStudentStore::demo()),
            runner,
        )
    }

    #[tokio::test]
    async fn alice_multiplication_is_answered_by_math_tutor() {
        let runner = Arc::new(
            ScriptedRunner::new()
                .reply("Guardrail check", r#"{"is_homework": true, "reasoning": "arithmetic"}"#)
                .reply("Classifier Agent", r#"{"subject": "math"}"#)
                .reply(
                    "Access Control Agent",
                    r#"{"allowed": true, "reasoning": "policy allows everything"}"#,
                )
                .reply("Math Tutor", "63"),
        );
        let report = pipeline(Variant::Checked, runner.clone())
            .run("alice", "What is 9 times 7?", None)
            .await
            .unwrap();

        assert_eq!(
            report.outcome,
            PipelineOutcome::Answered {
                subject: Subject::Math,
                text: "63".into()
            }
        );
        assert_eq!(
            report.stages,
            [
                Stage::Guardrail,
                Stage::Classifier,
                Stage::AccessControl,
                Stage::MathTutor
            ]
        );
        assert_eq!(
            runner.calls(),
            [
                "Guardrail check",
                "Classifier Agent",
                "Access Control Agent",
                "Math Tutor"
            ]
        );
    }

    #[tokio::test]
    async fn access_control_sees_policy_and_student() {
        let runner = Arc::new(
            ScriptedRunner::new()
                .reply("Guardrail check", r#"{"is_homework": true, "reasoning": "r"}"#)
                .reply("Classifier Agent", r#"{"subject": "history"}"#)
                .reply("Access Control Agent", r#"{"allowed": true, "reasoning": "ok"}"#)
                .reply("History Tutor", "The Magna Carta was sealed in 1215."),
        );
        pipeline(Variant::Checked, runner.clone())
            .run("alice", "When was the Magna Carta sealed?", Some("Only math after 8pm"))
            .await
            .unwrap();

        let input = runner.input_for("Access Control Agent").unwrap();
        assert!(input.contains("Policy: Only math after 8pm"));
        assert!(input.contains("Student subject: math"));
        assert!(input.contains("Student age: 12"));
        assert!(input.contains("Question subject: history"));
    }

    #[tokio::test]
    async fn evaluated_without_policy_fails_before_lookup() {
        let runner = Arc::new(ScriptedRunner::new());
        let pipeline = TutorPipeline::new(
            PipelineSettings::from_variant(Variant::Checked),
            TutorAgents::standard(),
            Arc::new(InMemoryStudentStore::demo()),
            runner.clone(),
        );
        let err = pipeline.run("alice", "2+2?", None).await.unwrap_err();
        assert!(matches!(err, TutorError::ConfigInvalid { .. }));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn configured_policy_reaches_access_control_trimmed() {
        let runner = Arc::new(
            ScriptedRunner::new()
                .reply("Guardrail check", r#"{"is_homework": true, "reasoning": "r"}"#)
                .reply("Classifier Agent", r#"{"subject": "math"}"#)
                .reply("Access Control Agent", r#"{"allowed": true, "reasoning": "ok"}"#)
                .reply("Math Tutor", "63"),
        );
        let pipeline = TutorPipeline::new(
            PipelineSettings::from_variant(Variant::Checked).with_policy("  Math only.  "),
            TutorAgents::standard(),
            Arc::new(InMemoryStudentStore::demo()),
            runner.clone(),
        );
        pipeline.run("alice", "What is 9 times 7?", None).await.unwrap();

        let input = runner.input_for("Access Control Agent").unwrap();
        assert!(input.starts_with("Policy: Math only.\n"));
    }

    #[tokio::test]
    async fn blank_policy_is_irrelevant_without_evaluation() {
        let runner = Arc::new(
            ScriptedRunner::new()
                .reply(
                    "Triage Agent",
                    r#"{"is_homework": true, "subject": "history", "reasoning": "r"}"#,
                )
                .reply("History Tutor", "In 1215."),
        );
        let report = pipeline(Variant::SubjectLocked, runner.clone())
            .run("bob", "When was the Magna Carta sealed?", Some("   "))
            .await
            .unwrap();
        assert!(report.outcome.is_answered());
        assert!(!report.invoked(Stage::AccessControl));
    }

    #[tokio::test]
    async fn handoff_routes_history_without_authorization() {
        let runner = Arc::new(
            ScriptedRunner::new()
                .reply(
                    "Triage Agent",
                    r#"{"is_homework": true, "subject": "history", "reasoning": "past events"}"#,
                )
                .reply("History Tutor", "  It began in 1789.\n"),
        );
        // alice is registered for math; handoff ignores that.
        let report = pipeline(Variant::Handoff, runner.clone())
            .run("alice", "When did the French Revolution begin?", None)
            .await
            .unwrap();

        assert_eq!(report.outcome.answer(), Some("It began in 1789."));
        assert_eq!(report.stages, [Stage::Triage, Stage::HistoryTutor]);
        assert_eq!(
            runner.input_for("Triage Agent").as_deref(),
            Some("When did the French Revolution begin?")
        );
    }

    #[tokio::test]
    async fn subject_locked_sends_registered_subject_as_context() {
        let runner = Arc::new(
            ScriptedRunner::new()
                .reply(
                    "Triage Agent",
                    r#"{"is_homework": true, "subject": "history", "reasoning": "r"}"#,
                )
                .reply("History Tutor", "Rome fell in 476."),
        );
        let report = pipeline(Variant::SubjectLocked, runner.clone())
            .run("bob", "When did Rome fall?", None)
            .await
            .unwrap();

        assert!(report.outcome.is_answered());
        assert_eq!(
            runner.input_for("Triage Agent").as_deref(),
            Some("Student registered subject: history\nQuestion: When did Rome fall?")
        );
    }

    #[tokio::test]
    async fn unsupported_subject_is_denied() {
        let runner = Arc::new(
            ScriptedRunner::new()
                .reply("Guardrail check", r#"{"is_homework": true, "reasoning": "r"}"#)
                .reply("Classifier Agent", r#"{"subject": "chemistry"}"#),
        );
        let report = pipeline(Variant::Checked, runner.clone())
            .run("alice", "Balance H2 + O2", None)
            .await
            .unwrap();

        assert_eq!(
            report.outcome,
            PipelineOutcome::Denied {
                reason: "unsupported subject 'chemistry'".into()
            }
        );
        assert!(!report.invoked(Stage::AccessControl));
        assert_eq!(report.tutor_calls(), 0);
    }

    #[tokio::test]
    async fn agent_failure_propagates() {
        let runner = Arc::new(
            ScriptedRunner::new()
                .reply("Guardrail check", r#"{"is_homework": true, "reasoning": "r"}"#)
                .reply("Classifier Agent", "I think it's math"),
        );
        let err = pipeline(Variant::Checked, runner)
            .run("alice", "2+2?", None)
            .await
            .unwrap_err();
        assert!(matches!(err, TutorError::InvalidOutput { .. }));
    }
}
