//! `tutor ask` -- run one question through the pipeline.
//!
//! Inputs not given as flags are read from stdin, in the order policy
//! (only when authorization is evaluated), student name, question.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Args;
use tracing::debug;
use tutor_core::{TutorAgents, TutorPipeline};
use tutor_types::{AuthorizationPolicy, RunReport, TutorError, Variant};

/// Arguments for the `tutor ask` subcommand.
#[derive(Args)]
pub struct AskArgs {
    /// Student name (looked up case-insensitively).
    #[arg(short, long)]
    pub student: Option<String>,

    /// The homework question.
    #[arg(short, long)]
    pub question: Option<String>,

    /// Natural-language access policy (evaluated authorization only).
    #[arg(short, long)]
    pub policy: Option<String>,

    /// Pipeline preset: checked, handoff or subject-locked.
    #[arg(long)]
    pub variant: Option<Variant>,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Run the `tutor ask` command.
pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let settings = match args.variant {
        Some(variant) => config.pipeline.settings_for(variant),
        None => config.pipeline.settings(),
    };
    debug!(
        routing = ?settings.routing,
        authorization = ?settings.authorization,
        "pipeline settings"
    );

    let store = super::open_store(&config).await?;
    let runner = super::build_runner(&config)?;
    let pipeline = TutorPipeline::new(settings, TutorAgents::standard(), store, Arc::new(runner));

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let needs_policy = pipeline.settings().authorization == AuthorizationPolicy::Evaluated
        && pipeline
            .settings()
            .policy
            .as_deref()
            .is_none_or(|p| p.trim().is_empty());
    let policy = match args.policy {
        Some(policy) => Some(policy),
        None if needs_policy => Some(prompt(&mut input, &mut output, "Enter the access policy: ")?),
        None => None,
    };
    let student = match args.student {
        Some(name) => name,
        None => prompt(&mut input, &mut output, "Enter student name: ")?,
    };
    let question = match args.question {
        Some(question) => question,
        None => prompt(&mut input, &mut output, "Enter your homework question: ")?,
    };
    drop(input);

    let name = normalize_student_name(&student);
    match pipeline.run(&name, &question, policy.as_deref()).await {
        Ok(report) => println!("{}", render_report(&report, &question)),
        Err(err @ TutorError::StudentNotFound(_)) => println!("{err}"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

/// Student names are stored lowercase.
pub fn normalize_student_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Operator output for a completed run. Only answered runs echo the question.
pub fn render_report(report: &RunReport, question: &str) -> String {
    if !report.outcome.is_answered() {
        return report.outcome.to_string();
    }
    format!(
        "{} (age {}) asked: {}\n{}",
        report.student.name, report.student.age, question, report.outcome
    )
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> anyhow::Result<String> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        anyhow::bail!("stdin closed while waiting for input");
    }
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_types::{PipelineOutcome, Stage, StudentRecord, Subject};
    use uuid::Uuid;

    #[test]
    fn student_names_are_lowercased_and_trimmed() {
        assert_eq!(normalize_student_name("  Alice \n"), "alice");
        assert_eq!(normalize_student_name("BOB"), "bob");
    }

    #[test]
    fn prompt_reads_one_trimmed_line() {
        let mut input = io::Cursor::new("Alice\nWhat is 9 times 7?\n");
        let mut output = Vec::new();

        let first = prompt(&mut input, &mut output, "Enter student name: ").unwrap();
        let second = prompt(&mut input, &mut output, "Enter your homework question: ").unwrap();

        assert_eq!(first, "Alice");
        assert_eq!(second, "What is 9 times 7?");
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Enter student name: Enter your homework question: "
        );
    }

    #[test]
    fn prompt_fails_on_closed_stdin() {
        let mut input = io::Cursor::new("");
        let mut output = Vec::new();
        assert!(prompt(&mut input, &mut output, "Enter student name: ").is_err());
    }

    #[test]
    fn answered_report_renders_two_lines() {
        let report = RunReport {
            run_id: Uuid::nil(),
            student: StudentRecord::new("alice", Subject::Math, 12),
            outcome: PipelineOutcome::Answered {
                subject: Subject::Math,
                text: "63".into(),
            },
            stages: vec![Stage::Guardrail, Stage::Classifier, Stage::AccessControl, Stage::MathTutor],
        };
        assert_eq!(
            render_report(&report, "What is 9 times 7?"),
            "alice (age 12) asked: What is 9 times 7?\nAnswer: 63"
        );
    }

    #[test]
    fn denied_report_renders_reason() {
        let report = RunReport {
            run_id: Uuid::nil(),
            student: StudentRecord::new("bob", Subject::History, 15),
            outcome: PipelineOutcome::Denied {
                reason: "bob is registered for history, not math".into(),
            },
            stages: vec![Stage::Triage],
        };
        assert_eq!(
            render_report(&report, "Solve for x: 2x=10"),
            "ACCESS DENIED: bob is registered for history, not math"
        );
    }

    #[test]
    fn blocked_report_omits_question_line() {
        let report = RunReport {
            run_id: Uuid::nil(),
            student: StudentRecord::new("alice", Subject::Math, 12),
            outcome: PipelineOutcome::Blocked {
                reason: "not homework".into(),
            },
            stages: vec![Stage::Guardrail],
        };
        assert_eq!(render_report(&report, "Tell me a joke"), "BLOCKED: not homework");
    }
}
