//! The individual pipeline stages.
//!
//! Each function issues exactly one agent call and returns its decoded
//! result. Branching on the result is the orchestrator's job.

use tutor_types::{
    AccessVerdict, ClassificationVerdict, HomeworkVerdict, Result, StudentRecord, Subject,
    TriageVerdict,
};

use crate::agents::AgentSpec;
use crate::runner::{AgentRunner, run_structured};

/// Is `question` a homework question?
pub async fn guardrail(
    runner: &dyn AgentRunner,
    agent: &AgentSpec,
    question: &str,
) -> Result<HomeworkVerdict> {
    run_structured(runner, agent, question).await
}

/// Homework check and subject routing in one call.
///
/// With `registered` set, the student's registered subject is sent along as
/// context.
pub async fn triage(
    runner: &dyn AgentRunner,
    agent: &AgentSpec,
    question: &str,
    registered: Option<Subject>,
) -> Result<TriageVerdict> {
    run_structured(runner, agent, &triage_input(question, registered)).await
}

/// Map the question to one subject.
pub async fn classify(
    runner: &dyn AgentRunner,
    agent: &AgentSpec,
    question: &str,
) -> Result<ClassificationVerdict> {
    run_structured(runner, agent, question).await
}

/// Evaluate a natural-language policy for this student and question subject.
pub async fn access_control(
    runner: &dyn AgentRunner,
    agent: &AgentSpec,
    policy: &str,
    student: &StudentRecord,
    question_subject: Subject,
) -> Result<AccessVerdict> {
    run_structured(
        runner,
        agent,
        &access_input(policy, student, question_subject),
    )
    .await
}

/// Answer the question. Free text, surfaced to the student as-is.
pub async fn tutor(runner: &dyn AgentRunner, agent: &AgentSpec, question: &str) -> Result<String> {
    let answer = runner.run(agent, question).await?;
    Ok(answer.trim().to_string())
}

pub fn triage_input(question: &str, registered: Option<Subject>) -> String {
    match registered {
        Some(subject) => format!("Student registered subject: {subject}\nQuestion: {question}"),
        None => question.to_string(),
    }
}

pub fn access_input(policy: &str, student: &StudentRecord, question_subject: Subject) -> String {
    format!(
        "Policy: {policy}\nStudent subject: {}\nStudent age: {}\nQuestion subject: {question_subject}",
        student.subject, student.age
    )
}
