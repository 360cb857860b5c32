//! # tutor-core
//!
//! The homework tutor pipeline: student lookup, agent definitions, the
//! agent runner, the individual stages and the orchestrator that chains
//! them.
//!
//! - **[`store`]** -- [`StudentStore`](store::StudentStore) with SQLite and in-memory tables
//! - **[`agents`]** -- Immutable agent definitions ([`TutorAgents`](agents::TutorAgents))
//! - **[`runner`]** -- [`AgentRunner`](runner::AgentRunner) and the provider-backed [`LlmRunner`](runner::LlmRunner)
//! - **[`stages`]** -- One external call per stage
//! - **[`policy`]** -- Local authorization rules
//! - **[`pipeline`]** -- [`TutorPipeline`](pipeline::TutorPipeline)
//!
//! The `test-utils` feature exposes `testing::ScriptedRunner`.

pub mod agents;
pub mod json_repair;
pub mod pipeline;
pub mod policy;
pub mod runner;
pub mod stages;
pub mod store;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use agents::{AgentSpec, TutorAgents};
pub use pipeline::TutorPipeline;
pub use runner::{AgentRunner, LlmRunner};
pub use store::{InMemoryStudentStore, SqliteStudentStore, StudentStore};
