//! # tutor-types
//!
//! Core type definitions for the homework tutor pipeline.
//!
//! This crate is the foundation of the dependency graph -- every other
//! tutor crate depends on it. It contains:
//!
//! - **[`error`]** -- [`TutorError`] and the crate-wide [`Result`] alias
//! - **[`student`]** -- [`Subject`] and [`StudentRecord`]
//! - **[`verdict`]** -- Structured outputs produced by the decision stages
//! - **[`outcome`]** -- [`PipelineOutcome`], [`Stage`] and [`RunReport`]
//! - **[`config`]** -- Configuration schema and variant presets

pub mod config;
pub mod error;
pub mod outcome;
pub mod student;
pub mod verdict;

pub use config::{AuthorizationPolicy, PipelineSettings, RoutingMode, TutorConfig, Variant};
pub use error::{Result, TutorError};
pub use outcome::{PipelineOutcome, RunReport, Stage};
pub use student::{StudentRecord, Subject, UnsupportedSubject};
pub use verdict::{AccessVerdict, ClassificationVerdict, HomeworkVerdict, TriageVerdict};
