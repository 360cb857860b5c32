//! Configuration schema types.
//!
//! All structs accept both `snake_case` and `camelCase` field names in JSON
//! via `#[serde(alias)]`, and every section has a default so an empty
//! object (or no file at all) is a valid configuration. Unknown fields are
//! silently ignored.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TutorError};

// ── Root config ──────────────────────────────────────────────────────────

/// Root configuration for the tutor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Model identifier, optionally prefixed with a provider
    /// (e.g. `"openai/gpt-4o-mini"`).
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature for every agent call.
    #[serde(default)]
    pub temperature: Option<f64>,

    /// Custom OpenAI-compatible endpoints. When empty the built-in provider
    /// table is used.
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,

    /// Student table location.
    #[serde(default)]
    pub students: StudentsConfig,

    /// Routing and authorization settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

fn default_model() -> String {
    "openai/gpt-4o-mini".into()
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: None,
            providers: Vec::new(),
            students: StudentsConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

/// A user-declared OpenAI-compatible endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub name: String,

    #[serde(alias = "baseUrl")]
    pub base_url: String,

    /// Environment variable holding the API key. Keys never live in config.
    #[serde(alias = "apiKeyEnv")]
    pub api_key_env: String,

    #[serde(default, alias = "modelPrefix")]
    pub model_prefix: Option<String>,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default, alias = "timeoutSecs")]
    pub timeout_secs: Option<u64>,
}

/// Student table settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentsConfig {
    /// Path of the SQLite database holding the `students` table.
    #[serde(default = "default_db_path", alias = "dbPath")]
    pub db_path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("students.db")
}

impl Default for StudentsConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

// ── Pipeline ─────────────────────────────────────────────────────────────

/// How the question subject is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingMode {
    /// A plain guardrail followed by a separate classifier call.
    Classifier,
    /// One triage call both validates the question and returns its subject.
    Triage,
}

/// Which rule decides whether a student may ask a classified question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorizationPolicy {
    /// A natural-language policy evaluated by the access-control agent.
    Evaluated,
    /// The question subject must equal the student's registered subject.
    SubjectMatch,
    /// No authorization stage; any homework question is answered.
    Open,
}

/// Named presets over [`RoutingMode`] and [`AuthorizationPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Guardrail, classifier, evaluated access control, tutor.
    #[default]
    Checked,
    /// Triage hands off to the tutor for the returned subject.
    Handoff,
    /// Triage, then an exact match against the registered subject.
    SubjectLocked,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Checked, Variant::Handoff, Variant::SubjectLocked];

    pub fn routing(&self) -> RoutingMode {
        match self {
            Variant::Checked => RoutingMode::Classifier,
            Variant::Handoff | Variant::SubjectLocked => RoutingMode::Triage,
        }
    }

    pub fn authorization(&self) -> AuthorizationPolicy {
        match self {
            Variant::Checked => AuthorizationPolicy::Evaluated,
            Variant::Handoff => AuthorizationPolicy::Open,
            Variant::SubjectLocked => AuthorizationPolicy::SubjectMatch,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Checked => "checked",
            Variant::Handoff => "handoff",
            Variant::SubjectLocked => "subject-locked",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| {
                format!(
                    "unknown variant '{s}' (expected one of: checked, handoff, subject-locked)"
                )
            })
    }
}

/// The `pipeline` config section.
///
/// `routing` and `authorization` override the chosen variant's preset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub variant: Variant,

    #[serde(default)]
    pub routing: Option<RoutingMode>,

    #[serde(default)]
    pub authorization: Option<AuthorizationPolicy>,

    /// Default policy text for [`AuthorizationPolicy::Evaluated`].
    #[serde(default)]
    pub policy: Option<String>,
}

impl PipelineConfig {
    /// Resolve the effective settings for this section.
    pub fn settings(&self) -> PipelineSettings {
        self.settings_for(self.variant)
    }

    /// Resolve settings as if `variant` had been configured, keeping any
    /// explicit overrides.
    pub fn settings_for(&self, variant: Variant) -> PipelineSettings {
        PipelineSettings {
            routing: self.routing.unwrap_or_else(|| variant.routing()),
            authorization: self.authorization.unwrap_or_else(|| variant.authorization()),
            policy: self.policy.clone(),
        }
    }
}

/// Resolved, immutable settings handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub routing: RoutingMode,
    pub authorization: AuthorizationPolicy,
    pub policy: Option<String>,
}

impl PipelineSettings {
    pub fn from_variant(variant: Variant) -> Self {
        Self {
            routing: variant.routing(),
            authorization: variant.authorization(),
            policy: None,
        }
    }

    pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = Some(policy.into());
        self
    }

    /// Policy text for an evaluated run: the per-run text wins over the
    /// configured default. Blank text counts as missing.
    pub fn evaluated_policy<'a>(&'a self, per_run: Option<&'a str>) -> Result<&'a str> {
        per_run
            .or(self.policy.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| TutorError::ConfigInvalid {
                reason: "evaluated authorization requires a policy".into(),
            })
    }
}
