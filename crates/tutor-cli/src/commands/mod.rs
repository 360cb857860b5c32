//! CLI command implementations for `tutor`.
//!
//! - [`ask`] -- One question through the pipeline.
//! - [`students`] -- Student table inspection and seeding.

pub mod ask;
pub mod students;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;
use tutor_core::{LlmRunner, SqliteStudentStore};
use tutor_llm::{LlmProviderConfig, ProviderRouter};
use tutor_types::TutorConfig;
use tutor_types::config::ProviderEntry;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TUTOR_CONFIG";

/// Find the config file to load, if any.
///
/// 1. `TUTOR_CONFIG` env var (returned even if the file is missing)
/// 2. `~/.tutor/config.json` if it exists
pub fn discover_config_path(env_path: Option<String>, home: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = env_path.filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    let candidate = home?.join(".tutor").join("config.json");
    candidate.exists().then_some(candidate)
}

/// Load configuration from the given path override or via auto-discovery.
///
/// Returns a default [`TutorConfig`] if no config file is found.
pub fn load_config(config_override: Option<&str>) -> anyhow::Result<TutorConfig> {
    let path = match config_override {
        Some(path_str) => {
            let path = PathBuf::from(path_str);
            if !path.exists() {
                anyhow::bail!("config file not found: {path_str}");
            }
            Some(path)
        }
        None => discover_config_path(std::env::var(CONFIG_ENV).ok(), dirs::home_dir()),
    };

    match path {
        Some(path) => read_config(&path),
        None => {
            debug!("no config file found, using defaults");
            Ok(TutorConfig::default())
        }
    }
}

fn read_config(path: &Path) -> anyhow::Result<TutorConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config {}: {e}", path.display()))?;
    let config: TutorConfig = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config {}: {e}", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn provider_config(entry: &ProviderEntry) -> LlmProviderConfig {
    LlmProviderConfig {
        name: entry.name.clone(),
        base_url: entry.base_url.clone(),
        api_key_env: entry.api_key_env.clone(),
        model_prefix: entry.model_prefix.clone(),
        headers: entry.headers.clone(),
        timeout_secs: entry.timeout_secs,
    }
}

/// Build the provider router: configured endpoints if any, otherwise the
/// built-in table.
pub fn build_router(config: &TutorConfig) -> ProviderRouter {
    if config.providers.is_empty() {
        ProviderRouter::with_builtins()
    } else {
        ProviderRouter::from_configs(config.providers.iter().map(provider_config).collect())
    }
}

/// Resolve the configured model to a provider and wrap it in a runner.
pub fn build_runner(config: &TutorConfig) -> anyhow::Result<LlmRunner> {
    let router = build_router(config);
    let (provider, model) = router
        .route(&config.model)
        .ok_or_else(|| anyhow::anyhow!("no provider configured for model '{}'", config.model))?;
    debug!(provider = %provider.name(), model = %model, "resolved model");
    Ok(LlmRunner::new(provider, model).with_temperature(config.temperature))
}

/// Open the student table, creating it if needed.
pub async fn open_store(config: &TutorConfig) -> anyhow::Result<Arc<SqliteStudentStore>> {
    let store = SqliteStudentStore::new(&config.students.db_path);
    store.init().await?;
    Ok(Arc::new(store))
}
