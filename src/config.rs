//! Configuration loading and credential resolution.
//!
//! An optional `config.toml` supplies defaults for the model and output
//! formatting. The API credential is resolved once, at construction time,
//! in a fixed order: explicit parameter, then provider env vars, then the
//! config file. There is no hard-coded fallback key.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::types::AgentError;

pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";
pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LlmConfig {
    /// Default model when the caller names none.
    #[serde(default)]
    pub model: Option<String>,
    /// Literal key in the config file — lowest-priority credential source.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_table_width")]
    pub table_width: usize,
    #[serde(default = "default_max_scenarios")]
    pub max_bid_scenarios: usize,
}

fn default_table_width() -> usize {
    80
}

fn default_max_scenarios() -> usize {
    5
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            table_width: default_table_width(),
            max_bid_scenarios: default_max_scenarios(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file. A missing file is not an
    /// error — the config is entirely optional.
    pub fn load(path: &Path) -> Result<Option<Self>, AgentError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file; using defaults");
            return Ok(None);
        }
        let contents = fs::read_to_string(path).map_err(|e| {
            AgentError::Configuration(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config: AppConfig = toml::from_str(&contents).map_err(|e| {
            AgentError::Configuration(format!("Failed to parse {}: {e}", path.display()))
        })?;
        Ok(Some(config))
    }
}

/// Resolve the API credential: explicit parameter, then `OPENAI_API_KEY`,
/// then `GEMINI_API_KEY`, then the config-file value.
pub fn resolve_api_key(
    explicit: Option<String>,
    config: Option<&AppConfig>,
) -> Result<String, AgentError> {
    if let Some(key) = explicit.filter(|k| !k.is_empty()) {
        return Ok(key);
    }
    for env_name in [OPENAI_KEY_ENV, GEMINI_KEY_ENV] {
        if let Ok(key) = std::env::var(env_name) {
            if !key.is_empty() {
                debug!(env = env_name, "Using API key from environment");
                return Ok(key);
            }
        }
    }
    if let Some(key) = config
        .and_then(|c| c.llm.api_key.clone())
        .filter(|k| !k.is_empty())
    {
        debug!("Using API key from config file");
        return Ok(key);
    }
    Err(AgentError::Configuration(format!(
        "API key required: pass one explicitly, set {OPENAI_KEY_ENV} or {GEMINI_KEY_ENV}, \
         or set llm.api_key in config.toml"
    )))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
