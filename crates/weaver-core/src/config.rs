//! Configuration management for Weaver
//!
//! Provides run-level configuration: where generated projects land, loop
//! limits for the task iteration cycle, and model selection for the
//! external collaborator.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::Result;

/// Run-level Weaver configuration
///
/// Loaded from `.weaver/config.toml` in the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaverConfig {
    /// Directory under which generated project directories are created
    #[serde(default = "default_projects_root")]
    pub projects_root: PathBuf,

    /// Loop execution defaults
    #[serde(default)]
    pub loop_defaults: LoopDefaults,

    /// Model selection
    #[serde(default)]
    pub models: ModelConfig,
}

/// Default task iteration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopDefaults {
    /// Maximum iterations per task before giving up
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Maximum tokens per collaborator response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Per-call collaborator timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Default model to use
    #[serde(default = "default_model")]
    pub default: String,

    /// Environment variable containing the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

// Default value providers
fn default_projects_root() -> PathBuf {
    PathBuf::from("projects")
}

fn default_max_iterations() -> usize {
    10
}

fn default_max_tokens() -> usize {
    8192
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_model() -> String {
    "claude-sonnet-4".to_string()
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

impl WeaverConfig {
    /// Load configuration from `.weaver/config.toml` or use defaults
    pub fn load_or_default(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(".weaver/config.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content).map_err(|e| {
                crate::WeaverError::Config(format!("Failed to parse config file: {}", e))
            })?)
        } else {
            Ok(Self::default())
        }
    }

    /// Write default configuration to `.weaver/config.toml`
    pub fn write_default(work_dir: &Path) -> Result<()> {
        let config_dir = work_dir.join(".weaver");
        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| crate::WeaverError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

impl Default for WeaverConfig {
    fn default() -> Self {
        Self {
            projects_root: default_projects_root(),
            loop_defaults: LoopDefaults::default(),
            models: ModelConfig::default(),
        }
    }
}

impl Default for LoopDefaults {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            default: default_model(),
            api_key_env: default_api_key_env(),
        }
    }
}
