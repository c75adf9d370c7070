//! Unified error types for Weaver

use thiserror::Error;

/// Unified error type for all Weaver operations
#[derive(Error, Debug)]
pub enum WeaverError {
    // Collaborator errors
    #[error("Agent call failed: {0}")]
    Agent(String),

    #[error("Agent call timed out after {0}s")]
    AgentTimeout(u64),

    #[error("API limit reached: {0}")]
    ApiLimit(String),

    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    // Planning errors
    #[error("Plan error: {0}")]
    Plan(String),

    // Project directory errors
    #[error("Project directory error: {0}")]
    Project(String),

    // File materialization errors
    #[error("Path validation failed: {0}")]
    PathValidation(String),

    #[error("File write failed for {path}: {reason}")]
    FileWrite { path: String, reason: String },

    // Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

/// Result type alias using WeaverError
pub type Result<T> = std::result::Result<T, WeaverError>;
