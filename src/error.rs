//! Error types for ur5e-pilot
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur while dispatching pipeline commands
#[derive(Debug, Error)]
pub enum PilotError {
    /// Required external program is not on the search path
    #[error("Required tool '{0}' not found on PATH")]
    ToolNotFound(String),

    /// Menu input that maps to no choice
    #[error("Invalid choice: {0}")]
    InvalidChoice(String),

    /// External program ran but did not succeed
    #[error("{program} exited with {status}")]
    SubprocessFailed { program: String, status: String },

    /// Configuration rejected by validation
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for ur5e-pilot operations
pub type Result<T> = std::result::Result<T, PilotError>;
