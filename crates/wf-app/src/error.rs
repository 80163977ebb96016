//! Error types for the wf-app service layer.

use std::path::PathBuf;

/// Application error type wrapping the backend crates' errors behind one
/// interface for both CLI and GUI.
///
/// Everything that reaches a frontend as an `AppError` is fatal for the
/// requested operation. Engine and rendering failures are absorbed into
/// result statuses and panel diagnostics before they get here.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to read configuration file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write configuration file: {path}")]
    ConfigFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Configuration validation failed: {0}")]
    Validation(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for wf-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<wf_resource::ConfigurationError> for AppError {
    fn from(err: wf_resource::ConfigurationError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl From<wf_core::WfError> for AppError {
    fn from(err: wf_core::WfError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl From<wf_engine::EngineError> for AppError {
    fn from(err: wf_engine::EngineError) -> Self {
        AppError::Engine(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}
