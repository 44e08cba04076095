//! Error types for the fp-app service layer.

use std::path::PathBuf;

use fp_core::PanelId;

/// Application error type that wraps errors from the backend crates and
/// provides a single error interface for the CLI.
///
/// Styling problems are never errors here: they are logged and the run
/// continues. Only a missing target and file I/O fail a call.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Nothing to beautify: {reason}")]
    NoTarget { reason: String },

    #[error("Failed to read scene file: {path}")]
    SceneFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write scene file: {path}")]
    SceneFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse scene file {path}: {message}")]
    SceneParse { path: PathBuf, message: String },

    #[error("Unsupported scene file extension: {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Scene error: {0}")]
    Scene(String),

    #[error("Serialization failed: {0}")]
    Serialize(String),

    #[error("Config error: {0}")]
    Config(#[from] fp_config::ConfigError),

    #[error("Panel not found: {0}")]
    PanelNotFound(PanelId),

    #[error("Legend error: {0}")]
    Legend(String),

    #[error("Export failed: {message}")]
    Export { message: String },
}

pub type AppResult<T> = Result<T, AppError>;

impl From<fp_core::FpError> for AppError {
    fn from(err: fp_core::FpError) -> Self {
        AppError::Scene(err.to_string())
    }
}

impl From<fp_engine::LegendError> for AppError {
    fn from(err: fp_engine::LegendError) -> Self {
        AppError::Legend(err.to_string())
    }
}
