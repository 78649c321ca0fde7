//! Error types for the av-app service layer.

use std::path::PathBuf;

/// Application error type that wraps the errors of the pipeline crates and
/// gives the CLI a single error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Case error: {0}")]
    Case(String),

    #[error("Failed to read case file: {path}")]
    CaseFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write case file: {path}")]
    CaseFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Case validation failed: {0}")]
    Validation(String),

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Comparison error: {0}")]
    Compare(String),

    #[error("Numeric error: {0}")]
    Numeric(String),

    #[error("Reference `{id}` is not defined")]
    UnknownReference { id: String },

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for av-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<av_geometry::GeometryError> for AppError {
    fn from(err: av_geometry::GeometryError) -> Self {
        AppError::Geometry(err.to_string())
    }
}

impl From<av_script::ScriptError> for AppError {
    fn from(err: av_script::ScriptError) -> Self {
        AppError::Script(err.to_string())
    }
}

impl From<av_results::ResultsError> for AppError {
    fn from(err: av_results::ResultsError) -> Self {
        match err {
            av_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}

impl From<av_compare::CompareError> for AppError {
    fn from(err: av_compare::CompareError) -> Self {
        AppError::Compare(err.to_string())
    }
}

impl From<av_core::AvError> for AppError {
    fn from(err: av_core::AvError) -> Self {
        AppError::Numeric(err.to_string())
    }
}

impl From<crate::validate::ValidationError> for AppError {
    fn from(err: crate::validate::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}
