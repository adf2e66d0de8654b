//! Error types for the codesearch application.

use code_refine::RefineError;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Searching or refining failed.
    #[error(transparent)]
    Refine(#[from] RefineError),

    /// Configuration is invalid or could not be read.
    #[error("config error: {0}")]
    Config(String),

    /// The GitHub access token environment variable is not set.
    #[error("missing environment variable {0}")]
    MissingToken(&'static str),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;
