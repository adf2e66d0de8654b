//! Error types for the code-refine crate.
//!
//! Only [`RefineError::Stage`] crosses the pipeline boundary. Score lookup
//! failures are absorbed by the ranker and never surface as errors, and
//! running out of request budget is not an error at all.

/// Errors that can occur while searching for or refining code search hits.
#[derive(Debug, thiserror::Error)]
pub enum RefineError {
    /// A pipeline stage could not produce output. Fatal to the invocation.
    #[error("stage `{stage}` failed: {source}")]
    Stage {
        /// Name of the stage that failed.
        stage: &'static str,
        /// The underlying cause.
        #[source]
        source: Box<RefineError>,
    },

    /// The request context was cancelled.
    #[error("request cancelled")]
    Cancelled,

    /// The request context deadline passed.
    #[error("request deadline exceeded")]
    DeadlineExceeded,

    /// An HTTP request to the remote API failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The remote API answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Request URL, without credentials.
        url: String,
    },

    /// The remote API response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl RefineError {
    /// Wrap `self` as a failure of the named stage.
    pub fn in_stage(self, stage: &'static str) -> Self {
        match self {
            already @ Self::Stage { .. } => already,
            other => Self::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Returns `true` if this error (or its stage cause) comes from an ended context.
    pub fn is_cancellation(&self) -> bool {
        match self {
            Self::Cancelled | Self::DeadlineExceeded => true,
            Self::Stage { source, .. } => source.is_cancellation(),
            _ => false,
        }
    }
}

/// Convenience type alias for code-refine results.
pub type Result<T> = std::result::Result<T, RefineError>;
