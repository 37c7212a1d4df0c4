use camino::Utf8PathBuf;
use thiserror::Error;

/// Run-level failures. Any of these aborts before a single solution is processed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("ignore pattern file {path} does not exist")]
    IgnorePatternFileUnavailable { path: Utf8PathBuf },

    #[error("invalid ignore pattern `{pattern}`: {message}")]
    InvalidIgnorePattern { pattern: String, message: String },

    #[error("target {path} does not exist")]
    TargetNotFound { path: Utf8PathBuf },

    #[error("solution discovery failed: {message}")]
    Discovery { message: String },

    #[error("worker pool: {message}")]
    WorkerPool { message: String },
}
