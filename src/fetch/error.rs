// Sun Oct 18 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("{source_id} error: unknown source")]
    UnknownSource { source_id: String },
    #[error("{source_id} error: missing API key (set {env_var})")]
    MissingKey { source_id: String, env_var: String },
    #[error("{source_id} error: failed to start command: {reason}")]
    Spawn { source_id: String, reason: String },
    #[error("{source_id} error: command exited with {status}")]
    CommandFailed { source_id: String, status: String },
    #[error("{source_id} error: {reason}")]
    Producer { source_id: String, reason: String },
    #[error("{source_id} error: cancelled before fetch")]
    Cancelled { source_id: String },
    #[error("{source_id} error: task panicked")]
    Panicked { source_id: String },
}

pub type FetchResult<T> = Result<T, FetchError>;
