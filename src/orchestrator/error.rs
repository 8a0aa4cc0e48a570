// Sun Oct 18 2026 - Alex

use crate::record::RecordError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("{0}")]
    Usage(String),
    #[error("Cannot prepare run directory: {0}")]
    Setup(#[from] RecordError),
}

pub type RunResult<T> = Result<T, RunError>;
