//! Crate-level error types.

use thiserror::Error;

/// Errors surfaced to the caller before or instead of a search outcome.
///
/// Running out of rounds is not an error: it is reported as
/// [`SearchOutcome::Exhausted`](crate::orchestrator::SearchOutcome::Exhausted).
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SearchError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SearchError::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
