//! Error types shared by the search engine, the puzzle rules and map loading.
//!
//! Exhaustion of the state space is not an error: it is reported through
//! [`crate::solver::Termination::Exhausted`].

use thiserror::Error;

/// Raised by [`crate::queue::OpenList::extract_min`] on an empty open list.
///
/// The solver always checks `is_empty()` before extracting, so this never
/// reaches a caller of the search functions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("extract_min called on an empty open list")]
pub struct EmptyQueueError;

/// A move generator produced a successor that breaks its own invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed state: {reason}")]
pub struct MalformedStateError {
    pub reason: String,
}

impl MalformedStateError {
    pub fn new(reason: impl Into<String>) -> Self {
        MalformedStateError {
            reason: reason.into(),
        }
    }
}

/// Failures that abort a search run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error(transparent)]
    MalformedState(#[from] MalformedStateError),
}

/// Errors that can occur while loading or parsing a puzzle map.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse map JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid map: {0}")]
    InvalidMap(String),
}
