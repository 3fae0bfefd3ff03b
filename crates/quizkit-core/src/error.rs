//! Error types for question retrieval and session control.
//!
//! `FetchError` is produced by `QuestionSource` implementations and never
//! escapes the gateway. `SessionError` is what callers of the session state
//! machine actually observe.

use thiserror::Error;

/// Errors that can occur while retrieving a raw question set.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source could not be reached (connection refused, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The source answered with a non-success status.
    #[error("source returned HTTP {status}")]
    Status { status: u16 },

    /// No question set exists under the requested name.
    #[error("question set not found: {0}")]
    NotFound(String),

    /// The payload was not a JSON array of records.
    #[error("failed to parse question set: {0}")]
    Parse(String),

    /// A local read failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the session state machine and its inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The shuffled, sliced pool contained no questions.
    #[error("no questions available")]
    EmptyQuestionPool,

    /// A source selection could not be parsed.
    #[error("invalid source selection: {0:?}")]
    InvalidSelection(String),

    /// A test length option could not be parsed.
    #[error("invalid test length: {0:?} (expected \"30\", \"all\", or a positive number)")]
    InvalidLength(String),
}
