//! Source construction error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while setting up a question source.
///
/// Failures while *fetching* are reported as `quizkit_core::FetchError` and
/// absorbed by the gateway; these are the ones that happen before that.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The configured base URL is not an http(s) URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// The configured data directory path is empty.
    #[error("data directory path is empty")]
    EmptyDataDir,

    /// The configured data path exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}
