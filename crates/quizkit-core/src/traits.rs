//! Core trait definition for question sources.
//!
//! Implemented by the `quizkit-sources` crate (HTTP, directory, mock).

use async_trait::async_trait;

use crate::error::FetchError;

/// A backend that can retrieve raw question records by set name.
///
/// Implementations return the records exactly as stored: a JSON array of
/// loosely-shaped objects. Normalization into [`crate::model::Question`]
/// happens in the gateway, never in the source.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable backend name (e.g. "http").
    fn name(&self) -> &str;

    /// Fetch the raw records of the set called `set_name`.
    async fn fetch_raw(&self, set_name: &str) -> Result<Vec<serde_json::Value>, FetchError>;
}

/// Interpret a payload as the top-level array of records a set consists of.
pub fn records_from_json(payload: &str) -> Result<Vec<serde_json::Value>, FetchError> {
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| FetchError::Parse(e.to_string()))?;
    match value {
        serde_json::Value::Array(records) => Ok(records),
        other => Err(FetchError::Parse(format!(
            "expected a JSON array of questions, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
