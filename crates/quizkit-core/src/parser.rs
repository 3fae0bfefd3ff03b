//! Question record normalization and set validation.
//!
//! Raw records follow the loose data contract
//! `{ id, source?, question, answers?: [{ text, correct }] }`. This module
//! turns them into strict [`Question`] values, filling defaults once, and
//! checks loaded sets for common authoring mistakes.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::model::{Choice, Question, QuestionSet, SetOrigin};
use crate::traits::records_from_json;

/// Result of normalizing a batch of raw records.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub questions: Vec<Question>,
    /// Positions (0-based) of records dropped for having no usable content.
    pub dropped: Vec<usize>,
}

/// Normalize one raw record taken from set `set_name` at `position`.
///
/// Returns `None` when the record has neither a question text nor any usable
/// choice.
pub fn normalize_record(record: &Value, set_name: &str, position: usize) -> Option<Question> {
    let text = record.get("question").and_then(Value::as_str);
    let choices: Vec<Choice> = match record.get("answers") {
        Some(Value::Array(answers)) => answers.iter().filter_map(normalize_choice).collect(),
        _ => Vec::new(),
    };

    if text.is_none() && choices.is_empty() {
        return None;
    }

    let id = match record.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => format!("{}-{:03}", set_name, position + 1),
    };

    let source = match record.get("source") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => set_name.to_string(),
    };

    Some(Question {
        id,
        source,
        text: text.unwrap_or_default().to_string(),
        choices,
    })
}

fn normalize_choice(answer: &Value) -> Option<Choice> {
    let answer = answer.as_object()?;
    let label = answer
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let is_correct = answer
        .get("correct")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Some(Choice::new(label, is_correct))
}

/// Normalize every record of a set, keeping order and noting dropped ones.
pub fn normalize_records(records: &[Value], set_name: &str) -> Normalized {
    let mut normalized = Normalized::default();
    for (position, record) in records.iter().enumerate() {
        match normalize_record(record, set_name, position) {
            Some(question) => normalized.questions.push(question),
            None => {
                tracing::debug!(set = set_name, position, "dropping record with no usable content");
                normalized.dropped.push(position);
            }
        }
    }
    normalized
}

/// Encode a question in the `{ id, source, question, answers }` data
/// contract, the inverse of [`normalize_record`].
pub fn question_to_record(question: &Question) -> Value {
    serde_json::json!({
        "id": question.id,
        "source": question.source,
        "question": question.text,
        "answers": question
            .choices
            .iter()
            .map(|c| serde_json::json!({"text": c.label, "correct": c.is_correct}))
            .collect::<Vec<_>>(),
    })
}

/// Logical set name of a file: its stem (`data/NI.json` → `NI`).
pub fn set_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse a JSON question-set file from disk.
pub fn parse_question_file(path: &Path) -> Result<(QuestionSet, Vec<usize>)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question set file: {}", path.display()))?;
    parse_question_set_str(&content, &set_name_from_path(path))
        .with_context(|| format!("failed to parse question set: {}", path.display()))
}

/// Parse a JSON payload into a set named `set_name`.
///
/// Returns the set together with the positions of dropped records.
pub fn parse_question_set_str(content: &str, set_name: &str) -> Result<(QuestionSet, Vec<usize>)> {
    let records = records_from_json(content)?;
    let normalized = normalize_records(&records, set_name);
    let set = QuestionSet {
        name: set_name.to_string(),
        label: set_name.to_string(),
        origin: SetOrigin::Fetched,
        questions: normalized.questions,
    };
    Ok((set, normalized.dropped))
}

/// Recursively collect all `.json` question-set files under a directory.
pub fn find_question_files(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(find_question_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// A warning from question-set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question set for common issues.
pub fn validate_question_set(set: &QuestionSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for question in &set.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question ID: {}", question.id),
            });
        }
    }

    for question in &set.questions {
        let id = Some(question.id.clone());
        if question.text.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: id.clone(),
                message: "question text is empty".into(),
            });
        }
        if question.choices.len() < 2 {
            warnings.push(ValidationWarning {
                question_id: id.clone(),
                message: format!("only {} choice(s)", question.choices.len()),
            });
        }
        if question.correct_count() == 0 {
            warnings.push(ValidationWarning {
                question_id: id,
                message: "no choice is marked correct; it can never be answered correctly".into(),
            });
        }
    }

    warnings
}
