//! Core data model types for quizkit.
//!
//! Questions and choices are strict structures; every default is filled in
//! once, when raw records are normalized by the gateway.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Number of questions in a short test.
pub const SHORT_TEST_LENGTH: usize = 30;

/// A single answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Text shown to the user.
    pub label: String,
    /// Whether selecting this choice is part of the correct answer.
    pub is_correct: bool,
}

impl Choice {
    pub fn new(label: impl Into<String>, is_correct: bool) -> Self {
        Self {
            label: label.into(),
            is_correct,
        }
    }
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within a loaded pool.
    pub id: String,
    /// Human-readable origin of the question.
    pub source: String,
    /// The question prompt.
    pub text: String,
    /// Ordered answer options. Selection is by index into this list.
    pub choices: Vec<Choice>,
}

/// How a question expects its choices to be picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Exactly one correct choice: picking replaces the selection.
    Single,
    /// Zero or several correct choices: picking toggles membership.
    Multiple,
}

impl Question {
    /// Number of choices flagged correct.
    pub fn correct_count(&self) -> usize {
        self.choices.iter().filter(|c| c.is_correct).count()
    }

    /// Indices of all correct choices, ascending.
    pub fn correct_indices(&self) -> BTreeSet<usize> {
        self.choices
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_correct)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn selection_mode(&self) -> SelectionMode {
        if self.correct_count() == 1 {
            SelectionMode::Single
        } else {
            SelectionMode::Multiple
        }
    }
}

/// Where a question set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetOrigin {
    Fetched,
    Fallback,
}

/// A named, ordered collection of questions from one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    /// Logical source name (e.g. "NI").
    pub name: String,
    /// Human-readable label (e.g. "Nautical Institute").
    pub label: String,
    pub origin: SetOrigin,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionSet {
    pub fn is_fallback(&self) -> bool {
        self.origin == SetOrigin::Fallback
    }
}

/// The user's confirmed answer to one position of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Position in the session's question sequence.
    pub question_index: usize,
    pub selected_indices: BTreeSet<usize>,
    pub is_correct: bool,
}

/// A source that the aggregator knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownSource {
    /// Logical name, also the file stem of the set (e.g. "NI" for `NI.json`).
    pub name: String,
    /// Human-readable label used for fallback questions.
    pub label: String,
}

impl KnownSource {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// Ordered list of known sources. Order defines the "all sources"
/// concatenation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceCatalog {
    sources: Vec<KnownSource>,
}

impl SourceCatalog {
    pub fn new(sources: Vec<KnownSource>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[KnownSource] {
        &self.sources
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&KnownSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Human-readable label for `name`, or the name itself when it is not
    /// catalogued.
    pub fn label_for(&self, name: &str) -> String {
        self.get(name)
            .map(|s| s.label.clone())
            .unwrap_or_else(|| name.to_string())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for SourceCatalog {
    fn default() -> Self {
        Self::new(vec![
            KnownSource::new("NI", "Nautical Institute"),
            KnownSource::new("K", "Kelson"),
            KnownSource::new("EX", "Exam"),
        ])
    }
}

/// Which question sets a session draws from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceSelection {
    /// Every catalogued source, in catalog order.
    All,
    /// One named source.
    Named(String),
}

impl fmt::Display for SourceSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSelection::All => write!(f, "ALL"),
            SourceSelection::Named(name) => write!(f, "{name}"),
        }
    }
}

impl FromStr for SourceSelection {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SessionError::InvalidSelection(s.to_string()));
        }
        if trimmed.eq_ignore_ascii_case("all") {
            Ok(SourceSelection::All)
        } else {
            Ok(SourceSelection::Named(trimmed.to_string()))
        }
    }
}

/// How many questions a session contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestLength {
    /// The first `n` questions after shuffling, or fewer if the pool is smaller.
    Limited(usize),
    /// The entire shuffled pool.
    All,
}

impl TestLength {
    /// Number of questions to keep from a pool of `pool_len`.
    pub fn take_from(&self, pool_len: usize) -> usize {
        match self {
            TestLength::Limited(n) => (*n).min(pool_len),
            TestLength::All => pool_len,
        }
    }
}

impl Default for TestLength {
    fn default() -> Self {
        TestLength::Limited(SHORT_TEST_LENGTH)
    }
}

impl fmt::Display for TestLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestLength::Limited(n) => write!(f, "{n}"),
            TestLength::All => write!(f, "all"),
        }
    }
}

impl FromStr for TestLength {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(TestLength::All);
        }
        match trimmed.parse::<usize>() {
            Ok(n) if n > 0 => Ok(TestLength::Limited(n)),
            _ => Err(SessionError::InvalidLength(s.to_string())),
        }
    }
}
