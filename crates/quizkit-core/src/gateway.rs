//! Failure-absorbing access to a [`QuestionSource`].
//!
//! The gateway is the only place where fetch errors are observed. Every
//! failure collapses to the built-in fallback set, so callers always receive
//! a [`QuestionSet`].

use std::sync::Arc;

use crate::error::FetchError;
use crate::model::{Choice, Question, QuestionSet, SetOrigin, SourceCatalog};
use crate::parser::normalize_records;
use crate::traits::QuestionSource;

/// Fetches named sets and normalizes them, substituting the fallback set on
/// any failure.
#[derive(Clone)]
pub struct Gateway {
    source: Arc<dyn QuestionSource>,
    catalog: SourceCatalog,
}

impl Gateway {
    pub fn new(source: Arc<dyn QuestionSource>, catalog: SourceCatalog) -> Self {
        Self { source, catalog }
    }

    pub fn catalog(&self) -> &SourceCatalog {
        &self.catalog
    }

    /// Fetch the set called `name`. Never fails.
    pub async fn fetch(&self, name: &str) -> QuestionSet {
        match self.try_fetch(name).await {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(
                    source = self.source.name(),
                    set = name,
                    "failed to load question set: {e}; using fallback questions"
                );
                fallback_set(name, &self.catalog.label_for(name))
            }
        }
    }

    async fn try_fetch(&self, name: &str) -> Result<QuestionSet, FetchError> {
        let records = self.source.fetch_raw(name).await?;
        let normalized = normalize_records(&records, name);
        if !normalized.dropped.is_empty() {
            tracing::warn!(
                set = name,
                dropped = normalized.dropped.len(),
                "skipped records without question text or answers"
            );
        }
        tracing::debug!(set = name, questions = normalized.questions.len(), "loaded question set");
        Ok(QuestionSet {
            name: name.to_string(),
            label: self.catalog.label_for(name),
            origin: SetOrigin::Fetched,
            questions: normalized.questions,
        })
    }
}

const FALLBACK_QUESTIONS: &[(&str, &[(&str, bool)])] = &[
    (
        "A Thruster malfunction may best be detected by observing which of the following?",
        &[
            ("A Thruster demand and feedback data.", true),
            ("B Power plant output.", false),
            ("C Noise and vibration levels from the thrusters.", false),
            ("D Thrust output over time.", false),
        ],
    ),
    (
        "During a Class 2 Operation, output from 1 of 2 bow tunnel thrusters is observed to be frozen at 30% thrust to Port. The DPO should:",
        &[
            ("A Stop DP operations and move the vessel to a safe location.", true),
            ("B Have the engineers stop the thruster and repair while DP operations continue.", false),
            ("C Do nothing as heading/position errors are within limits.", false),
            ("D Keep using the faulty thruster, monitor heading/position.", false),
        ],
    ),
    (
        "The data taken into the mathematical model for the vessel which is above the waterline is affected by?",
        &[
            ("A The direction of the vessel move.", false),
            ("B The speed of the vessel move.", false),
            ("C Heave and Pitch.", false),
            ("D The wind direction and strength in relation to the ship's head.", true),
        ],
    ),
    (
        "Which equipment is mandatory under SOLAS regulations? (Select all that apply)",
        &[
            ("A GMDSS equipment", true),
            ("B Life-saving appliances", true),
            ("C Swimming pool", false),
            ("D Fire detection systems", true),
            ("E Entertainment systems", false),
        ],
    ),
    (
        "What is the primary purpose of Dynamic Positioning (DP)?",
        &[
            ("A To maintain a vessel's position and heading automatically", true),
            ("B To increase vessel speed", false),
            ("C To reduce fuel consumption", false),
            ("D To improve crew comfort", false),
        ],
    ),
];

/// The built-in set served when `name` cannot be retrieved.
///
/// Content is identical for every source; ids are prefixed with `name` and
/// every question is tagged with `label`.
pub fn fallback_set(name: &str, label: &str) -> QuestionSet {
    let questions = FALLBACK_QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, (text, choices))| Question {
            id: format!("{}-{:03}", name, i + 1),
            source: label.to_string(),
            text: (*text).to_string(),
            choices: choices
                .iter()
                .map(|(label, correct)| Choice::new(*label, *correct))
                .collect(),
        })
        .collect();

    QuestionSet {
        name: name.to_string(),
        label: label.to_string(),
        origin: SetOrigin::Fallback,
        questions,
    }
}
