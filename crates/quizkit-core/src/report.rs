//! Serializable summary of a quiz run.
//!
//! Reports are handed to the presentation layer for display or export; the
//! engine does not store them anywhere.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary of one run of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub run_id: Uuid,
    /// Source selection the run was started with ("ALL" or a source name).
    pub selection: String,
    /// Length option the run was started with ("30", "all", ...).
    pub length: String,
    pub started_at: DateTime<Utc>,
    /// Set when the run first reached the results phase.
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    /// `correct / total`.
    pub score: f64,
    #[serde(default)]
    pub fallback_sources: Vec<String>,
    pub answers: Vec<AnswerSummary>,
}

/// One row of a [`SessionReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerSummary {
    pub position: usize,
    pub question_id: String,
    pub source: String,
    /// Selected choice indices; empty when unanswered.
    pub selected: BTreeSet<usize>,
    /// Indices of the correct choices.
    pub correct: BTreeSet<usize>,
    /// `None` when the question was never confirmed.
    pub is_correct: Option<bool>,
}

impl SessionReport {
    /// Score as a percentage, rounded to one decimal.
    pub fn percentage(&self) -> f64 {
        (self.score * 1000.0).round() / 10.0
    }

    /// Confirmed answers that were wrong.
    pub fn incorrect(&self) -> usize {
        self.answered.saturating_sub(self.correct)
    }

    /// Questions never confirmed.
    pub fn unanswered(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(total: usize, answered: usize, correct: usize) -> SessionReport {
        SessionReport {
            run_id: Uuid::nil(),
            selection: "K".into(),
            length: "30".into(),
            started_at: Utc::now(),
            finished_at: None,
            total,
            answered,
            correct,
            score: correct as f64 / total as f64,
            fallback_sources: vec![],
            answers: vec![],
        }
    }

    #[test]
    fn derived_counts() {
        let r = report(5, 2, 1);
        assert_eq!(r.incorrect(), 1);
        assert_eq!(r.unanswered(), 3);
        assert_eq!(r.percentage(), 20.0);
        assert_eq!(report(3, 3, 2).percentage(), 66.7);
    }

    #[test]
    fn inconsistent_counts_do_not_underflow() {
        let mut value = serde_json::to_value(report(2, 3, 1)).unwrap();
        value["correct"] = serde_json::json!(4);
        let r: SessionReport = serde_json::from_value(value).unwrap();
        assert_eq!(r.incorrect(), 0);
        assert_eq!(r.unanswered(), 0);
    }

    #[test]
    fn serializes_index_sets_in_order() {
        let mut r = report(1, 1, 0);
        r.answers.push(AnswerSummary {
            position: 0,
            question_id: "K-001".into(),
            source: "Kelson".into(),
            selected: [3, 0, 1].into_iter().collect(),
            correct: [0].into_iter().collect(),
            is_correct: Some(false),
        });
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["answers"][0]["selected"], serde_json::json!([0, 1, 3]));
        assert_eq!(json["answers"][0]["is_correct"], false);
        assert!(json["finished_at"].is_null());
    }
}
