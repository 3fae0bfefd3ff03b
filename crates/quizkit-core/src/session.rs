//! The quiz session state machine.
//!
//! A [`Session`] moves through `Setup → InProgress → Results` and back. The
//! per-run fields (questions, cursor, pending selection, answer records) only
//! exist while a run does, inside the `InProgress` and `Results` variants,
//! and are reachable through accessor methods alone.
//!
//! Every operation is total: calls that do not apply to the current phase or
//! position are no-ops. The only failure reported to callers is
//! [`SessionError::EmptyQuestionPool`] from [`Session::start`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregator::Aggregator;
use crate::error::SessionError;
use crate::model::{AnswerRecord, Question, SelectionMode, SourceSelection, TestLength};
use crate::report::{AnswerSummary, SessionReport};
use crate::shuffle::Shuffler;
use crate::validator::evaluate;

/// Observable lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    InProgress,
    Results,
}

#[derive(Debug, Clone)]
struct Run {
    questions: Vec<Question>,
    cursor: usize,
    pending: BTreeSet<usize>,
    answered: BTreeMap<usize, AnswerRecord>,
    correct_count: usize,
    answered_count: usize,
    selection: SourceSelection,
    length: TestLength,
    fallback_sources: Vec<String>,
    run_id: Uuid,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl Run {
    fn current(&self) -> &Question {
        &self.questions[self.cursor]
    }

    fn is_locked(&self) -> bool {
        self.answered.contains_key(&self.cursor)
    }

    /// Move to `cursor` and restore whatever was recorded there.
    fn arrive(&mut self, cursor: usize) {
        self.cursor = cursor;
        self.pending = self
            .answered
            .get(&cursor)
            .map(|record| record.selected_indices.clone())
            .unwrap_or_default();
    }

    fn toggle(&mut self, index: usize) {
        if self.is_locked() || index >= self.current().choices.len() {
            return;
        }
        match self.current().selection_mode() {
            SelectionMode::Single => {
                self.pending.clear();
                self.pending.insert(index);
            }
            SelectionMode::Multiple => {
                if !self.pending.remove(&index) {
                    self.pending.insert(index);
                }
            }
        }
    }

    fn confirm(&mut self) -> Option<&AnswerRecord> {
        if self.pending.is_empty() || self.is_locked() {
            return None;
        }
        let is_correct = evaluate(self.current(), &self.pending);
        let record = AnswerRecord {
            question_index: self.cursor,
            selected_indices: self.pending.clone(),
            is_correct,
        };
        self.answered_count += 1;
        if is_correct {
            self.correct_count += 1;
        }
        tracing::debug!(
            position = self.cursor,
            question = %self.current().id,
            is_correct,
            "answer confirmed"
        );
        self.answered.insert(self.cursor, record);
        self.answered.get(&self.cursor)
    }
}

#[derive(Debug, Clone)]
enum State {
    Setup,
    InProgress(Run),
    Results(Run),
}

/// One user's quiz session.
pub struct Session {
    aggregator: Aggregator,
    shuffler: Shuffler,
    state: State,
}

impl Session {
    pub fn new(aggregator: Aggregator, shuffler: Shuffler) -> Self {
        Self {
            aggregator,
            shuffler,
            state: State::Setup,
        }
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Build a fresh run from `selection`, shuffled and sliced to `length`.
    ///
    /// A blank source name or a zero length is rejected before anything
    /// else happens. Otherwise any previous run is discarded first; if no
    /// questions remain the session stays in `Setup` and
    /// `EmptyQuestionPool` is returned.
    pub async fn start(
        &mut self,
        selection: SourceSelection,
        length: TestLength,
    ) -> Result<(), SessionError> {
        if let SourceSelection::Named(name) = &selection {
            if name.trim().is_empty() {
                return Err(SessionError::InvalidSelection(name.clone()));
            }
        }
        if length == TestLength::Limited(0) {
            return Err(SessionError::InvalidLength(length.to_string()));
        }

        self.reset();

        let pool = self.aggregator.load_pool(&selection).await;
        let mut questions = self.shuffler.shuffle(&pool.questions);
        questions.truncate(length.take_from(questions.len()));

        if questions.is_empty() {
            tracing::warn!(selection = %selection, "no questions available");
            return Err(SessionError::EmptyQuestionPool);
        }

        tracing::info!(
            selection = %selection,
            length = %length,
            questions = questions.len(),
            "starting quiz"
        );
        self.set_state(State::InProgress(Run {
            questions,
            cursor: 0,
            pending: BTreeSet::new(),
            answered: BTreeMap::new(),
            correct_count: 0,
            answered_count: 0,
            selection,
            length,
            fallback_sources: pool.fallback_sources,
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
        }));
        Ok(())
    }

    /// Select or deselect choice `index` of the current question.
    ///
    /// Single-answer questions replace the selection; others toggle
    /// membership. Ignored on locked positions and out-of-range indices.
    pub fn toggle_choice(&mut self, index: usize) {
        if let State::InProgress(run) = &mut self.state {
            run.toggle(index);
        }
    }

    /// Lock in the pending selection for the current position.
    ///
    /// Returns the new record, or `None` when nothing was recorded (empty
    /// selection, already answered, or no run in progress).
    pub fn confirm(&mut self) -> Option<&AnswerRecord> {
        match &mut self.state {
            State::InProgress(run) => run.confirm(),
            _ => None,
        }
    }

    /// Advance to the next question; no-op on the last one.
    pub fn next(&mut self) {
        if let State::InProgress(run) = &mut self.state {
            if run.cursor + 1 < run.questions.len() {
                run.arrive(run.cursor + 1);
            }
        }
    }

    /// Go back to the previous question; no-op on the first one.
    pub fn previous(&mut self) {
        if let State::InProgress(run) = &mut self.state {
            if run.cursor > 0 {
                run.arrive(run.cursor - 1);
            }
        }
    }

    /// Show results. Unanswered questions simply stay unanswered.
    pub fn finish(&mut self) {
        if let State::InProgress(_) = self.state {
            if let State::InProgress(mut run) = std::mem::replace(&mut self.state, State::Setup) {
                run.finished_at.get_or_insert_with(Utc::now);
                self.set_state(State::Results(run));
            }
        }
    }

    /// Walk back through the answered test from the first question.
    pub fn review(&mut self) {
        if let State::Results(_) = self.state {
            if let State::Results(mut run) = std::mem::replace(&mut self.state, State::Setup) {
                run.arrive(0);
                self.set_state(State::InProgress(run));
            }
        }
    }

    /// Drop the current run, if any, and return to `Setup`.
    pub fn reset(&mut self) {
        if !matches!(self.state, State::Setup) {
            self.set_state(State::Setup);
        }
    }

    fn set_state(&mut self, state: State) {
        self.state = state;
        tracing::info!("entering quiz phase: {:?}", self.phase());
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    fn run(&self) -> Option<&Run> {
        match &self.state {
            State::Setup => None,
            State::InProgress(run) | State::Results(run) => Some(run),
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Setup => Phase::Setup,
            State::InProgress(_) => Phase::InProgress,
            State::Results(_) => Phase::Results,
        }
    }

    /// Questions of the current run, in test order.
    pub fn questions(&self) -> &[Question] {
        self.run().map(|r| r.questions.as_slice()).unwrap_or_default()
    }

    /// Number of questions in the current run.
    pub fn len(&self) -> usize {
        self.questions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Only meaningful while a quiz is in progress.
    pub fn cursor(&self) -> Option<usize> {
        match &self.state {
            State::InProgress(run) => Some(run.cursor),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            State::InProgress(run) => Some(run.current()),
            _ => None,
        }
    }

    pub fn selection_mode(&self) -> Option<SelectionMode> {
        self.current_question().map(Question::selection_mode)
    }

    /// Whether the current position already has an answer record.
    pub fn is_locked(&self) -> bool {
        match &self.state {
            State::InProgress(run) => run.is_locked(),
            _ => false,
        }
    }

    pub fn pending_selection(&self) -> Option<&BTreeSet<usize>> {
        match &self.state {
            State::InProgress(run) => Some(&run.pending),
            _ => None,
        }
    }

    pub fn answer_at(&self, position: usize) -> Option<&AnswerRecord> {
        self.run().and_then(|r| r.answered.get(&position))
    }

    /// All answer records, ordered by position.
    pub fn answers(&self) -> impl Iterator<Item = &AnswerRecord> {
        self.run().into_iter().flat_map(|r| r.answered.values())
    }

    pub fn correct_count(&self) -> usize {
        self.run().map_or(0, |r| r.correct_count)
    }

    pub fn answered_count(&self) -> usize {
        self.run().map_or(0, |r| r.answered_count)
    }

    /// `correct / total`, or `0.0` without a run.
    pub fn score(&self) -> f64 {
        match self.run() {
            Some(run) if !run.questions.is_empty() => {
                run.correct_count as f64 / run.questions.len() as f64
            }
            _ => 0.0,
        }
    }

    /// Sources that were served from the fallback set for this run.
    pub fn fallback_sources(&self) -> &[String] {
        self.run()
            .map(|r| r.fallback_sources.as_slice())
            .unwrap_or_default()
    }

    /// Summary of the current run, if there is one.
    pub fn report(&self) -> Option<SessionReport> {
        let run = self.run()?;
        let answers = run
            .questions
            .iter()
            .enumerate()
            .map(|(position, question)| {
                let record = run.answered.get(&position);
                AnswerSummary {
                    position,
                    question_id: question.id.clone(),
                    source: question.source.clone(),
                    selected: record
                        .map(|r| r.selected_indices.clone())
                        .unwrap_or_default(),
                    correct: question.correct_indices(),
                    is_correct: record.map(|r| r.is_correct),
                }
            })
            .collect();

        Some(SessionReport {
            run_id: run.run_id,
            selection: run.selection.to_string(),
            length: run.length.to_string(),
            started_at: run.started_at,
            finished_at: run.finished_at,
            total: run.questions.len(),
            answered: run.answered_count,
            correct: run.correct_count,
            score: self.score(),
            fallback_sources: run.fallback_sources.clone(),
            answers,
        })
    }
}
