//! Mock question source for testing.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use quizkit_core::error::FetchError;
use quizkit_core::model::Question;
use quizkit_core::parser::question_to_record;
use quizkit_core::traits::QuestionSource;

/// An in-memory question source for exercising the gateway, aggregator and
/// session without touching disk or network.
///
/// Unknown set names and names marked as failing both produce fetch errors.
#[derive(Default)]
pub struct MockSource {
    /// Map of set name → raw records.
    sets: HashMap<String, Vec<Value>>,
    /// Set names that always fail with a transport error.
    failing: HashSet<String>,
    /// Number of fetches made.
    call_count: AtomicU32,
    /// Set names requested, in call order.
    requests: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `records` under `name`.
    pub fn with_records(mut self, name: &str, records: Vec<Value>) -> Self {
        self.sets.insert(name.to_string(), records);
        self
    }

    /// Serve already-normalized questions under `name`, encoded the way a
    /// real source would store them.
    pub fn with_questions(self, name: &str, questions: &[Question]) -> Self {
        let records = questions.iter().map(question_to_record).collect();
        self.with_records(name, records)
    }

    /// Make every fetch of `name` fail.
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    /// Get the number of fetches made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the set names requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuestionSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_raw(&self, set_name: &str) -> Result<Vec<Value>, FetchError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.requests.lock().unwrap().push(set_name.to_string());

        if self.failing.contains(set_name) {
            return Err(FetchError::Transport(format!(
                "mock failure for {set_name}"
            )));
        }
        self.sets
            .get(set_name)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(set_name.to_string()))
    }
}
