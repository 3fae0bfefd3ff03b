//! quizkit-core — Quiz session engine, answer validation, and question
//! aggregation.
//!
//! This crate defines the data model, the `QuestionSource` trait, and the
//! session state machine that the rest of quizkit builds on.

pub mod aggregator;
pub mod error;
pub mod gateway;
pub mod model;
pub mod parser;
pub mod report;
pub mod session;
pub mod shuffle;
pub mod traits;
pub mod validator;

pub use aggregator::{Aggregator, Pool};
pub use error::{FetchError, SessionError};
pub use gateway::{fallback_set, Gateway};
pub use model::{
    AnswerRecord, Choice, KnownSource, Question, QuestionSet, SelectionMode, SetOrigin,
    SourceCatalog, SourceSelection, TestLength,
};
pub use session::{Phase, Session};
pub use shuffle::Shuffler;
pub use traits::QuestionSource;
