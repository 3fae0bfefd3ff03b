//! quizkit-sources — Question source integrations.
//!
//! Implements the `QuestionSource` trait for HTTP endpoints, local
//! directories, and an in-memory mock, plus the TOML configuration that
//! selects between them.

pub mod config;
pub mod directory;
pub mod error;
pub mod http;
pub mod mock;

pub use config::{create_source, load_config, QuizkitConfig, SourceConfig};
pub use error::SourceError;
