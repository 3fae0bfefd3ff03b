//! Directory question source: reads `{dir}/{name}.json`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use quizkit_core::error::FetchError;
use quizkit_core::traits::{records_from_json, QuestionSource};

use crate::error::SourceError;

/// Serves question sets from JSON files in a local directory.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// The directory does not have to exist yet; missing sets are reported
    /// per fetch.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(SourceError::EmptyDataDir);
        }
        if root.exists() && !root.is_dir() {
            return Err(SourceError::NotADirectory(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, set_name: &str) -> Option<PathBuf> {
        let is_plain = !set_name.is_empty()
            && !set_name.contains(['/', '\\'])
            && set_name != ".."
            && set_name != ".";
        is_plain.then(|| self.root.join(format!("{set_name}.json")))
    }
}

#[async_trait]
impl QuestionSource for DirectorySource {
    fn name(&self) -> &str {
        "directory"
    }

    async fn fetch_raw(&self, set_name: &str) -> Result<Vec<serde_json::Value>, FetchError> {
        let path = self
            .path_for(set_name)
            .ok_or_else(|| FetchError::NotFound(set_name.to_string()))?;

        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                FetchError::NotFound(path.display().to_string())
            } else {
                FetchError::Io(e)
            }
        })?;
        records_from_json(&content)
    }
}
