//! HTTP question source: `GET {base_url}/{name}.json`.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use quizkit_core::error::FetchError;
use quizkit_core::traits::{records_from_json, QuestionSource};

use crate::error::SourceError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Serves question sets as static JSON files over HTTP.
pub struct HttpSource {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, SourceError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SourceError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;

        Ok(Self {
            base_url: base_url.to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, set_name: &str) -> String {
        format!("{}/{}.json", self.base_url, set_name)
    }
}

#[async_trait]
impl QuestionSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_raw(&self, set_name: &str) -> Result<Vec<serde_json::Value>, FetchError> {
        let response = self
            .client
            .get(self.url_for(set_name))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Transport(format!("timed out after {}s", self.timeout_secs))
                } else if e.is_connect() {
                    FetchError::Transport(format!("{} not reachable", self.base_url))
                } else {
                    FetchError::Transport(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(FetchError::NotFound(set_name.to_string()));
        }
        if status >= 400 {
            return Err(FetchError::Status { status });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(format!("failed to read body: {e}")))?;
        records_from_json(&body)
    }
}
