//! Source configuration and factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizkit_core::model::SourceCatalog;
use quizkit_core::traits::QuestionSource;

use crate::directory::DirectorySource;
use crate::http::{HttpSource, DEFAULT_TIMEOUT_SECS};

/// Where question sets are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Static JSON files served over HTTP.
    Http { base_url: String },
    /// JSON files in a local directory.
    Directory {
        #[serde(default = "default_data_dir")]
        path: PathBuf,
    },
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Directory {
            path: default_data_dir(),
        }
    }
}

/// Top-level quizkit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizkitConfig {
    /// Source used when none is given on the command line.
    #[serde(default = "default_selection")]
    pub default_source: String,
    /// Test length used when none is given ("30", "all", or a number).
    #[serde(default = "default_length")]
    pub default_length: String,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Backend the question sets are fetched from.
    #[serde(default)]
    pub source: SourceConfig,
    /// Known sources, in "all sources" order.
    #[serde(default)]
    pub sources: SourceCatalog,
}

fn default_selection() -> String {
    "NI".to_string()
}
fn default_length() -> String {
    "30".to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for QuizkitConfig {
    fn default() -> Self {
        Self {
            default_source: default_selection(),
            default_length: default_length(),
            timeout_secs: default_timeout(),
            source: SourceConfig::default(),
            sources: SourceCatalog::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_source_config(config: &SourceConfig) -> SourceConfig {
    match config {
        SourceConfig::Http { base_url } => SourceConfig::Http {
            base_url: resolve_env_vars(base_url),
        },
        SourceConfig::Directory { path } => SourceConfig::Directory {
            path: PathBuf::from(resolve_env_vars(&path.to_string_lossy())),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizkit.toml` in the current directory
/// 2. `~/.config/quizkit/config.toml`
///
/// Environment variable overrides: `QUIZKIT_BASE_URL`, `QUIZKIT_DATA_DIR`
/// (the latter wins when both are set).
pub fn load_config() -> Result<QuizkitConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizkitConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizkit.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizkitConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizkitConfig::default(),
    };

    if let Ok(base_url) = std::env::var("QUIZKIT_BASE_URL") {
        config.source = SourceConfig::Http { base_url };
    }
    if let Ok(dir) = std::env::var("QUIZKIT_DATA_DIR") {
        config.source = SourceConfig::Directory {
            path: PathBuf::from(dir),
        };
    }

    config.source = resolve_source_config(&config.source);
    anyhow::ensure!(
        !config.sources.is_empty(),
        "config must list at least one source"
    );

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizkit"))
}

/// Create a question source from its configuration.
pub fn create_source(config: &SourceConfig, timeout_secs: u64) -> Result<Arc<dyn QuestionSource>> {
    match config {
        SourceConfig::Http { base_url } => Ok(Arc::new(HttpSource::new(base_url, timeout_secs)?)),
        SourceConfig::Directory { path } => Ok(Arc::new(DirectorySource::new(path.clone())?)),
    }
}
