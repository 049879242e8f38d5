//! Crawl settings loaded from TOML.
//!
//! The defaults live in `crawl.toml`, baked into the binary with
//! [`include_str!`]. A user file only needs the keys it changes; everything
//! else falls back to the same defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cinedata_extract::links::DEFAULT_BASE_URL;
use cinedata_scraper::http::{DEFAULT_ACCEPT_LANGUAGE, DEFAULT_USER_AGENT, FetcherOptions};
use cinedata_scraper::retry::RetryPolicy;
use serde::{Deserialize, Serialize};

/// The embedded default configuration.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../crawl.toml");

/// Errors that can occur while loading a [`CrawlConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unknown keys.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for one crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrawlConfig {
    /// Site root that listing and detail links are resolved against.
    pub base_url: String,
    /// Listing entries to assemble, taken from the top of the listing.
    pub max_movies: usize,
    /// Records assembled concurrently. Zero is treated as one.
    pub concurrency: usize,
    /// Minimum spacing between request starts, in milliseconds.
    pub request_delay_ms: u64,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
    /// Attempts per request for retryable failures.
    pub max_attempts: u32,
    /// Whether an unreachable reviews page fails the record.
    pub require_reviews: bool,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            max_movies: 20,
            concurrency: 4,
            request_delay_ms: 200,
            timeout_secs: 15,
            max_attempts: 3,
            require_reviews: true,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_owned(),
        }
    }
}

impl CrawlConfig {
    /// Parses a config from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid TOML or
    /// contains unknown keys.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// The embedded default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the embedded file is malformed.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_CONFIG_TOML)
    }

    /// Loads `path` if given, otherwise the embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Self::embedded();
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded crawl config from {}", path.display());
        Self::from_toml(&text)
    }

    /// Concurrency with the zero case clamped to one worker.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.concurrency.max(1)
    }

    /// HTTP client settings derived from this config.
    #[must_use]
    pub fn to_fetcher_options(&self) -> FetcherOptions {
        FetcherOptions {
            user_agent: self.user_agent.clone(),
            accept_language: self.accept_language.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            request_delay: Duration::from_millis(self.request_delay_ms),
            retry: RetryPolicy {
                max_attempts: self.max_attempts,
                ..RetryPolicy::default()
            },
        }
    }
}
