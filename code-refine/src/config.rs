//! GitHub client configuration with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::error::RefineError;

/// Public GitHub REST API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Largest page size the code search API accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Configuration for [`crate::github::GithubClient`].
///
/// Use [`Default::default()`] for the public GitHub API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root. Overridden in tests to point at a mock server.
    pub api_base_url: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Hits requested from the single search page (1..=100).
    pub per_page: u32,
    /// `User-Agent` header; GitHub rejects requests without one.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeout_seconds: 10,
            per_page: MAX_PER_PAGE,
            user_agent: concat!("codesearch/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl ClientConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `api_base_url` parses as an absolute `http`/`https` URL
    /// - `timeout_seconds` must be greater than 0
    /// - `per_page` must be within `1..=100`
    /// - `user_agent` must not be blank
    pub fn validate(&self) -> Result<(), RefineError> {
        let parsed = url::Url::parse(&self.api_base_url)
            .map_err(|e| RefineError::Config(format!("api_base_url is invalid: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RefineError::Config(
                "api_base_url must use http or https".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(RefineError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(RefineError::Config(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(RefineError::Config("user_agent must not be empty".into()));
        }
        Ok(())
    }

    /// Builder-style override of the API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        self
    }
}
