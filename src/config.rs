//! Application configuration, loaded from TOML with defaults for missing fields.
//!
//! # Locations
//!
//! The config file lives at `dirs::config_dir()/codesearch/config.toml`.
//! Set `CODESEARCH_CONFIG_DIR` to use another directory.
//!
//! The GitHub access token is never stored here; the binary reads it from
//! [`ACCESS_TOKEN_ENV`] at startup and injects it into the client.

use std::path::{Path, PathBuf};
use std::time::Duration;

use code_refine::ClientConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable holding the GitHub access token.
pub const ACCESS_TOKEN_ENV: &str = "GITHUB_API_ACCESS_TOKEN";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "CODESEARCH_CONFIG_DIR";

/// Top-level configuration for the codesearch server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Repository score lookups per search (also the lookup concurrency cap).
    pub max_requests: usize,
    /// Deadline for one whole search request, in seconds.
    pub request_timeout_secs: u64,
    /// GitHub API client settings.
    pub github: ClientConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_owned(),
            max_requests: 20,
            request_timeout_secs: 10,
            github: ClientConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load `path` if it exists, otherwise return the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if any field is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.trim().is_empty() {
            return Err(AppError::Config("bind_addr must not be empty".into()));
        }
        if self.max_requests == 0 {
            return Err(AppError::Config(
                "max_requests must be greater than 0".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        self.github.validate()?;
        Ok(())
    }

    /// Deadline applied to each search request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/codesearch/` by default. Override with
/// the `CODESEARCH_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("codesearch"))
        .unwrap_or_else(|| PathBuf::from("/tmp/codesearch-config"))
}

/// Read the GitHub access token from [`ACCESS_TOKEN_ENV`].
///
/// # Errors
///
/// Returns [`AppError::MissingToken`] if the variable is unset or blank.
pub fn access_token_from_env() -> Result<String> {
    std::env::var(ACCESS_TOKEN_ENV)
        .ok()
        .map(|token| token.trim().to_owned())
        .filter(|token| !token.is_empty())
        .ok_or(AppError::MissingToken(ACCESS_TOKEN_ENV))
}
