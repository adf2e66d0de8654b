//! Shared HTTP client for GitHub API requests.
//!
//! Builds one [`reqwest::Client`] per process with the headers every GitHub
//! REST call needs. The access token is injected by the caller; this crate
//! never reads it from the environment.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};

use crate::config::ClientConfig;
use crate::error::RefineError;

/// Media type that asks the search API to include text-match fragments.
pub const TEXT_MATCH_MEDIA_TYPE: &str = "application/vnd.github.v3.text-match+json";

/// Build a [`reqwest::Client`] configured for the GitHub REST API.
///
/// The client has:
/// - Timeout from config
/// - `User-Agent` from config
/// - `Accept` set to the text-match media type
/// - `Authorization: token <token>` when a token is supplied (marked sensitive)
///
/// # Errors
///
/// Returns [`RefineError::Config`] if the token is not a valid header value,
/// or [`RefineError::Http`] if the client cannot be constructed.
pub fn build_client(
    config: &ClientConfig,
    token: Option<&str>,
) -> Result<reqwest::Client, RefineError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .default_headers(default_headers(token)?)
        .build()
        .map_err(|e| RefineError::Http(format!("failed to build HTTP client: {e}")))
}

fn default_headers(token: Option<&str>) -> Result<HeaderMap, RefineError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(TEXT_MATCH_MEDIA_TYPE));
    if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
        let mut value = HeaderValue::from_str(&format!("token {token}"))
            .map_err(|_| RefineError::Config("access token is not a valid header value".into()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_client_with_default_config() {
        let config = ClientConfig::default();
        assert!(build_client(&config, None).is_ok());
        assert!(build_client(&config, Some("ghp_example")).is_ok());
    }

    #[test]
    fn headers_include_text_match_accept() {
        let headers = default_headers(None).expect("headers");
        assert_eq!(headers[ACCEPT], TEXT_MATCH_MEDIA_TYPE);
        assert!(!headers.contains_key(AUTHORIZATION));
    }

    #[test]
    fn token_becomes_sensitive_authorization_header() {
        let headers = default_headers(Some(" ghp_example ")).expect("headers");
        let auth = &headers[AUTHORIZATION];
        assert_eq!(auth, "token ghp_example");
        assert!(auth.is_sensitive());
    }

    #[test]
    fn blank_token_is_ignored() {
        let headers = default_headers(Some("   ")).expect("headers");
        assert!(!headers.contains_key(AUTHORIZATION));
    }

    #[test]
    fn token_with_newline_rejected() {
        let err = default_headers(Some("bad\ntoken")).unwrap_err();
        assert!(err.to_string().contains("header"));
    }
}
