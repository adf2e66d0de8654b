//! codesearch server binary.
//!
//! Reads the config file (or defaults), takes the GitHub access token from
//! `GITHUB_API_ACCESS_TOKEN`, and serves the search page.

use std::path::PathBuf;
use std::sync::Arc;

use code_refine::github::GithubClient;
use codesearch::config::{AppConfig, access_token_from_env};
use codesearch::{AppState, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(AppConfig::default_config_path);
    let config = AppConfig::load_or_default(&config_path)?;
    config.validate()?;

    let token = access_token_from_env()?;
    let client = Arc::new(GithubClient::new(&config.github, Some(&token))?);
    tracing::info!(
        api = %config.github.api_base_url,
        max_requests = config.max_requests,
        "codesearch starting"
    );

    let state = AppState::new(client.clone(), client, &config);
    serve(&config, state).await.map_err(|e| {
        tracing::error!(error = %e, "codesearch exited with error");
        anyhow::anyhow!("codesearch failed: {e}")
    })?;

    Ok(())
}
