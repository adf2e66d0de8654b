//! HTTP front end.
//!
//! ## Endpoints
//!
//! - `GET /`: search form
//! - `GET /?search=<keyword>&language=<lang>`: search, refine, render results
//!
//! Any failure while searching or refining is logged and answered with a
//! generic 500 page; a partially refined batch is never shown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use code_refine::{CodeSearch, RequestContext, ScoreSource, SearchHit};
use serde::Deserialize;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::error::Result;
use crate::page::{SearchPageData, render_search_page};

/// Body of every 500 response.
pub const GENERIC_ERROR_BODY: &str = "Oops, something went wrong";

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    search: Arc<dyn CodeSearch>,
    scores: Arc<dyn ScoreSource>,
    max_requests: usize,
    request_timeout: Duration,
}

impl AppState {
    /// Build handler state from the two collaborators and the request settings.
    pub fn new(
        search: Arc<dyn CodeSearch>,
        scores: Arc<dyn ScoreSource>,
        config: &AppConfig,
    ) -> Self {
        Self {
            search,
            scores,
            max_requests: config.max_requests,
            request_timeout: config.request_timeout(),
        }
    }

    /// Search one page of hits and refine them under a fresh request deadline.
    ///
    /// # Errors
    ///
    /// Returns an error if the search fails or a refinement stage fails.
    pub async fn search_and_refine(&self, keyword: &str, language: &str) -> Result<Vec<SearchHit>> {
        let ctx = RequestContext::with_timeout(self.request_timeout);
        let raw = self.search.search(&ctx, keyword, language).await?;
        let refined = code_refine::refine(
            &ctx,
            &raw,
            keyword,
            self.max_requests,
            Arc::clone(&self.scores),
        )
        .await?;
        tracing::info!(
            raw = raw.len(),
            refined = refined.len(),
            "search results refined"
        );
        Ok(refined)
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    language: Option<String>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new().route("/", get(index)).with_state(state)
}

async fn index(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let keyword = params.search.unwrap_or_default();
    let language = params.language.unwrap_or_default();

    if keyword.is_empty() {
        return Html(render_search_page(&SearchPageData {
            search_language: &language,
            ..Default::default()
        }))
        .into_response();
    }

    match state.search_and_refine(&keyword, &language).await {
        Ok(results) => Html(render_search_page(&SearchPageData {
            show_results: true,
            search_string: &keyword,
            search_language: &language,
            results: &results,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "search request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_BODY).into_response()
        }
    }
}

/// Bind `config.bind_addr` and serve until the process is stopped.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(config: &AppConfig, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(&config.bind_addr).await?;
    let local_addr: SocketAddr = listener.local_addr()?;
    tracing::info!(%local_addr, "codesearch listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
