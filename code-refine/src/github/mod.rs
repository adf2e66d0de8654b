//! GitHub REST client: code search and repository popularity lookups.
//!
//! [`GithubClient`] implements both [`CodeSearch`] (the primary search,
//! first page only) and [`ScoreSource`] (stargazer count per repository).
//! Credentials are passed in at construction time.

pub mod wire;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::context::RequestContext;
use crate::error::RefineError;
use crate::http::build_client;
use crate::refiners::ScoreSource;
use crate::search::{CodeSearch, build_query};
use crate::types::{Batch, RepositoryScore, SearchHit};

use self::wire::{CodeSearchPage, RepositoryInfo};

/// A GitHub REST API client. Cheap to clone and safe to share.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: Url,
    per_page: u32,
}

impl GithubClient {
    /// Build a client from `config`, authenticating with `token` if given.
    ///
    /// # Errors
    ///
    /// Returns [`RefineError::Config`] for an invalid configuration or token,
    /// and [`RefineError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, token: Option<&str>) -> Result<Self, RefineError> {
        config.validate()?;
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| RefineError::Config(format!("api_base_url is invalid: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RefineError::Config(
                "api_base_url cannot be used as a base URL".into(),
            ));
        }
        Ok(Self {
            http: build_client(config, token)?,
            base_url,
            per_page: config.per_page,
        })
    }

    /// Fetch the first page of code search results.
    ///
    /// Only page 1 is ever requested; GitHub's total count is logged but not
    /// returned.
    ///
    /// # Errors
    ///
    /// See [`CodeSearch::search`].
    pub async fn search_code(
        &self,
        ctx: &RequestContext,
        keyword: &str,
        language: &str,
    ) -> Result<Batch, RefineError> {
        let url = self.endpoint(&["search", "code"]);
        let query = build_query(keyword, language);
        tracing::trace!(%query, "searching code");

        let per_page = self.per_page.to_string();
        let page: CodeSearchPage = self
            .get_json(
                ctx,
                url,
                &[("q", query.as_str()), ("page", "1"), ("per_page", per_page.as_str())],
            )
            .await?;

        tracing::debug!(
            total_count = page.total_count,
            returned = page.items.len(),
            incomplete = page.incomplete_results,
            "code search page fetched"
        );
        Ok(page.items.into_iter().map(SearchHit::from).collect())
    }

    /// Fetch the stargazer count of `owner/name`.
    ///
    /// # Errors
    ///
    /// Returns [`RefineError::Parse`] if `repository_id` is not `owner/name`,
    /// otherwise the same errors as any request.
    pub async fn repository_info(
        &self,
        ctx: &RequestContext,
        repository_id: &str,
    ) -> Result<RepositoryInfo, RefineError> {
        let (owner, name) = split_repository_id(repository_id)?;
        let url = self.endpoint(&["repos", owner, name]);
        self.get_json(ctx, url, &[]).await
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, RefineError> {
        let path = url.path().to_owned();
        let request = self.http.get(url).query(query);

        let response = ctx
            .run_until_done(request.send())
            .await?
            .map_err(|e| RefineError::Http(format!("request to {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefineError::Status {
                status: status.as_u16(),
                url: path,
            });
        }

        ctx.run_until_done(response.json::<T>())
            .await?
            .map_err(|e| RefineError::Parse(format!("invalid response from {path}: {e}")))
    }
}

#[async_trait]
impl CodeSearch for GithubClient {
    async fn search(
        &self,
        ctx: &RequestContext,
        keyword: &str,
        language: &str,
    ) -> Result<Batch, RefineError> {
        self.search_code(ctx, keyword, language).await
    }
}

#[async_trait]
impl ScoreSource for GithubClient {
    async fn fetch_score(
        &self,
        ctx: &RequestContext,
        repository_id: &str,
    ) -> Result<RepositoryScore, RefineError> {
        let info = self.repository_info(ctx, repository_id).await?;
        Ok(RepositoryScore::succeeded(
            repository_id,
            info.stargazers_count as f64,
        ))
    }
}

/// Split `owner/name` into its two non-empty parts.
fn split_repository_id(repository_id: &str) -> Result<(&str, &str), RefineError> {
    match repository_id.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => Err(RefineError::Parse(format!(
            "repository id `{repository_id}` is not of the form owner/name"
        ))),
    }
}
