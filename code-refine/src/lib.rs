//! # code-refine
//!
//! Client-side refinement of code search results.
//!
//! The remote code search API returns one page of raw hits. This crate
//! re-ranks and filters that page before it is displayed:
//!
//! 1. [`refiners::MatchPattern`] drops hits whose matched fragments do not
//!    literally contain the search term
//! 2. [`refiners::SortByRepositoryScore`] fetches one popularity score per
//!    repository (bounded by a request budget) and stably re-sorts the hits
//!
//! Stages run in order through [`pipeline::run`] under a shared
//! [`RequestContext`]. Score lookup failures and budget exhaustion degrade to
//! a zero score; only a stage that cannot run at all fails the pipeline.
//!
//! ## Collaborators
//!
//! - [`CodeSearch`] produces the raw batch (see [`github::GithubClient`])
//! - [`ScoreSource`] provides repository scores; inject a stub in tests
//! - Credentials are passed to [`github::GithubClient::new`]; this crate
//!   never reads the environment

pub mod config;
pub mod context;
pub mod error;
pub mod github;
pub mod http;
pub mod pipeline;
pub mod refiners;
pub mod search;
pub mod stage;
pub mod types;

pub use config::ClientConfig;
pub use context::RequestContext;
pub use error::{RefineError, Result};
pub use refiners::{MatchPattern, ScoreSource, SortByRepositoryScore};
pub use search::CodeSearch;
pub use stage::RefineStage;
pub use types::{Batch, RankedBatch, RepositoryId, RepositoryScore, SearchHit};

/// The standard pipeline: literal pattern filter, then repository-score sort.
///
/// # Errors
///
/// Returns [`RefineError::Config`] if `max_requests` is 0.
pub fn default_stages<S>(
    pattern: &str,
    max_requests: usize,
    source: S,
) -> Result<Vec<Box<dyn RefineStage>>>
where
    S: ScoreSource + 'static,
{
    let stages: Vec<Box<dyn RefineStage>> = vec![
        Box::new(MatchPattern::new(pattern)),
        Box::new(SortByRepositoryScore::new(max_requests, source)?),
    ];
    Ok(stages)
}

/// Refine a raw batch of hits with the standard pipeline.
///
/// Keeps hits with a fragment containing `pattern`, then orders them by
/// descending repository score with at most `max_requests` score lookups.
///
/// # Errors
///
/// Returns [`RefineError::Config`] if `max_requests` is 0, or
/// [`RefineError::Stage`] if the context ended before a stage could start.
///
/// # Examples
///
/// ```no_run
/// # async fn example(hits: Vec<code_refine::SearchHit>) -> code_refine::Result<()> {
/// use std::time::Duration;
///
/// let client = code_refine::github::GithubClient::new(&Default::default(), None)?;
/// let ctx = code_refine::RequestContext::with_timeout(Duration::from_secs(10));
/// let refined = code_refine::refine(&ctx, &hits, "spawn", 20, client).await?;
/// for hit in &refined {
///     println!("{} ({})", hit.path, hit.repository_id);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn refine<S>(
    ctx: &RequestContext,
    raw: &[SearchHit],
    pattern: &str,
    max_requests: usize,
    source: S,
) -> Result<Batch>
where
    S: ScoreSource + 'static,
{
    let stages = default_stages(pattern, max_requests, source)?;
    pipeline::run(&stages, ctx, raw).await
}
