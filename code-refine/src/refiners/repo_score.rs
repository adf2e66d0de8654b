//! Repository-score ranker: budgeted, deduplicated score lookups followed by
//! a stable re-sort.
//!
//! # Pipeline
//!
//! 1. Collect the unique repositories of the batch in first-seen order
//! 2. Query the first `max_requests` of them; the rest get the fallback score
//! 3. Run the lookups concurrently, each raced against the request context
//! 4. Turn every failed, cancelled or timed-out lookup into the fallback score
//! 5. Stable-sort the hits by descending repository score
//!
//! The ranker never fails. Its output order depends only on the scores and
//! on the input order, never on which lookup finished first.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::RefineError;
use crate::stage::RefineStage;
use crate::types::{Batch, RankedBatch, RepositoryScore, SearchHit};

/// Source of per-repository popularity scores.
///
/// Implementations are shared read-only across concurrent lookups.
#[async_trait]
pub trait ScoreSource: Send + Sync {
    /// Fetch the score of one repository. Called at most once per
    /// repository per pipeline invocation.
    ///
    /// # Errors
    ///
    /// Any error; the ranker converts it to the fallback score.
    async fn fetch_score(
        &self,
        ctx: &RequestContext,
        repository_id: &str,
    ) -> Result<RepositoryScore, RefineError>;
}

#[async_trait]
impl<S: ScoreSource + ?Sized> ScoreSource for Arc<S> {
    async fn fetch_score(
        &self,
        ctx: &RequestContext,
        repository_id: &str,
    ) -> Result<RepositoryScore, RefineError> {
        (**self).fetch_score(ctx, repository_id).await
    }
}

#[async_trait]
impl<'a, S: ScoreSource + ?Sized> ScoreSource for &'a S {
    async fn fetch_score(
        &self,
        ctx: &RequestContext,
        repository_id: &str,
    ) -> Result<RepositoryScore, RefineError> {
        (**self).fetch_score(ctx, repository_id).await
    }
}

/// Re-ranks hits by the score of their owning repository.
///
/// `max_requests` is both the cap on lookups per invocation and the cap on
/// lookups in flight.
pub struct SortByRepositoryScore<S> {
    max_requests: usize,
    source: S,
}

impl<S> fmt::Debug for SortByRepositoryScore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortByRepositoryScore")
            .field("max_requests", &self.max_requests)
            .finish_non_exhaustive()
    }
}

impl<S: ScoreSource> SortByRepositoryScore<S> {
    /// Stage name used in logs and errors.
    pub const NAME: &'static str = "sort_by_repository_score";

    /// # Errors
    ///
    /// Returns [`RefineError::Config`] if `max_requests` is 0.
    pub fn new(max_requests: usize, source: S) -> Result<Self, RefineError> {
        if max_requests == 0 {
            return Err(RefineError::Config(
                "max_requests must be greater than 0".into(),
            ));
        }
        Ok(Self {
            max_requests,
            source,
        })
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Score every repository in `batch` and return the re-sorted hits along
    /// with the per-repository outcomes.
    pub async fn rank(&self, ctx: &RequestContext, batch: &[SearchHit]) -> RankedBatch {
        let unique = unique_repositories(batch);
        let (queried, over_budget) = unique.split_at(unique.len().min(self.max_requests));

        if !over_budget.is_empty() {
            tracing::debug!(
                budget = self.max_requests,
                unscored = over_budget.len(),
                "request budget exhausted, remaining repositories use fallback score"
            );
        }

        // At most `max_requests` futures exist, so this also bounds concurrency.
        let lookups: Vec<_> = queried.iter().map(|id| self.lookup(ctx, id)).collect();
        let mut scores = futures::future::join_all(lookups).await;
        scores.extend(over_budget.iter().map(|id| RepositoryScore::fallback(*id)));

        let by_repository: HashMap<&str, f64> = scores
            .iter()
            .map(|s| (s.repository_id.as_str(), s.score))
            .collect();
        let score_of = |hit: &SearchHit| {
            by_repository
                .get(hit.repository_id.as_str())
                .copied()
                .unwrap_or(0.0)
        };

        let mut hits = batch.to_vec();
        // `sort_by` is stable: equal scores keep their input order.
        hits.sort_by(|a, b| score_of(b).total_cmp(&score_of(a)));

        let ranked = RankedBatch { hits, scores };
        tracing::debug!(
            hits = ranked.hits.len(),
            repositories = ranked.scores.len(),
            lookups = queried.len(),
            fallbacks = ranked.fallback_count(),
            "hits ranked by repository score"
        );
        ranked
    }

    async fn lookup(&self, ctx: &RequestContext, repository_id: &str) -> RepositoryScore {
        match ctx
            .run_until_done(self.source.fetch_score(ctx, repository_id))
            .await
        {
            Ok(Ok(fetched)) if fetched.fetch_succeeded => {
                RepositoryScore::succeeded(repository_id, fetched.score)
            }
            Ok(Ok(_)) => RepositoryScore::fallback(repository_id),
            Ok(Err(err)) => {
                tracing::warn!(repository = repository_id, error = %err, "score lookup failed");
                RepositoryScore::fallback(repository_id)
            }
            Err(reason) => {
                tracing::debug!(repository = repository_id, error = %reason, "score lookup abandoned");
                RepositoryScore::fallback(repository_id)
            }
        }
    }
}

#[async_trait]
impl<S: ScoreSource> RefineStage for SortByRepositoryScore<S> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn apply(&self, ctx: &RequestContext, batch: &[SearchHit]) -> Result<Batch, RefineError> {
        Ok(self.rank(ctx, batch).await.hits)
    }
}

/// Unique repository ids of `batch`, in first-seen order.
pub fn unique_repositories(batch: &[SearchHit]) -> Vec<&str> {
    let mut seen = HashSet::with_capacity(batch.len());
    batch
        .iter()
        .map(|hit| hit.repository_id.as_str())
        .filter(|id| seen.insert(*id))
        .collect()
}
