//! Core types for code search hits and repository scores.

use serde::{Deserialize, Serialize};

/// Opaque key identifying a source repository (GitHub `owner/name`).
pub type RepositoryId = String;

/// An ordered sequence of hits, passed between pipeline stages.
pub type Batch = Vec<SearchHit>;

/// A single file matched by the remote code search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// File name.
    pub name: String,
    /// Path of the file inside its repository.
    pub path: String,
    /// Browser link to the file.
    pub file_url: String,
    /// Repository the file belongs to.
    pub repository_id: RepositoryId,
    /// Matched text fragments, in the order the API returned them.
    pub fragments: Vec<String>,
}

/// Popularity score of one repository, computed per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryScore {
    /// The repository this score belongs to.
    pub repository_id: RepositoryId,
    /// Score, always finite and `>= 0.0`.
    pub score: f64,
    /// Whether the score came from a successful lookup.
    pub fetch_succeeded: bool,
}

impl RepositoryScore {
    /// A score obtained from a successful lookup. Negative or non-finite
    /// values are clamped to `0.0`.
    pub fn succeeded(repository_id: impl Into<RepositoryId>, score: f64) -> Self {
        let score = if score.is_finite() && score > 0.0 {
            score
        } else {
            0.0
        };
        Self {
            repository_id: repository_id.into(),
            score,
            fetch_succeeded: true,
        }
    }

    /// The score assigned when a lookup failed or was never issued.
    pub fn fallback(repository_id: impl Into<RepositoryId>) -> Self {
        Self {
            repository_id: repository_id.into(),
            score: 0.0,
            fetch_succeeded: false,
        }
    }
}

/// Output of the repository-score ranker: the reordered hits plus the score
/// outcome of every repository referenced by the input, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct RankedBatch {
    /// Hits sorted by descending repository score.
    pub hits: Batch,
    /// One entry per unique repository.
    pub scores: Vec<RepositoryScore>,
}

impl RankedBatch {
    /// Number of repositories whose score is a fallback.
    pub fn fallback_count(&self) -> usize {
        self.scores.iter().filter(|s| !s.fetch_succeeded).count()
    }

    /// Score recorded for `repository_id`, if it appeared in the input.
    pub fn score_of(&self, repository_id: &str) -> Option<&RepositoryScore> {
        self.scores
            .iter()
            .find(|s| s.repository_id == repository_id)
    }
}
