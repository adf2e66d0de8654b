//! Literal pattern filter.
//!
//! The remote code search matches on stemmed tokens, so some returned hits
//! never contain the term the user typed. This stage drops them.

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::RefineError;
use crate::stage::RefineStage;
use crate::types::{Batch, SearchHit};

/// Keeps hits with at least one fragment containing `pattern`
/// (case-sensitive substring). Stable; an empty pattern keeps every hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPattern {
    pattern: String,
}

impl MatchPattern {
    /// Stage name used in logs and errors.
    pub const NAME: &'static str = "match_pattern";

    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` if any fragment of `hit` contains the pattern.
    pub fn matches(&self, hit: &SearchHit) -> bool {
        self.pattern.is_empty()
            || hit
                .fragments
                .iter()
                .any(|fragment| fragment.contains(self.pattern.as_str()))
    }

    /// Synchronous filter, usable outside a pipeline.
    pub fn filter(&self, batch: &[SearchHit]) -> Batch {
        let kept: Batch = batch.iter().filter(|hit| self.matches(hit)).cloned().collect();
        tracing::trace!(
            pattern = %self.pattern,
            input_len = batch.len(),
            kept = kept.len(),
            "pattern filter applied"
        );
        kept
    }
}

#[async_trait]
impl RefineStage for MatchPattern {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn apply(&self, _ctx: &RequestContext, batch: &[SearchHit]) -> Result<Batch, RefineError> {
        Ok(self.filter(batch))
    }
}
