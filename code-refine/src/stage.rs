//! Trait definition for pluggable refinement stages.
//!
//! Each refinement ([`crate::refiners::MatchPattern`],
//! [`crate::refiners::SortByRepositoryScore`], ...) implements
//! [`RefineStage`] so the pipeline runner can apply an ordered list of them
//! without knowing their concrete types.

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::RefineError;
use crate::types::{Batch, SearchHit};

/// A single transformation of a batch of search hits.
///
/// Stages never mutate their input: they borrow the previous batch and
/// return a new one. All implementations must be `Send + Sync` so a
/// pipeline can be shared across request handlers.
#[async_trait]
pub trait RefineStage: Send + Sync {
    /// Short, stable name used in logs and stage errors.
    fn name(&self) -> &'static str;

    /// Transform `batch` into a new batch.
    ///
    /// # Errors
    ///
    /// Returns [`RefineError`] if the stage cannot produce any output.
    async fn apply(&self, ctx: &RequestContext, batch: &[SearchHit]) -> Result<Batch, RefineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Keeps only the first `n` hits.
    struct Take(usize);

    #[async_trait]
    impl RefineStage for Take {
        fn name(&self) -> &'static str {
            "take"
        }

        async fn apply(
            &self,
            _ctx: &RequestContext,
            batch: &[SearchHit],
        ) -> Result<Batch, RefineError> {
            Ok(batch.iter().take(self.0).cloned().collect())
        }
    }

    fn hit(name: &str) -> SearchHit {
        SearchHit {
            name: name.into(),
            path: format!("src/{name}"),
            file_url: format!("https://github.com/o/r/blob/main/src/{name}"),
            repository_id: "o/r".into(),
            fragments: vec![],
        }
    }

    #[test]
    fn stage_objects_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn RefineStage>();
    }

    #[tokio::test]
    async fn boxed_stage_leaves_input_untouched() {
        let stage: Box<dyn RefineStage> = Box::new(Take(1));
        let input = vec![hit("a.rs"), hit("b.rs")];
        let out = stage
            .apply(&RequestContext::new(), &input)
            .await
            .expect("take never fails");
        assert_eq!(stage.name(), "take");
        assert_eq!(out.len(), 1);
        assert_eq!(input.len(), 2);
    }
}
