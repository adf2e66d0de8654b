//! Trait definition for the primary code search backend.

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::RefineError;
use crate::types::Batch;

/// A code search backend returning one page of raw hits.
///
/// The refinement pipeline never calls this itself; the caller fetches the
/// batch and hands it to [`crate::refine`].
#[async_trait]
pub trait CodeSearch: Send + Sync {
    /// Search for `keyword`, restricted to `language` when it is not blank.
    ///
    /// # Errors
    ///
    /// Returns [`RefineError`] if the request fails, is rejected, or the
    /// context ends first.
    async fn search(
        &self,
        ctx: &RequestContext,
        keyword: &str,
        language: &str,
    ) -> Result<Batch, RefineError>;
}

/// Build the search qualifier string: `keyword language:lang`.
pub fn build_query(keyword: &str, language: &str) -> String {
    let keyword = keyword.trim();
    match (keyword, language.trim()) {
        (keyword, "") => keyword.to_owned(),
        ("", language) => format!("language:{language}"),
        (keyword, language) => format!("{keyword} language:{language}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_with_language() {
        assert_eq!(build_query("spawn", "rust"), "spawn language:rust");
    }

    #[test]
    fn blank_language_omits_qualifier() {
        assert_eq!(build_query(" spawn ", "  "), "spawn");
    }

    #[test]
    fn blank_keyword_keeps_only_qualifier() {
        assert_eq!(build_query("", "go"), "language:go");
    }

    #[test]
    fn code_search_objects_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn CodeSearch>();
    }
}
