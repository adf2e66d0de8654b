//! Refinement stages applied to a batch of code search hits.
//!
//! [`MatchPattern`] drops hits whose fragments lack the literal search term;
//! [`SortByRepositoryScore`] re-ranks the survivors by repository popularity.

pub mod pattern;
pub mod repo_score;

pub use pattern::MatchPattern;
pub use repo_score::{ScoreSource, SortByRepositoryScore};
