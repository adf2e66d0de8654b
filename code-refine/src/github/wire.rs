//! GitHub REST response bodies, reduced to the fields this crate reads.

use serde::Deserialize;

use crate::types::SearchHit;

/// Body of `GET /search/code`.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeSearchPage {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<CodeItem>,
}

/// One item of a code search page.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeItem {
    pub name: String,
    pub path: String,
    pub html_url: String,
    pub repository: RepositoryRef,
    #[serde(default)]
    pub text_matches: Vec<TextMatch>,
}

/// The repository summary embedded in a code search item.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryRef {
    pub full_name: String,
}

/// A text-match entry; present only with the text-match media type.
#[derive(Debug, Clone, Deserialize)]
pub struct TextMatch {
    #[serde(default)]
    pub fragment: Option<String>,
}

/// Body of `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryInfo {
    pub full_name: String,
    #[serde(default)]
    pub stargazers_count: u64,
}

impl From<CodeItem> for SearchHit {
    fn from(item: CodeItem) -> Self {
        Self {
            name: item.name,
            path: item.path,
            file_url: item.html_url,
            repository_id: item.repository.full_name,
            fragments: item
                .text_matches
                .into_iter()
                .filter_map(|m| m.fragment)
                .collect(),
        }
    }
}
