//! HTML rendering of the search page.
//!
//! Produces a single self-contained page: the search form, and when a search
//! ran, the refined hits with their matched fragments. All text coming from
//! the user or from GitHub is escaped.

use code_refine::SearchHit;

/// Languages offered in the language picker.
const LANGUAGES: &[&str] = &[
    "go",
    "rust",
    "python",
    "javascript",
    "typescript",
    "java",
    "c",
    "cpp",
];

/// What the search page should show.
#[derive(Debug, Clone, Default)]
pub struct SearchPageData<'a> {
    /// Whether a search ran and its results should be listed.
    pub show_results: bool,
    /// Search string echoed back into the form.
    pub search_string: &'a str,
    /// Language echoed back into the form.
    pub search_language: &'a str,
    /// Refined hits, in display order.
    pub results: &'a [SearchHit],
}

/// Render the full search page.
#[must_use]
pub fn render_search_page(data: &SearchPageData<'_>) -> String {
    let mut html = String::new();
    html.push_str(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Code search</title>
</head>
<body>
"#,
    );
    html.push_str(&render_form(data.search_string, data.search_language));
    if data.show_results {
        html.push_str(&render_results(data.results));
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn render_form(search: &str, language: &str) -> String {
    let mut html = String::new();
    html.push_str(r#"<form class="search-form" method="get" action="/">"#);
    html.push_str(&format!(
        r#"<input type="text" name="search" placeholder="Keyword" value="{}" />"#,
        html_escape(search)
    ));
    html.push_str(r#"<select name="language">"#);
    for lang in LANGUAGES {
        let selected = if *lang == language { " selected" } else { "" };
        html.push_str(&format!(r#"<option value="{lang}"{selected}>{lang}</option>"#));
    }
    if !language.is_empty() && !LANGUAGES.contains(&language) {
        let escaped = html_escape(language);
        html.push_str(&format!(
            r#"<option value="{escaped}" selected>{escaped}</option>"#
        ));
    }
    html.push_str("</select>");
    html.push_str(r#"<button type="submit">Search</button>"#);
    html.push_str("</form>\n");
    html
}

fn render_results(results: &[SearchHit]) -> String {
    if results.is_empty() {
        return r#"<p class="no-results">No results.</p>"#.to_owned() + "\n";
    }

    let mut html = String::new();
    html.push_str(&format!(
        r#"<p class="result-count">{} results</p>"#,
        results.len()
    ));
    html.push_str(r#"<ol class="results">"#);
    for hit in results {
        html.push_str(r#"<li class="result">"#);
        html.push_str(&format!(
            r#"<a href="{}">{}</a> <span class="path">{}</span> <span class="repository">{}</span>"#,
            html_escape(&hit.file_url),
            html_escape(&hit.name),
            html_escape(&hit.path),
            html_escape(&hit.repository_id),
        ));
        for fragment in &hit.fragments {
            html.push_str(&format!(
                r#"<pre class="fragment">{}</pre>"#,
                html_escape(fragment)
            ));
        }
        html.push_str("</li>");
    }
    html.push_str("</ol>\n");
    html
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
