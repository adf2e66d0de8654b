//! GitHub client contract tests.
//!
//! A wiremock server stands in for the GitHub REST API and verifies the
//! request shape (single search page, text-match media type, token header)
//! and the mapping of responses onto hits and scores.

use std::time::Duration;

use code_refine::github::GithubClient;
use code_refine::http::TEXT_MATCH_MEDIA_TYPE;
use code_refine::{ClientConfig, CodeSearch, RefineError, RequestContext, ScoreSource, refine};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, token: Option<&str>) -> GithubClient {
    let config = ClientConfig::default().with_base_url(server.uri());
    GithubClient::new(&config, token).expect("client")
}

fn code_item(name: &str, repo: &str, fragments: &[&str]) -> serde_json::Value {
    json!({
        "name": name,
        "path": format!("src/{name}"),
        "html_url": format!("https://github.com/{repo}/blob/main/src/{name}"),
        "repository": {"full_name": repo},
        "text_matches": fragments
            .iter()
            .map(|f| json!({"fragment": f}))
            .collect::<Vec<_>>(),
    })
}

#[tokio::test]
async fn search_requests_single_text_match_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .and(query_param("q", "spawn language:rust"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .and(header("accept", TEXT_MATCH_MEDIA_TYPE))
        .and(header("authorization", "token ghp_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 5000,
            "incomplete_results": false,
            "items": [
                code_item("task.rs", "tokio-rs/tokio", &["pub fn spawn<F>"]),
                code_item("lib.rs", "smol-rs/smol", &[]),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("ghp_test"));
    let hits = client
        .search(&RequestContext::new(), "spawn", "rust")
        .await
        .expect("search");

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].name, "task.rs");
    assert_eq!(hits[0].repository_id, "tokio-rs/tokio");
    assert_eq!(hits[0].fragments, ["pub fn spawn<F>"]);
    assert!(hits[1].fragments.is_empty());
}

#[tokio::test]
async fn search_maps_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .search(&RequestContext::new(), "", "rust")
        .await
        .unwrap_err();

    assert!(matches!(err, RefineError::Status { status: 422, .. }));
}

#[tokio::test]
async fn search_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .search(&RequestContext::new(), "x", "go")
        .await
        .unwrap_err();

    assert!(matches!(err, RefineError::Parse(_)));
}

#[tokio::test]
async fn search_stops_at_deadline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"total_count": 0, "items": []}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let ctx = RequestContext::with_timeout(Duration::from_millis(100));
    let err = client_for(&server, None)
        .search(&ctx, "x", "go")
        .await
        .unwrap_err();

    assert!(matches!(err, RefineError::DeadlineExceeded));
}

#[tokio::test]
async fn score_is_stargazer_count() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/tokio-rs/tokio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "full_name": "tokio-rs/tokio",
            "stargazers_count": 27000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let score = client_for(&server, None)
        .fetch_score(&RequestContext::new(), "tokio-rs/tokio")
        .await
        .expect("score");

    assert!(score.fetch_succeeded);
    assert!((score.score - 27000.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn missing_repository_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/gone/away"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .fetch_score(&RequestContext::new(), "gone/away")
        .await
        .unwrap_err();

    assert!(matches!(err, RefineError::Status { status: 404, .. }));
}

#[tokio::test]
async fn refine_against_github_absorbs_failed_lookups() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/small/one"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "full_name": "small/one",
            "stargazers_count": 3
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/big/one"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "full_name": "big/one",
            "stargazers_count": 900
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/broken/one"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let raw: Vec<code_refine::SearchHit> = [
        ("a.rs", "broken/one", "needle"),
        ("b.rs", "small/one", "needle"),
        ("c.rs", "big/one", "needle"),
        ("d.rs", "small/one", "needle"),
        ("e.rs", "big/one", "no match"),
    ]
    .into_iter()
    .map(|(name, repo, fragment)| {
        serde_json::from_value(json!({
            "name": name,
            "path": name,
            "file_url": format!("https://github.com/{repo}/blob/main/{name}"),
            "repository_id": repo,
            "fragments": [fragment],
        }))
        .expect("hit")
    })
    .collect();

    let out = refine(&RequestContext::new(), &raw, "needle", 20, client)
        .await
        .expect("refine");

    let names: Vec<_> = out.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, ["c.rs", "b.rs", "d.rs", "a.rs"]);
}
