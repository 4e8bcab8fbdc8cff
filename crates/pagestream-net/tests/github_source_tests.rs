//! Integration tests for the GitHub issues page source.

use pagestream_core::{
    FetchError, FetchOutcome, IssueState, PageRequest, PageSource, PagedList, QueryConfig,
    SortDirection, SortKey, ViewportConfig,
};
use pagestream_net::{GitHubConfig, GitHubIssueSource};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ISSUES_PATH: &str = "/repos/facebook/react/issues";

fn issue(id: u64, pull_request: bool) -> Value {
    let mut issue = json!({
        "id": id,
        "number": id + 1000,
        "title": format!("Issue {id}"),
        "body": "Steps to reproduce",
        "state": "open",
        "html_url": format!("https://github.com/facebook/react/issues/{}", id + 1000),
        "created_at": "2024-05-01T12:00:00Z",
        "updated_at": "2024-05-02T12:00:00Z",
        "comments": 3,
        "user": {"login": "octocat", "avatar_url": "https://avatars.githubusercontent.com/u/583231"},
        "labels": [{"id": 1, "name": "Type: Bug", "color": "b60205"}]
    });
    if pull_request {
        issue["pull_request"] = json!({"url": format!("https://api.github.com/repos/facebook/react/pulls/{id}")});
    }
    issue
}

fn page(ids: std::ops::Range<u64>, every_nth_is_pr: u64) -> Value {
    Value::Array(ids.map(|id| issue(id, id % every_nth_is_pr == 0)).collect())
}

fn source_for(server: &MockServer, token: Option<&str>) -> GitHubIssueSource {
    let mut config = GitHubConfig::default().with_api_base(server.uri());
    if let Some(token) = token {
        config = config.with_token(token);
    }
    GitHubIssueSource::new(config).expect("Failed to build source")
}

fn request(page: u32, query: QueryConfig) -> PageRequest {
    PageRequest {
        page,
        page_size: query.page_size,
        query,
    }
}

#[tokio::test]
async fn test_sends_query_parameters_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ISSUES_PATH))
        .and(query_param("state", "open"))
        .and(query_param("labels", "Type: Bug,Status: Unconfirmed"))
        .and(query_param("sort", "updated"))
        .and(query_param("direction", "asc"))
        .and(query_param("per_page", "30"))
        .and(query_param("page", "3"))
        .and(header("accept", "application/vnd.github.v3+json"))
        .and(header("authorization", "token ghp_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0..2, 1000)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server, Some("ghp_test"));
    let query = QueryConfig::new()
        .state(IssueState::Open)
        .label("Type: Bug")
        .label("Status: Unconfirmed")
        .sort(SortKey::Updated)
        .direction(SortDirection::Asc)
        .page_size(30);

    let issues = source
        .fetch_page(request(3, query))
        .await
        .expect("Request failed");
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[1].number, 1001);
}

#[tokio::test]
async fn test_unauthenticated_requests_omit_authorization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ISSUES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server, None);
    let issues = source
        .fetch_page(request(1, QueryConfig::default()))
        .await
        .expect("Request failed");
    assert!(issues.is_empty());

    let received = mock_server
        .received_requests()
        .await
        .expect("request recording is enabled");
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("authorization").is_none());
    // No label filter means no labels parameter.
    assert!(!received[0].url.query_pairs().any(|(key, _)| key == "labels"));
}

#[tokio::test]
async fn test_pull_requests_are_filtered_by_the_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ISSUES_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0..100, 10)))
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server, Some("ghp_test"));
    let mut list = PagedList::new(QueryConfig::default(), ViewportConfig::default());
    list.on_resize(800.0);

    let ticket = list.evaluate_prefetch().expect("first page is requested");
    let records = source.fetch_page(list.request_for(&ticket)).await;
    let outcome = list.complete_fetch(ticket, records).expect("page accepted");

    assert!(matches!(
        outcome,
        FetchOutcome::Appended {
            page: 1,
            received: 100,
            accepted: 90,
            exhausted: false
        }
    ));
    assert_eq!(list.len(), 90);
    assert_eq!(list.cursor(), 1);
    assert!(list.fetch_state().is_idle());
}

#[tokio::test]
async fn test_not_found_becomes_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ISSUES_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest/issues/issues#list-repository-issues"
        })))
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server, Some("ghp_test"));
    let err = source
        .fetch_page(request(1, QueryConfig::default()))
        .await
        .expect_err("404 must fail");

    assert_eq!(
        err,
        FetchError::Http {
            status: 404,
            message: "Not Found".to_string()
        }
    );
}

#[tokio::test]
async fn test_exhausted_rate_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ISSUES_PATH))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-limit", "60")
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("retry-after", "120")
                .set_body_json(json!({"message": "API rate limit exceeded"})),
        )
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server, None);
    let err = source
        .fetch_page(request(1, QueryConfig::default()))
        .await
        .expect_err("rate limited request must fail");

    assert_eq!(
        err,
        FetchError::RateLimited {
            retry_after_secs: Some(120)
        }
    );
}

#[tokio::test]
async fn test_forbidden_without_rate_limit_is_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ISSUES_PATH))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "4999")
                .set_body_string("Resource not accessible by integration"),
        )
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server, Some("ghp_test"));
    let err = source
        .fetch_page(request(1, QueryConfig::default()))
        .await
        .expect_err("403 must fail");

    assert!(matches!(err, FetchError::Http { status: 403, .. }));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ISSUES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server, Some("ghp_test"));
    let err = source
        .fetch_page(request(1, QueryConfig::default()))
        .await
        .expect_err("an object is not a page");

    assert!(matches!(err, FetchError::Decode(_)));
}
