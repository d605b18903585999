//! Contract tests for JiraClient against a mock Jira server.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | POST   | `/rest/auth/1/session` | `login_*`, `search_*` |
//! | GET    | `/rest/api/2/search`   | `search_*` |

use std::time::Duration;

use relcal_tracker::{IssueTracker, JiraClient, SearchQuery, TrackerCredentials, TrackerError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> JiraClient {
    JiraClient::new(Duration::from_secs(5)).unwrap()
}

fn query(server: &MockServer) -> SearchQuery {
    SearchQuery {
        base_url: server.uri().parse().unwrap(),
        jql: "project = REL".into(),
        max_results: 20,
    }
}

fn creds() -> TrackerCredentials {
    TrackerCredentials::new("release-bot", "s3cret")
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/rest/auth/1/session"))
        .and(body_json(serde_json::json!({"username": "release-bot", "password": "s3cret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "session": {"name": "JSESSIONID", "value": "abc123"},
            "loginInfo": {"failedLoginCount": 0, "loginCount": 12}
        })))
        .expect(1)
        .mount(server)
        .await;
}

// ── Search ───────────────────────────────────────────────────────────

#[tokio::test]
async fn search_sends_cookie_and_normalizes_issues() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("jql", "project = REL"))
        .and(query_param("maxResults", "20"))
        .and(header("cookie", "JSESSIONID=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "startAt": 0,
            "maxResults": 20,
            "total": 2,
            "issues": [
                {
                    "key": "REL-1",
                    "fields": {
                        "summary": "Cut 2025.04 branch",
                        "status": {"name": "Open"},
                        "assignee": {"displayName": "Alice Example"},
                        "priority": {"name": "High"}
                    }
                },
                {
                    "key": "REL-2",
                    "fields": {
                        "summary": "Update holidays",
                        "status": {"name": "Done"},
                        "assignee": null,
                        "priority": null
                    }
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tickets = client().search_issues(&query(&server), &creds()).await.unwrap();
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0].key, "REL-1");
    assert_eq!(tickets[0].assignee.as_deref(), Some("Alice Example"));
    assert_eq!(tickets[0].priority.as_deref(), Some("High"));
    assert_eq!(tickets[1].status, "Done");
    assert_eq!(tickets[1].assignee, None);

    let json = serde_json::to_value(&tickets[1]).unwrap();
    assert!(json.get("assignee").is_none());
}

#[tokio::test]
async fn search_with_no_issues_returns_empty_list() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"issues": []})))
        .mount(&server)
        .await;

    let tickets = client().search_issues(&query(&server), &creds()).await.unwrap();
    assert!(tickets.is_empty());
}

#[tokio::test]
async fn search_under_context_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jira/rest/auth/1/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "session": {"name": "JSESSIONID", "value": "ctx"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jira/rest/api/2/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"issues": []})))
        .expect(1)
        .mount(&server)
        .await;

    let q = SearchQuery {
        base_url: format!("{}/jira/", server.uri()).parse().unwrap(),
        jql: String::new(),
        max_results: 5,
    };
    client().search_issues(&q, &creds()).await.unwrap();
}

#[tokio::test]
async fn search_forbidden_maps_to_api_error() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(ResponseTemplate::new(403).set_body_string("no browse permission"))
        .mount(&server)
        .await;

    let err = client().search_issues(&query(&server), &creds()).await.unwrap_err();
    match &err {
        TrackerError::ApiError { status, body, .. } => {
            assert_eq!(*status, 403);
            assert_eq!(body, "no browse permission");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
    assert_eq!(err.client_message(), "Jira access forbidden - check user permissions");
}

#[tokio::test]
async fn search_malformed_body_is_deserialization_error() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client().search_issues(&query(&server), &creds()).await.unwrap_err();
    assert!(matches!(err, TrackerError::Deserialization { .. }));
}

// ── Login ────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_rejected_is_authentication_error_and_skips_search() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/auth/1/session"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "errorMessages": ["Login failed"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client().search_issues(&query(&server), &creds()).await.unwrap_err();
    assert!(err.is_authentication());
    assert!(!err.client_message().contains("s3cret"));
}
