//! # Jira Client
//!
//! [`IssueTracker`] over the Jira REST API using session-cookie
//! authentication.
//!
//! | Step | Call |
//! |------|------|
//! | login  | `POST {base}/rest/auth/1/session` with `{"username","password"}` |
//! | search | `GET {base}/rest/api/2/search?jql=..&maxResults=..` with the session cookie |
//!
//! A fresh session is opened per search. Login rejections surface as
//! [`TrackerError::Authentication`]; search failures as
//! [`TrackerError::ApiError`] with the upstream status.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::retry::retry_send;
use crate::types::{SearchQuery, Ticket, TrackerCredentials};
use crate::{IssueTracker, TrackerFuture};

const SESSION_PATH: &str = "/rest/auth/1/session";
const SEARCH_PATH: &str = "/rest/api/2/search";
const SEARCH_FIELDS: &str = "summary,status,assignee,priority";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// -- Wire types ---------------------------------------------------------------

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    session: SessionInfo,
}

#[derive(Deserialize)]
struct SessionInfo {
    name: String,
    value: String,
}

impl SessionInfo {
    fn cookie(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<Issue>,
}

#[derive(Deserialize)]
struct Issue {
    key: String,
    #[serde(default)]
    fields: IssueFields,
}

#[derive(Default, Deserialize)]
struct IssueFields {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    status: Option<Named>,
    #[serde(default)]
    assignee: Option<Person>,
    #[serde(default)]
    priority: Option<Named>,
}

#[derive(Deserialize)]
struct Named {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Person {
    #[serde(default)]
    display_name: String,
}

impl Issue {
    fn into_ticket(self) -> Ticket {
        let f = self.fields;
        Ticket {
            key: self.key,
            summary: f.summary.unwrap_or_default(),
            status: f.status.map(|s| s.name).unwrap_or_default(),
            assignee: f.assignee.map(|a| a.display_name),
            priority: f.priority.map(|p| p.name),
        }
    }
}

// -- Client -------------------------------------------------------------------

/// Jira REST client.
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: reqwest::Client,
}

impl JiraClient {
    /// Create a client whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TrackerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrackerError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self { http })
    }

    /// Open a session and return the cookie to send with later calls.
    async fn login(
        &self,
        query: &SearchQuery,
        credentials: &TrackerCredentials,
    ) -> Result<String, TrackerError> {
        let endpoint = "POST /rest/auth/1/session";
        let url = query.endpoint(SESSION_PATH);
        let body = LoginRequest {
            username: &credentials.username,
            password: credentials.api_token.as_str(),
        };

        let resp = retry_send(endpoint, || self.http.post(&url).json(&body).send())
            .await
            .map_err(|e| TrackerError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TrackerError::Authentication { status, body });
        }

        let login: LoginResponse = resp.json().await.map_err(|e| TrackerError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })?;
        Ok(login.session.cookie())
    }

    async fn search(&self, query: &SearchQuery, cookie: &str) -> Result<Vec<Ticket>, TrackerError> {
        let endpoint = "GET /rest/api/2/search";
        let url = query.endpoint(SEARCH_PATH);
        let max_results = query.max_results.to_string();
        let params = [
            ("jql", query.jql.as_str()),
            ("maxResults", max_results.as_str()),
            ("fields", SEARCH_FIELDS),
        ];

        let resp = retry_send(endpoint, || {
            self.http
                .get(&url)
                .query(&params)
                .header(reqwest::header::COOKIE, cookie)
                .send()
        })
        .await
        .map_err(|e| TrackerError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, jql = %query.jql, base_url = %query.base_url, "Jira search failed");
            return Err(TrackerError::ApiError {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let page: SearchResponse = resp.json().await.map_err(|e| TrackerError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })?;
        Ok(page.issues.into_iter().map(Issue::into_ticket).collect())
    }
}

impl IssueTracker for JiraClient {
    fn search_issues<'a>(
        &'a self,
        query: &'a SearchQuery,
        credentials: &'a TrackerCredentials,
    ) -> TrackerFuture<'a, Vec<Ticket>> {
        Box::pin(async move {
            tracing::info!(base_url = %query.base_url, user = %credentials.username, "connecting to Jira");
            let cookie = self.login(query, credentials).await?;
            let tickets = self.search(query, &cookie).await?;
            tracing::info!(count = tickets.len(), "fetched tickets from Jira");
            Ok(tickets)
        })
    }

    fn tracker_name(&self) -> &str {
        "jira"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_normalization_keeps_optional_fields_optional() {
        let issue: Issue = serde_json::from_value(serde_json::json!({
            "key": "REL-3",
            "fields": {
                "summary": "Ship it",
                "status": {"name": "In Progress"},
                "assignee": null,
                "priority": {"name": "Major"}
            }
        }))
        .unwrap();
        let ticket = issue.into_ticket();
        assert_eq!(ticket.key, "REL-3");
        assert_eq!(ticket.status, "In Progress");
        assert_eq!(ticket.assignee, None);
        assert_eq!(ticket.priority.as_deref(), Some("Major"));
    }

    #[test]
    fn issue_without_fields_normalizes_to_blanks() {
        let issue: Issue = serde_json::from_value(serde_json::json!({"key": "REL-4"})).unwrap();
        let ticket = issue.into_ticket();
        assert_eq!(ticket.summary, "");
        assert_eq!(ticket.status, "");
    }

    #[test]
    fn session_cookie_format() {
        let s = SessionInfo {
            name: "JSESSIONID".into(),
            value: "abc123".into(),
        };
        assert_eq!(s.cookie(), "JSESSIONID=abc123");
    }
}
