//! Ticket search types shared by every tracker implementation.

use serde::{Deserialize, Serialize};
use url::Url;
use zeroize::Zeroizing;

/// A normalized ticket as returned to API clients.
///
/// `assignee` and `priority` are omitted from JSON when the tracker has
/// none for the issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub key: String,
    pub summary: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

/// What to search for and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Tracker root, e.g. `https://jira.example.com` or `https://host/jira`.
    pub base_url: Url,
    /// JQL expression.
    pub jql: String,
    /// Upper bound on returned tickets.
    pub max_results: u32,
}

impl SearchQuery {
    /// Absolute URL for `path` below the tracker root.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}

/// Username and API token (or password) for the tracker.
///
/// Custom `Debug` implementation redacts the token. The token buffer is
/// zeroed on drop.
#[derive(Clone)]
pub struct TrackerCredentials {
    pub username: String,
    pub api_token: Zeroizing<String>,
}

impl TrackerCredentials {
    pub fn new(username: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_token: Zeroizing::new(api_token.into()),
        }
    }
}

impl std::fmt::Debug for TrackerCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerCredentials")
            .field("username", &self.username)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}
