//! Tracker settings, parsed from the `jira-config` side document.
//!
//! ```json
//! {
//!   "baseUrl": "https://jira.example.com",
//!   "username": "release-bot",
//!   "apiToken": "...",
//!   "jql": "project = REL ORDER BY duedate",
//!   "maxResults": 50
//! }
//! ```
//!
//! Every key is optional at parse time. Missing or empty `username` /
//! `apiToken` means "not configured"; a missing `baseUrl` is only an error
//! once credentials are present.

use serde::{Deserialize, Deserializer};
use url::Url;
use zeroize::Zeroizing;

use crate::error::TrackerConfigError;
use crate::types::{SearchQuery, TrackerCredentials};

/// `maxResults` when the document leaves it out.
pub const DEFAULT_MAX_RESULTS: u32 = 50;

/// Contents of the `jira-config` document.
///
/// Custom `Debug` implementation redacts `api_token`.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSettings {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "secret")]
    pub api_token: Option<Zeroizing<String>>,
    #[serde(default)]
    pub jql: String,
    #[serde(default)]
    pub max_results: Option<u32>,
}

fn secret<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Zeroizing<String>>, D::Error> {
    Ok(Option::<String>::deserialize(d)?.map(Zeroizing::new))
}

impl std::fmt::Debug for TrackerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerSettings")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("jql", &self.jql)
            .field("max_results", &self.max_results)
            .finish()
    }
}

impl TrackerSettings {
    /// Parse the raw bytes of the side document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TrackerConfigError> {
        serde_json::from_slice(bytes).map_err(TrackerConfigError::Malformed)
    }

    /// Credentials, if both username and token are present and non-empty.
    pub fn credentials(&self) -> Option<TrackerCredentials> {
        let username = self.username.as_deref().filter(|u| !u.is_empty())?;
        let token = self.api_token.as_ref().filter(|t| !t.is_empty())?;
        Some(TrackerCredentials {
            username: username.to_string(),
            api_token: token.clone(),
        })
    }

    /// The search to run.
    pub fn query(&self) -> Result<SearchQuery, TrackerConfigError> {
        let raw = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(TrackerConfigError::MissingBaseUrl)?;
        let base_url = Url::parse(raw)
            .map_err(|e| TrackerConfigError::InvalidUrl(raw.to_string(), e.to_string()))?;
        Ok(SearchQuery {
            base_url,
            jql: self.jql.clone(),
            max_results: self.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
        })
    }
}
