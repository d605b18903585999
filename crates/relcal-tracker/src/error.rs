//! Tracker client error types.

/// Errors from tracker calls.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The tracker refused the session login.
    #[error("tracker authentication returned {status}: {body}")]
    Authentication { status: u16, body: String },
    /// The tracker returned a non-2xx status.
    #[error("tracker {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] TrackerConfigError),
}

impl TrackerError {
    /// Whether the tracker rejected the credentials at login.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Message suitable for showing to API clients. Never includes the
    /// response body or credentials.
    pub fn client_message(&self) -> String {
        match self {
            Self::Authentication { .. } => {
                "Jira authentication failed - check username and password".into()
            }
            Self::ApiError { status: 401, .. } => {
                "Jira authentication failed - check username and password/token".into()
            }
            Self::ApiError { status: 403, .. } => {
                "Jira access forbidden - check user permissions".into()
            }
            Self::ApiError { status: 404, .. } => {
                "Jira project not found - check project key".into()
            }
            Self::ApiError { status, .. } => format!("Jira API error: {status}"),
            Self::Http { .. } => "Failed to connect to Jira server".into(),
            Self::Deserialization { .. } => "Unexpected response from Jira".into(),
            Self::Config(_) => "Invalid Jira config".into(),
        }
    }
}

/// Problems with the `jira-config` document.
#[derive(Debug, thiserror::Error)]
pub enum TrackerConfigError {
    #[error("tracker config is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("tracker config has credentials but no baseUrl")]
    MissingBaseUrl,
    #[error("invalid tracker baseUrl {0}: {1}")]
    InvalidUrl(String, String),
}
