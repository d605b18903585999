//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps store and tracker errors to HTTP status codes and a JSON body with
//! error code, message, and optional details. Internal error details are
//! logged, never returned.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use relcal_core::Fingerprint;
use relcal_store::StoreError;
use relcal_tracker::{TrackerError, TrackerConfigError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "PRECONDITION_FAILED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for some client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// No such endpoint or resource (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Missing or malformed request parameters (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Request body is not JSON (400).
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Document failed its shape check (400).
    #[error("schema validation failed: {0}")]
    SchemaInvalid(String),

    /// Stale `If-Match` (412). The response carries the current `ETag`.
    #[error("precondition failed")]
    PreconditionFailed { current: Fingerprint },

    /// The issue tracker rejected the configured credentials (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The issue tracker failed or was unreachable (502).
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::InvalidJson(_) => (StatusCode::BAD_REQUEST, "INVALID_JSON"),
            Self::SchemaInvalid(_) => (StatusCode::BAD_REQUEST, "SCHEMA_INVALID"),
            Self::PreconditionFailed { .. } => (StatusCode::PRECONDITION_FAILED, "PRECONDITION_FAILED"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let details = match &self {
            Self::PreconditionFailed { current } => {
                Some(serde_json::json!({ "currentEtag": current.as_str() }))
            }
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if let Self::PreconditionFailed { current } = &self {
            if let Ok(value) = HeaderValue::from_str(current.as_str()) {
                response.headers_mut().insert(header::ETAG, value);
            }
        }
        response
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidJson(e) => Self::InvalidJson(e.to_string()),
            StoreError::SchemaInvalid(e) => Self::SchemaInvalid(e.to_string()),
            StoreError::PreconditionFailed { current } => Self::PreconditionFailed { current },
            StoreError::InvalidFilename(_) => Self::BadRequest(err.to_string()),
            StoreError::Io { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        tracing::warn!(error = %err, "ticket search failed");
        match &err {
            TrackerError::Authentication { .. } => Self::Unauthorized(err.client_message()),
            TrackerError::Config(_) => Self::Internal(err.to_string()),
            _ => Self::Upstream(err.client_message()),
        }
    }
}

impl From<TrackerConfigError> for AppError {
    fn from(err: TrackerConfigError) -> Self {
        TrackerError::from(err).into()
    }
}
