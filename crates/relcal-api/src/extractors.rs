//! # Request Helpers
//!
//! Header parsing for the document write path and a JSON body helper that
//! maps parse errors to [`AppError::BadRequest`].

use axum::http::HeaderMap;
use relcal_core::Precondition;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Header carrying a per-request backup retention limit.
pub const MAX_BACKUPS_HEADER: &str = "x-max-backups";

/// Decode a JSON request body whatever its `Content-Type`.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("invalid request body: {e}")))
}

/// The `If-Match` precondition, if the request sent a usable one.
///
/// A header that is not valid UTF-8 is treated as absent, like an empty one.
pub fn if_match(headers: &HeaderMap) -> Option<Precondition> {
    headers
        .get(axum::http::header::IF_MATCH)
        .and_then(|v| v.to_str().ok())
        .and_then(Precondition::parse)
}

/// Retention limit from `X-Max-Backups`: a positive integer, otherwise `default`.
pub fn max_backups(headers: &HeaderMap, default: usize) -> usize {
    headers
        .get(MAX_BACKUPS_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}
