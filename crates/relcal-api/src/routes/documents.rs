//! # Document API
//!
//! One endpoint per served document, `/api/<name>.json`.
//!
//! - `GET`  returns the current bytes (or `{}`) with their `ETag`.
//! - `POST` replaces the document. `If-Match` makes the write conditional;
//!   `X-Max-Backups` overrides the retention limit for this write.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use axum::routing::get;
use axum::{Json, Router};
use relcal_core::{DocumentName, Fingerprint};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::extractors::{if_match, max_backups};
use crate::state::AppState;

/// Documents reachable over HTTP. The tracker side document is not among them.
pub const SERVED_DOCUMENTS: [&str; 3] = [
    DocumentName::ENVIRONMENTS,
    DocumentName::RELEASES,
    DocumentName::HOLIDAYS,
];

/// Body returned by a successful write.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WriteResponse {
    pub success: bool,
    pub message: String,
    /// Backup taken of the previous version, if the document existed.
    pub backup: Option<String>,
}

/// Build the documents router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/:file", get(get_document).post(post_document))
}

/// Resolve `<name>.json` to a served document.
fn served(file: &str) -> Result<DocumentName, AppError> {
    DocumentName::from_file_name(file)
        .ok()
        .filter(|name| SERVED_DOCUMENTS.contains(&name.as_str()))
        .ok_or_else(|| AppError::NotFound(format!("no document endpoint /api/{file}")))
}

fn etag(fp: &Fingerprint) -> Result<(HeaderName, HeaderValue), AppError> {
    let value = HeaderValue::from_str(fp.as_str())
        .map_err(|e| AppError::Internal(format!("unrepresentable ETag {fp}: {e}")))?;
    Ok((header::ETAG, value))
}

/// GET /api/{file} — Read a document.
#[utoipa::path(
    get,
    path = "/api/{file}",
    params(("file" = String, Path, description = "environments.json, releases.json or holidays.json")),
    responses(
        (status = 200, description = "Current document content; `{}` if never written", content_type = "application/json"),
        (status = 404, description = "Not a served document", body = ErrorBody),
    ),
    tag = "documents"
)]
pub async fn get_document(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<([(HeaderName, HeaderValue); 2], Vec<u8>), AppError> {
    let name = served(&file)?;
    let (bytes, fp) = state.with_store(move |store| store.read_with_fingerprint(&name)).await?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            etag(&fp)?,
        ],
        bytes,
    ))
}

/// POST /api/{file} — Replace a document.
#[utoipa::path(
    post,
    path = "/api/{file}",
    params(
        ("file" = String, Path, description = "environments.json, releases.json or holidays.json"),
        ("If-Match" = Option<String>, Header, description = "Fingerprint the write is conditional on"),
        ("X-Max-Backups" = Option<u32>, Header, description = "Backups to keep for this document (default 10)"),
    ),
    request_body(content = String, description = "New JSON document", content_type = "application/json"),
    responses(
        (status = 200, description = "Document written; `ETag` holds the new fingerprint", body = WriteResponse),
        (status = 400, description = "Invalid JSON or failed shape check", body = ErrorBody),
        (status = 404, description = "Not a served document", body = ErrorBody),
        (status = 412, description = "Stale If-Match; `ETag` holds the current fingerprint", body = ErrorBody),
    ),
    tag = "documents"
)]
pub async fn post_document(
    State(state): State<AppState>,
    Path(file): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<([(HeaderName, HeaderValue); 1], Json<WriteResponse>), AppError> {
    let name = served(&file)?;
    let precondition = if_match(&headers);
    let max = max_backups(&headers, state.store.default_max_backups());

    let outcome = state
        .with_store(move |store| store.write(&name, &body, precondition.as_ref(), max))
        .await?;

    Ok((
        [etag(&outcome.fingerprint)?],
        Json(WriteResponse {
            success: true,
            message: "Data saved successfully".into(),
            backup: outcome.backup,
        }),
    ))
}
