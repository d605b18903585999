//! # Backup API
//!
//! ## Endpoints
//!
//! - `GET    /api/backups?prefix=<p>`          — List backup file names
//! - `GET    /api/backups?filename=<f>`        — Fetch one backup with its checksum
//! - `DELETE /api/backups` `{"filename": ..}`  — Delete one backup
//! - `GET    /api/backups/verify?filename=<f>` — Check a backup against its sidecar
//!
//! `filename` wins when both query parameters are given. File names are
//! stripped of directory components before they touch the filesystem.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use relcal_store::IntegrityStatus;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, ErrorBody};
use crate::extractors::parse_json;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/backups`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BackupQuery {
    /// Backup to fetch.
    pub filename: Option<String>,
    /// File name prefix to list, e.g. `releases`.
    pub prefix: Option<String>,
}

/// A single backup's content.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BackupContentResponse {
    pub filename: String,
    /// Fingerprint of the raw backup bytes, in `ETag` form.
    pub checksum: String,
    /// Backup bytes as text.
    pub content: String,
}

/// Body of `DELETE /api/backups`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteBackupRequest {
    #[serde(default)]
    pub filename: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteBackupResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
}

/// Query parameters for `GET /api/backups/verify`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VerifyQuery {
    pub filename: Option<String>,
}

/// Integrity check result. `status` is `verified`, `mismatch` or `missing_sidecar`.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub filename: String,
    #[serde(flatten)]
    pub integrity: IntegrityStatus,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the backups router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/backups", get(get_backups).delete(delete_backup))
        .route("/api/backups/verify", get(verify_backup))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/backups — List backups by prefix, or fetch one by file name.
#[utoipa::path(
    get,
    path = "/api/backups",
    params(BackupQuery),
    responses(
        (status = 200, description = "File name list for `prefix`, or the backup for `filename`", body = BackupContentResponse),
        (status = 400, description = "Neither parameter given, or an unusable file name", body = ErrorBody),
    ),
    tag = "backups"
)]
pub async fn get_backups(
    State(state): State<AppState>,
    Query(query): Query<BackupQuery>,
) -> Result<Response, AppError> {
    if let Some(filename) = non_empty(query.filename) {
        let backup = state
            .with_store(move |store| store.backups().fetch(&filename))
            .await?;
        return Ok(Json(BackupContentResponse {
            filename: backup.filename,
            checksum: backup.checksum.as_str().to_string(),
            content: String::from_utf8_lossy(&backup.content).into_owned(),
        })
        .into_response());
    }

    let prefix = non_empty(query.prefix)
        .ok_or_else(|| AppError::BadRequest("missing 'prefix' parameter".into()))?;
    let names = state
        .with_store(move |store| store.backups().list(&prefix))
        .await?;
    Ok(Json(names).into_response())
}

/// DELETE /api/backups — Delete one backup.
#[utoipa::path(
    delete,
    path = "/api/backups",
    request_body = DeleteBackupRequest,
    responses(
        (status = 200, description = "Backup deleted", body = DeleteBackupResponse),
        (status = 400, description = "Missing or unusable file name", body = ErrorBody),
    ),
    tag = "backups"
)]
pub async fn delete_backup(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DeleteBackupResponse>, AppError> {
    let req: DeleteBackupRequest = parse_json(&body)?;
    if req.filename.is_empty() {
        return Err(AppError::BadRequest("missing filename".into()));
    }
    let filename = state
        .with_store(move |store| store.backups().delete(&req.filename))
        .await?;
    Ok(Json(DeleteBackupResponse {
        success: true,
        message: "Backup deleted successfully".into(),
        filename,
    }))
}

/// GET /api/backups/verify — Check a backup against its integrity sidecar.
#[utoipa::path(
    get,
    path = "/api/backups/verify",
    params(VerifyQuery),
    responses(
        (status = 200, description = "Integrity status: verified, mismatch or missing_sidecar"),
        (status = 400, description = "Missing or unusable file name", body = ErrorBody),
    ),
    tag = "backups"
)]
pub async fn verify_backup(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<VerifyResponse>, AppError> {
    let filename = non_empty(query.filename)
        .ok_or_else(|| AppError::BadRequest("missing 'filename' parameter".into()))?;
    let (filename, integrity) = state
        .with_store(move |store| {
            let status = store.backups().verify(&filename)?;
            Ok((filename, status))
        })
        .await?;
    Ok(Json(VerifyResponse { filename, integrity }))
}
