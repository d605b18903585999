//! # Backup Settings API
//!
//! Read-only view of the retention defaults the service was started with.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupSettings {
    /// Backups kept per document when a write does not say otherwise.
    pub max_backups: usize,
    /// Backup directory as configured.
    pub backup_dir: String,
}

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/backup-settings", get(get_backup_settings))
}

/// GET /api/backup-settings — Current backup settings.
#[utoipa::path(
    get,
    path = "/api/backup-settings",
    responses((status = 200, description = "Backup settings", body = BackupSettings)),
    tag = "backups"
)]
pub async fn get_backup_settings(State(state): State<AppState>) -> Json<BackupSettings> {
    Json(BackupSettings {
        max_backups: state.store.default_max_backups(),
        backup_dir: state.store.backups().dir().display().to_string(),
    })
}
