//! # OpenAPI Specification Assembly
//!
//! Collects the utoipa-documented handlers into one OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "relcal API",
        version = "0.1.0",
        description = "Versioned JSON documents for release planning, with conditional writes, timestamped backups, and ticket search.",
        license(name = "MIT")
    ),
    paths(
        // Documents
        crate::routes::documents::get_document,
        crate::routes::documents::post_document,
        // Backups
        crate::routes::backups::get_backups,
        crate::routes::backups::delete_backup,
        crate::routes::backups::verify_backup,
        crate::routes::settings::get_backup_settings,
        // Tickets
        crate::routes::tickets::list_tickets,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::documents::WriteResponse,
        crate::routes::backups::BackupContentResponse,
        crate::routes::backups::DeleteBackupRequest,
        crate::routes::backups::DeleteBackupResponse,
        crate::routes::settings::BackupSettings,
    )),
    tags(
        (name = "documents", description = "Served JSON documents"),
        (name = "backups", description = "Document backups and retention"),
        (name = "tickets", description = "Issue tracker search"),
    )
)]
pub struct ApiDoc;

/// Router serving the OpenAPI JSON document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_endpoint() {
        let spec = ApiDoc::openapi();
        for path in [
            "/api/{file}",
            "/api/backups",
            "/api/backups/verify",
            "/api/backup-settings",
            "/api/jira-tickets",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn spec_serializes_to_json() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert_eq!(json["info"]["title"], "relcal API");
    }
}
