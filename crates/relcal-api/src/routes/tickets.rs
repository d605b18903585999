//! # Ticket Search API
//!
//! `GET /api/jira-tickets` reads the `jira-config` side document on every
//! request. Without a config file, or without a username and token in it,
//! the answer is an empty list and the tracker is never contacted.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use relcal_core::DocumentName;
use relcal_tracker::{Ticket, TrackerSettings};

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Build the tickets router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/jira-tickets", get(list_tickets))
}

/// GET /api/jira-tickets — Search the configured issue tracker.
#[utoipa::path(
    get,
    path = "/api/jira-tickets",
    responses(
        (status = 200, description = "Normalized tickets; empty when the tracker is not configured"),
        (status = 401, description = "Tracker rejected the configured credentials", body = ErrorBody),
        (status = 502, description = "Tracker search failed or was unreachable", body = ErrorBody),
    ),
    tag = "tickets"
)]
pub async fn list_tickets(State(state): State<AppState>) -> Result<Json<Vec<Ticket>>, AppError> {
    let raw = state
        .with_store(|store| store.read_current(&DocumentName::tracker_config()))
        .await?;
    let Some(raw) = raw else {
        tracing::debug!("no tracker config; returning no tickets");
        return Ok(Json(Vec::new()));
    };

    let settings = TrackerSettings::from_slice(&raw)?;
    let Some(credentials) = settings.credentials() else {
        tracing::debug!("tracker credentials not configured; returning no tickets");
        return Ok(Json(Vec::new()));
    };
    let query = settings.query()?;

    let tickets = state.tracker.search_issues(&query, &credentials).await?;
    Ok(Json(tickets))
}
