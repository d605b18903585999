//! # relcal-api — HTTP Service for Release Calendar Documents
//!
//! Serves a handful of named JSON documents with optimistic concurrency,
//! exposes their backups, and proxies ticket search to an issue tracker.
//!
//! ## API Surface
//!
//! | Path                    | Module                    | Methods        |
//! |-------------------------|---------------------------|----------------|
//! | `/api/{name}.json`      | [`routes::documents`]     | GET, POST      |
//! | `/api/backups`          | [`routes::backups`]       | GET, DELETE    |
//! | `/api/backups/verify`   | [`routes::backups`]       | GET            |
//! | `/api/backup-settings`  | [`routes::settings`]      | GET            |
//! | `/api/jira-tickets`     | [`routes::tickets`]       | GET            |
//! | `/openapi.json`         | [`openapi`]               | GET            |
//! | `/health/*`             | this module               | GET            |
//!
//! Any other path is served from the static directory when one is
//! configured, and is a 404 otherwise.
//!
//! ## Middleware Stack
//!
//! ```text
//! TraceLayer → Router → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    let api = Router::new()
        .merge(routes::documents::router())
        .merge(routes::backups::router())
        .merge(routes::settings::router())
        .merge(routes::tickets::router())
        .merge(openapi::router());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    let mut router = Router::new().merge(health).merge(api).with_state(state);
    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }
    router.layer(middleware::tracing_layer::layer())
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — 200 once the data directory is reachable.
async fn readiness(State(state): State<AppState>) -> Result<&'static str, (StatusCode, &'static str)> {
    match tokio::fs::metadata(state.store.data_dir()).await {
        Ok(meta) if meta.is_dir() => Ok("ready"),
        _ => Err((StatusCode::SERVICE_UNAVAILABLE, "data directory unavailable")),
    }
}
