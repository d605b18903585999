//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Holds the document store and the issue
//! tracker behind `Arc`s so cloning per request is cheap.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use relcal_store::{DocumentStore, StoreConfig, StoreError};
use relcal_tracker::IssueTracker;

use crate::error::AppError;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default timeout for issue tracker requests.
pub const DEFAULT_TRACKER_TIMEOUT_SECS: u64 = 30;

/// Process configuration for the HTTP service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: IpAddr,
    /// TCP port to listen on.
    pub port: u16,
    /// Document and backup locations.
    pub store: StoreConfig,
    /// Directory served for paths no API route claims.
    pub static_dir: Option<PathBuf>,
    /// Timeout for each issue tracker request.
    pub tracker_timeout_secs: u64,
}

impl AppConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            store: StoreConfig::default(),
            static_dir: None,
            tracker_timeout_secs: DEFAULT_TRACKER_TIMEOUT_SECS,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<DocumentStore>,
    pub tracker: Arc<dyn IssueTracker>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("tracker", &self.tracker.tracker_name())
            .finish()
    }
}

impl AppState {
    pub fn new(config: AppConfig, store: DocumentStore, tracker: Arc<dyn IssueTracker>) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            tracker,
        }
    }

    /// Run a store operation on the blocking thread pool.
    ///
    /// The store does synchronous file I/O and must not run on the async
    /// worker threads.
    pub async fn with_store<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&DocumentStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| AppError::Internal(format!("store task failed: {e}")))?
            .map_err(AppError::from)
    }
}
