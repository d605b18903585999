//! # relcal-tracker -- Issue tracker client
//!
//! Read-only ticket search against an external issue tracker. The API layer
//! only sees the [`IssueTracker`] trait, so tests swap in a canned tracker
//! and production wires up [`JiraClient`].
//!
//! ## Flow
//!
//! 1. The caller loads [`TrackerSettings`] from the `jira-config` document.
//! 2. No credentials means no search: the caller answers with an empty list.
//! 3. Otherwise [`TrackerSettings::query`] yields the [`SearchQuery`] and
//!    [`IssueTracker::search_issues`] authenticates and runs it.
//!
//! Tracker credentials are never process configuration. They live in the
//! side document and are re-read on every request.

pub mod config;
pub mod error;
pub mod jira;
pub(crate) mod retry;
pub mod types;

pub use config::TrackerSettings;
pub use error::{TrackerConfigError, TrackerError};
pub use jira::JiraClient;
pub use types::{SearchQuery, Ticket, TrackerCredentials};

use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`IssueTracker`] methods.
pub type TrackerFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TrackerError>> + Send + 'a>>;

/// A source of tickets.
///
/// Object-safe so it can be shared as `Arc<dyn IssueTracker>` across
/// request handlers.
pub trait IssueTracker: Send + Sync {
    /// Authenticate with `credentials` and return the tickets matching `query`.
    fn search_issues<'a>(
        &'a self,
        query: &'a SearchQuery,
        credentials: &'a TrackerCredentials,
    ) -> TrackerFuture<'a, Vec<Ticket>>;

    /// Short name used in logs.
    fn tracker_name(&self) -> &str;
}
