//! # API Route Modules
//!
//! - `documents` — read and conditionally write the served JSON documents.
//! - `backups` — list, fetch, verify, and delete document backups.
//! - `settings` — read-only backup retention settings.
//! - `tickets` — ticket search proxied to the configured issue tracker.

pub mod backups;
pub mod documents;
pub mod settings;
pub mod tickets;
