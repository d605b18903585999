//! # relcal-store — Versioned JSON Document Store
//!
//! Persists a handful of named JSON documents as pretty-printed files in a
//! data directory and keeps timestamped copies of every overwritten version
//! in a nested backup directory.
//!
//! ## Write Protocol
//!
//! ```text
//! parse JSON → validate shape → pretty-print
//!   → (file exists?) check If-Match → snapshot old bytes → rotate backups
//!   → atomic replace → return new fingerprint
//! ```
//!
//! Concurrency safety comes from the fingerprint precondition alone. There
//! is no lock around the files: two writers that both send `If-Match` see at
//! most one success, and a writer that omits it overwrites unconditionally.
//!
//! ## Layout on Disk
//!
//! ```text
//! data/
//!   environments.json
//!   releases.json
//!   backups/
//!     releases.20250415-120000.json
//!     releases.20250415-120000.json.sha256
//! ```

pub mod backup;
pub mod config;
pub mod document;
pub mod error;
pub mod integrity;
pub mod validation;

pub use backup::{BackupContent, BackupManager, IntegrityStatus};
pub use config::StoreConfig;
pub use document::{DocumentStore, WriteOutcome};
pub use error::StoreError;
pub use validation::{validate, SchemaError};
