//! # Store Error Types
//!
//! One error enum for every store operation. Write failures are mutually
//! exclusive: a rejected write reports exactly one of `InvalidJson`,
//! `SchemaInvalid`, `PreconditionFailed` or `Io`, and in the first three
//! cases nothing on disk has changed.

use std::path::{Path, PathBuf};

use relcal_core::Fingerprint;
use thiserror::Error;

use crate::validation::SchemaError;

/// Errors from the document store and backup manager.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The request body is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The document does not have the minimal shape required for its name.
    #[error("schema validation failed: {0}")]
    SchemaInvalid(#[from] SchemaError),

    /// The caller's `If-Match` fingerprint is stale.
    ///
    /// Carries the fingerprint of the bytes currently on disk so the caller
    /// can re-read and retry.
    #[error("precondition failed: current fingerprint is {current}")]
    PreconditionFailed {
        /// Fingerprint of the current document content.
        current: Fingerprint,
    },

    /// A backup file name was empty or resolved to a directory reference.
    #[error("invalid backup filename {0:?}")]
    InvalidFilename(String),

    /// Filesystem failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether this error is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_failed_names_current_fingerprint() {
        let err = StoreError::PreconditionFailed {
            current: relcal_core::fingerprint(b"{}"),
        };
        assert!(err.to_string().contains("44136fa355b3678a"));
    }

    #[test]
    fn io_error_includes_path() {
        let err = StoreError::io(
            Path::new("/data/releases.json"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/data/releases.json"));
        assert!(msg.contains("denied"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_is_detected() {
        let err = StoreError::io(
            Path::new("x"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn invalid_json_wraps_serde_error() {
        let serde_err = serde_json::from_slice::<serde_json::Value>(b"{").unwrap_err();
        let err = StoreError::InvalidJson(serde_err);
        assert!(err.to_string().starts_with("invalid JSON"));
    }
}
