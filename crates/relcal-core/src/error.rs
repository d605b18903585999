//! # Error Types
//!
//! Errors raised while constructing core primitives. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Error constructing a relcal core primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A document name failed validation.
    #[error("invalid document name {name:?}: {reason}")]
    InvalidDocumentName {
        /// The rejected input.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A backup timestamp token could not be parsed.
    #[error("invalid backup timestamp {0:?}: expected YYYYMMDD-HHMMSS")]
    InvalidStamp(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_document_name_display() {
        let err = CoreError::InvalidDocumentName {
            name: "../etc".to_string(),
            reason: "contains '/'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("../etc"));
        assert!(msg.contains("contains '/'"));
    }

    #[test]
    fn invalid_stamp_display() {
        let err = CoreError::InvalidStamp("2025-01-01".to_string());
        assert!(err.to_string().contains("YYYYMMDD-HHMMSS"));
    }
}
