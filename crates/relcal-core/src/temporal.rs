//! # Backup Timestamps
//!
//! [`BackupStamp`] is a UTC instant truncated to whole seconds, rendered as
//! the fixed-width token `YYYYMMDD-HHMMSS` that backup file names embed.
//!
//! The token is zero-padded and fixed-width, so comparing two tokens as
//! strings gives the same answer as comparing the instants. Two stamps
//! taken within the same second are equal; backups are therefore unique
//! per document per second and no finer.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// `strftime` layout of the backup token.
const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// A second-resolution UTC timestamp embedded in backup file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BackupStamp(DateTime<Utc>);

impl BackupStamp {
    /// The current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Build a stamp from a UTC instant, discarding sub-second precision.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.with_nanosecond(0).unwrap_or(dt))
    }

    /// Parse a `YYYYMMDD-HHMMSS` token.
    pub fn parse(token: &str) -> Result<Self, CoreError> {
        NaiveDateTime::parse_from_str(token, STAMP_FORMAT)
            .map(|naive| Self(naive.and_utc()))
            .map_err(|_| CoreError::InvalidStamp(token.to_string()))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render the `YYYYMMDD-HHMMSS` token.
    pub fn token(&self) -> String {
        self.0.format(STAMP_FORMAT).to_string()
    }
}

impl std::fmt::Display for BackupStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.token())
    }
}
