//! # Document Names
//!
//! [`DocumentName`] is the logical name of a persisted JSON document
//! (`environments`, `releases`, `holidays`, ...). Its file on disk is
//! `<name>.json` and its backups are prefixed with `<name>.`.
//!
//! Names must match `^[a-z0-9][a-z0-9_-]{0,63}$`. Dots and path separators
//! are rejected, so a name can never escape the data directory and never
//! collides with the `<name>.<stamp>.json` backup layout.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// File extension of every live document and backup.
pub const JSON_EXTENSION: &str = ".json";

const MAX_NAME_LEN: usize = 64;

/// Validated logical name of a persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentName(String);

impl DocumentName {
    /// Environment definitions.
    pub const ENVIRONMENTS: &'static str = "environments";
    /// Release schedule entries, keyed by environment.
    pub const RELEASES: &'static str = "releases";
    /// Holiday lists.
    pub const HOLIDAYS: &'static str = "holidays";
    /// Side-configuration holding issue tracker credentials.
    pub const TRACKER_CONFIG: &'static str = "jira-config";

    /// Validate and construct a document name.
    pub fn new(name: &str) -> Result<Self, CoreError> {
        let reject = |reason: &str| CoreError::InvalidDocumentName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(reject("must not be empty"));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(reject(&format!("longer than {MAX_NAME_LEN} characters")));
        }
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
            _ => return Err(reject("must start with [a-z0-9]")),
        }
        if let Some(c) = chars.find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_')) {
            return Err(reject(&format!("contains invalid character {c:?}")));
        }
        Ok(Self(name.to_string()))
    }

    /// Parse a name from its file name, e.g. `releases.json` → `releases`.
    pub fn from_file_name(file_name: &str) -> Result<Self, CoreError> {
        let stem = file_name.strip_suffix(JSON_EXTENSION).ok_or_else(|| {
            CoreError::InvalidDocumentName {
                name: file_name.to_string(),
                reason: format!("missing {JSON_EXTENSION} extension"),
            }
        })?;
        Self::new(stem)
    }

    pub fn environments() -> Self {
        Self(Self::ENVIRONMENTS.to_string())
    }

    pub fn releases() -> Self {
        Self(Self::RELEASES.to_string())
    }

    pub fn holidays() -> Self {
        Self(Self::HOLIDAYS.to_string())
    }

    pub fn tracker_config() -> Self {
        Self(Self::TRACKER_CONFIG.to_string())
    }

    /// The logical name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The live file name, `<name>.json`.
    pub fn file_name(&self) -> String {
        format!("{}{JSON_EXTENSION}", self.0)
    }
}

impl std::fmt::Display for DocumentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DocumentName {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<DocumentName> for String {
    fn from(name: DocumentName) -> Self {
        name.0
    }
}

impl PartialEq<&str> for DocumentName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
