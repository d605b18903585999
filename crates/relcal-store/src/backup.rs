//! # Backup Manager
//!
//! Keeps timestamped copies of overwritten documents in a single backup
//! directory and bounds how many are kept per document.
//!
//! ## Naming
//!
//! A backup of document `releases` taken at 2025-04-15 12:00:00 UTC is
//! stored as `releases.20250415-120000.json`, next to its integrity sidecar
//! `releases.20250415-120000.json.sha256`. Two snapshots of the same document
//! within one second share a name; the later one overwrites the earlier.
//!
//! ## Rotation
//!
//! [`BackupManager::rotate()`] orders a document's backups newest first by
//! the timestamp token (the second dot-separated segment) and deletes
//! everything past the retention limit, along with their sidecars. Names
//! with fewer than three segments are ordered by the whole file name.
//!
//! ## Path Safety
//!
//! Every operation that takes a caller-supplied file name strips directory
//! components first, so `../../etc/passwd` resolves to `passwd` inside the
//! backup directory.

use std::fs;
use std::path::{Path, PathBuf};

use relcal_core::{fingerprint, sha256_hex, BackupStamp, DocumentName, Fingerprint};
use serde::Serialize;

use crate::error::StoreError;
use crate::integrity::{self, is_sidecar, sidecar_path};

/// A backup read back from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupContent {
    /// Sanitized file name inside the backup directory.
    pub filename: String,
    /// Fingerprint of the raw bytes.
    pub checksum: Fingerprint,
    /// Raw bytes as stored.
    pub content: Vec<u8>,
}

/// Result of checking a backup against its sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IntegrityStatus {
    /// The recorded digest matches the file.
    Verified { digest: String },
    /// The file changed since its sidecar was written.
    Mismatch { expected: String, actual: String },
    /// No sidecar was found for the file.
    MissingSidecar { actual: String },
}

impl IntegrityStatus {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }
}

/// Filesystem-backed backup directory.
#[derive(Debug, Clone)]
pub struct BackupManager {
    dir: PathBuf,
}

impl BackupManager {
    /// Create a manager for `dir`. The directory is created on first snapshot.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The backup directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Backup file name for `name` at `stamp`: `<name>.<YYYYMMDD-HHMMSS>.json`.
    pub fn backup_file_name(name: &DocumentName, stamp: BackupStamp) -> String {
        format!("{name}.{}.json", stamp.token())
    }

    /// Snapshot `content` as a backup of `name`, stamped with the current time.
    ///
    /// Returns the backup file name.
    pub fn snapshot(&self, name: &DocumentName, content: &[u8]) -> Result<String, StoreError> {
        self.snapshot_at(name, content, BackupStamp::now())
    }

    /// Snapshot `content` with an explicit timestamp.
    ///
    /// Writes the bytes verbatim, then a best-effort integrity sidecar.
    pub fn snapshot_at(
        &self,
        name: &DocumentName,
        content: &[u8],
        stamp: BackupStamp,
    ) -> Result<String, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let filename = Self::backup_file_name(name, stamp);
        let path = self.dir.join(&filename);
        fs::write(&path, content).map_err(|e| StoreError::io(&path, e))?;
        tracing::info!(document = %name, backup = %filename, "created backup");

        integrity::write_integrity_sidecar(&path);
        Ok(filename)
    }

    /// List backup file names starting with `prefix`, sorted ascending.
    ///
    /// Directories and integrity sidecars are skipped. A missing backup
    /// directory yields an empty list.
    pub fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.dir, e))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| StoreError::io(&entry.path(), e))?
                .is_dir();
            if is_dir {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if file_name.starts_with(prefix) && !is_sidecar(&file_name) {
                names.push(file_name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// List the backups belonging to one document.
    pub fn list_for(&self, name: &DocumentName) -> Result<Vec<String>, StoreError> {
        self.list(&format!("{name}."))
    }

    /// Keep the `max_backups` newest backups of `name` and delete the rest.
    ///
    /// Returns the deleted file names. A count at or below the limit is a
    /// no-op.
    pub fn rotate(&self, name: &DocumentName, max_backups: usize) -> Result<Vec<String>, StoreError> {
        let mut backups = self.list_for(name)?;
        if backups.len() <= max_backups {
            return Ok(Vec::new());
        }

        backups.sort_by(|a, b| ordering_key(b).cmp(&ordering_key(a)));
        let expired = backups.split_off(max_backups);

        for file in &expired {
            let path = self.dir.join(file);
            tracing::info!(document = %name, backup = %file, "deleting old backup");
            fs::remove_file(&path).map_err(|e| StoreError::io(&path, e))?;

            let sidecar = sidecar_path(&path);
            if let Err(e) = fs::remove_file(&sidecar) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %sidecar.display(), error = %e, "could not remove integrity sidecar");
                }
            }
        }
        Ok(expired)
    }

    /// Read a backup and fingerprint its raw bytes.
    pub fn fetch(&self, filename: &str) -> Result<BackupContent, StoreError> {
        let filename = sanitize_filename(filename)?;
        let path = self.dir.join(filename);
        let content = fs::read(&path).map_err(|e| StoreError::io(&path, e))?;
        Ok(BackupContent {
            filename: filename.to_string(),
            checksum: fingerprint(&content),
            content,
        })
    }

    /// Delete a single backup.
    ///
    /// The integrity sidecar is left in place; orphaned sidecars are harmless.
    pub fn delete(&self, filename: &str) -> Result<String, StoreError> {
        let filename = sanitize_filename(filename)?;
        let path = self.dir.join(filename);
        fs::remove_file(&path).map_err(|e| StoreError::io(&path, e))?;
        tracing::info!(backup = %filename, "deleted backup");
        Ok(filename.to_string())
    }

    /// Recompute a backup's SHA-256 and compare it with its sidecar.
    pub fn verify(&self, filename: &str) -> Result<IntegrityStatus, StoreError> {
        let filename = sanitize_filename(filename)?;
        let path = self.dir.join(filename);
        let content = fs::read(&path).map_err(|e| StoreError::io(&path, e))?;
        let actual = sha256_hex(&content);

        let recorded = integrity::read_sidecar(&path).map_err(|e| StoreError::io(&sidecar_path(&path), e))?;
        Ok(match recorded {
            None => IntegrityStatus::MissingSidecar { actual },
            Some(expected) if expected == actual => IntegrityStatus::Verified { digest: actual },
            Some(expected) => {
                tracing::warn!(backup = %filename, %expected, %actual, "backup integrity mismatch");
                IntegrityStatus::Mismatch { expected, actual }
            }
        })
    }
}

/// Strip directory components from a caller-supplied backup file name.
///
/// Both `/` and `\` count as separators. Empty results and `.`/`..` are
/// rejected.
pub fn sanitize_filename(raw: &str) -> Result<&str, StoreError> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if base.is_empty() || base == "." || base == ".." {
        return Err(StoreError::InvalidFilename(raw.to_string()));
    }
    Ok(base)
}

/// Sort key for rotation: the timestamp token when the name has at least
/// three dot-separated segments, otherwise the whole name.
fn ordering_key(file_name: &str) -> (&str, &str) {
    let mut parts = file_name.split('.');
    let token = match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(token), Some(_)) => token,
        _ => file_name,
    };
    (token, file_name)
}
