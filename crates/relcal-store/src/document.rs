//! # Document Store
//!
//! Reads and writes named JSON documents under the data directory, one
//! `<name>.json` file per document.
//!
//! ## Write Protocol
//!
//! 1. Parse the body as JSON (`InvalidJson` on failure).
//! 2. Check the shape for the document's name (`SchemaInvalid`).
//! 3. Pretty-print with 2-space indentation. Object keys come out in the
//!    order `serde_json::Map` iterates them, so byte-identical output is
//!    only guaranteed for identical values, not for reordered input.
//! 4. If the file exists and a precondition was given, compare it with the
//!    fingerprint of the current bytes (`PreconditionFailed`, carrying the
//!    current fingerprint, on mismatch).
//! 5. If the file exists, snapshot its current bytes and rotate backups.
//!    Backup failures are logged and do not block the write.
//! 6. Replace the file atomically (temp file + rename).
//! 7. Return the fingerprint of the new bytes.
//!
//! Nothing on disk changes when steps 1, 2 or 4 reject the write. If step 6
//! fails after step 5 succeeded, the new backup stays behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use relcal_core::{fingerprint, DocumentName, Fingerprint, Precondition};
use serde_json::Value;

use crate::backup::BackupManager;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::validation::validate;

/// Content returned for a document whose file does not exist yet.
pub const EMPTY_DOCUMENT: &[u8] = b"{}";

/// Outcome of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Fingerprint of the bytes now on disk.
    pub fingerprint: Fingerprint,
    /// Whether the write created the document.
    pub created: bool,
    /// Backup taken of the previous content, if any.
    pub backup: Option<String>,
    /// Backups deleted by rotation.
    pub pruned: Vec<String>,
}

/// Filesystem-backed store of named JSON documents.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    data_dir: PathBuf,
    backups: BackupManager,
    default_max_backups: usize,
}

impl DocumentStore {
    /// Build a store from configuration without touching the filesystem.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            backups: BackupManager::new(&config.backup_dir),
            default_max_backups: config.default_max_backups,
        }
    }

    /// Build a store and create its data and backup directories.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        for dir in [&config.data_dir, &config.backup_dir] {
            fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        }
        tracing::info!(
            data_dir = %config.data_dir.display(),
            backup_dir = %config.backup_dir.display(),
            "document store ready"
        );
        Ok(Self::new(config))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    pub fn default_max_backups(&self) -> usize {
        self.default_max_backups
    }

    /// Path of the live file for `name`.
    pub fn path_for(&self, name: &DocumentName) -> PathBuf {
        self.data_dir.join(name.file_name())
    }

    /// Current bytes of `name`, or `None` if the file does not exist.
    pub fn read_current(&self, name: &DocumentName) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    /// Current bytes of `name`, or `{}` if it has not been created yet.
    ///
    /// Never creates the file.
    pub fn read(&self, name: &DocumentName) -> Result<Vec<u8>, StoreError> {
        Ok(self
            .read_current(name)?
            .unwrap_or_else(|| EMPTY_DOCUMENT.to_vec()))
    }

    /// Current bytes and fingerprint of `name`.
    ///
    /// An absent document reads as `{}` with the sentinel fingerprint.
    pub fn read_with_fingerprint(&self, name: &DocumentName) -> Result<(Vec<u8>, Fingerprint), StoreError> {
        Ok(match self.read_current(name)? {
            Some(bytes) => {
                let fp = fingerprint(&bytes);
                (bytes, fp)
            }
            None => (EMPTY_DOCUMENT.to_vec(), Fingerprint::absent()),
        })
    }

    /// Validate and persist a new version of `name`.
    ///
    /// `precondition` is only consulted when the document already exists.
    /// Without one, the write is unconditional (last writer wins).
    pub fn write(
        &self,
        name: &DocumentName,
        raw: &[u8],
        precondition: Option<&Precondition>,
        max_backups: usize,
    ) -> Result<WriteOutcome, StoreError> {
        let value: Value = serde_json::from_slice(raw).map_err(StoreError::InvalidJson)?;
        validate(name, &value)?;
        let pretty = serde_json::to_vec_pretty(&value).map_err(StoreError::InvalidJson)?;

        let current = self.read_current(name)?;
        let mut backup = None;
        let mut pruned = Vec::new();

        if let Some(current) = &current {
            if let Some(precondition) = precondition {
                let current_fp = fingerprint(current);
                if !precondition.matches(&current_fp) {
                    tracing::info!(document = %name, current = %current_fp, "rejected stale write");
                    return Err(StoreError::PreconditionFailed { current: current_fp });
                }
            }

            match self.backups.snapshot(name, current) {
                Ok(file) => {
                    match self.backups.rotate(name, max_backups) {
                        Ok(deleted) => pruned = deleted,
                        Err(e) => tracing::warn!(document = %name, error = %e, "backup rotation failed"),
                    }
                    backup = Some(file);
                }
                Err(e) => tracing::warn!(document = %name, error = %e, "could not create backup; writing anyway"),
            }
        }

        let path = self.path_for(name);
        self.replace(&path, &pretty)?;

        let fp = fingerprint(&pretty);
        tracing::info!(document = %name, fingerprint = %fp, backup = ?backup, "document updated");
        Ok(WriteOutcome {
            fingerprint: fp,
            created: current.is_none(),
            backup,
            pruned,
        })
    }

    /// Write `bytes` to a temp file in the data directory and rename it over `path`.
    fn replace(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| StoreError::io(&self.data_dir, e))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.data_dir)
            .map_err(|e| StoreError::io(&self.data_dir, e))?;
        tmp.write_all(bytes).map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.as_file().sync_all().map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
        Ok(())
    }
}
