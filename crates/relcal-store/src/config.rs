//! Store configuration.
//!
//! Defaults match the layout the service has always used: documents in
//! `./data`, backups in `./data/backups`, ten backups kept per document.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default directory for live documents.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Default directory for backups and their sidecars.
pub const DEFAULT_BACKUP_DIR: &str = "./data/backups";

/// Default number of backups retained per document.
pub const DEFAULT_MAX_BACKUPS: usize = 10;

/// Locations and retention policy for the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Directory holding the live `<name>.json` files.
    pub data_dir: PathBuf,
    /// Directory holding `<name>.<stamp>.json` backups.
    pub backup_dir: PathBuf,
    /// Retention used when a caller does not supply its own limit.
    pub default_max_backups: usize,
}

impl StoreConfig {
    /// Configuration rooted at `data_dir`, with backups in `data_dir/backups`.
    pub fn rooted_at(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            backup_dir: data_dir.join("backups"),
            data_dir,
            default_max_backups: DEFAULT_MAX_BACKUPS,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            default_max_backups: DEFAULT_MAX_BACKUPS,
        }
    }
}
