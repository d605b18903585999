//! # Integrity Sidecars
//!
//! Every backup gets a `<backup>.sha256` file holding the full SHA-256 of
//! its bytes as one hex line. Sidecars are advisory: failing to write one
//! never fails the operation that asked for it.

use std::fs;
use std::path::{Path, PathBuf};

use relcal_core::sha256_hex;

/// Suffix appended to a backup path to form its sidecar path.
pub const SIDECAR_SUFFIX: &str = ".sha256";

/// Path of the sidecar belonging to `path`.
pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(SIDECAR_SUFFIX);
    PathBuf::from(os)
}

/// Whether a file name is a sidecar rather than a backup.
pub fn is_sidecar(file_name: &str) -> bool {
    file_name.ends_with(SIDECAR_SUFFIX)
}

/// Hash the file at `path` and write its sidecar.
///
/// Best-effort: read and write failures are logged at WARN and swallowed.
/// Returns the hex digest when the sidecar was written.
pub fn write_integrity_sidecar(path: &Path) -> Option<String> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read file for integrity sidecar");
            return None;
        }
    };
    let digest = sha256_hex(&bytes);
    let sidecar = sidecar_path(path);
    match fs::write(&sidecar, format!("{digest}\n")) {
        Ok(()) => Some(digest),
        Err(e) => {
            tracing::warn!(path = %sidecar.display(), error = %e, "could not write integrity sidecar");
            None
        }
    }
}

/// Read the recorded digest for `path`, if a sidecar exists.
///
/// Only the first whitespace-separated token is taken, so sidecars written
/// in `sha256sum` style (`<hex>  <file>`) are accepted too.
pub fn read_sidecar(path: &Path) -> std::io::Result<Option<String>> {
    match fs::read_to_string(sidecar_path(path)) {
        Ok(text) => Ok(text.split_whitespace().next().map(str::to_lowercase)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_path_appends_suffix() {
        let p = sidecar_path(Path::new("/b/releases.20250101-000000.json"));
        assert_eq!(p, PathBuf::from("/b/releases.20250101-000000.json.sha256"));
    }

    #[test]
    fn is_sidecar_checks_suffix() {
        assert!(is_sidecar("releases.20250101-000000.json.sha256"));
        assert!(!is_sidecar("releases.20250101-000000.json"));
    }

    #[test]
    fn writes_full_hash_with_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holidays.20250101-000000.json");
        fs::write(&path, b"{}").unwrap();

        let digest = write_integrity_sidecar(&path).unwrap();
        assert_eq!(
            digest,
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
        let text = fs::read_to_string(sidecar_path(&path)).unwrap();
        assert_eq!(text, format!("{digest}\n"));
        assert_eq!(read_sidecar(&path).unwrap(), Some(digest));
    }

    #[test]
    fn missing_source_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert_eq!(write_integrity_sidecar(&path), None);
        assert!(!sidecar_path(&path).exists());
    }

    #[test]
    fn read_sidecar_absent_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_sidecar(&dir.path().join("x.json")).unwrap(), None);
    }

    #[test]
    fn read_sidecar_accepts_sha256sum_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.json");
        fs::write(sidecar_path(&path), "ABCDEF  x.json\n").unwrap();
        assert_eq!(read_sidecar(&path).unwrap(), Some("abcdef".to_string()));
    }
}
