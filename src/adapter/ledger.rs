//! JSON ledger file storage.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::domain::Ledger;
use crate::error::LedgerError;

impl Ledger {
    /// First candidate path that exists.
    #[must_use]
    pub fn locate(paths: &[PathBuf]) -> Option<&Path> {
        paths.iter().map(PathBuf::as_path).find(|p| p.is_file())
    }

    /// Read and parse a ledger file.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        let content = fs::read_to_string(path).map_err(|source| LedgerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ledger: Self = serde_json::from_str(&content).map_err(|source| LedgerError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            path = %path.display(),
            securities = ledger.securities.len(),
            operations = ledger.operations.len(),
            "Ledger loaded"
        );
        Ok(ledger)
    }

    /// Load the first ledger found among `paths`.
    ///
    /// When none exists and `create_sample` is set, the demo ledger is written
    /// to the first location that accepts it and returned.
    pub fn load_from(paths: &[PathBuf], create_sample: bool) -> Result<Self, LedgerError> {
        if let Some(path) = Self::locate(paths) {
            return Self::load(path);
        }

        warn!("No ledger file found");
        if !create_sample {
            return Err(LedgerError::NotFound {
                searched: paths.to_vec(),
            });
        }

        let sample = Self::sample();
        for path in paths {
            match sample.save(path) {
                Ok(()) => {
                    info!(path = %path.display(), "Sample ledger created, edit it with your own operations");
                    return Ok(sample);
                }
                Err(e) => debug!(path = %path.display(), error = %e, "Cannot write sample ledger here"),
            }
        }

        Err(LedgerError::NotFound {
            searched: paths.to_vec(),
        })
    }

    /// Write the ledger as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), LedgerError> {
        let io_err = |source| LedgerError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| LedgerError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn locate_prefers_earlier_paths() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.json");
        let second = dir.path().join("b.json");
        fs::write(&second, "{}").unwrap();

        let paths = vec![first.clone(), second.clone()];
        assert_eq!(Ledger::locate(&paths), Some(second.as_path()));

        fs::write(&first, "{}").unwrap();
        assert_eq!(Ledger::locate(&paths), Some(first.as_path()));
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Ledger::load(&path).unwrap_err();
        assert!(matches!(err, LedgerError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn load_from_creates_sample_in_nested_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("ledger.json");

        let ledger = Ledger::load_from(&[path.clone()], true).unwrap();
        assert_eq!(ledger, Ledger::sample());
        assert!(path.is_file());

        // Second call reads the file back.
        assert_eq!(Ledger::load_from(&[path], false).unwrap(), Ledger::sample());
    }

    #[test]
    fn load_from_without_sample_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = Ledger::load_from(&[path.clone()], false).unwrap_err();
        match err {
            LedgerError::NotFound { searched } => assert_eq!(searched, vec![path]),
            other => panic!("unexpected error: {other}"),
        }
    }
}
