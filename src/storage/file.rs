//! File-backed storage: one JSON file per key

use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::{StorageBackend, StorageError};

/// Stores each key as `<dir>/<key>.json`
///
/// The directory is created lazily on first write, so a freshly discovered
/// workspace works without any priming step.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at the given data directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory blobs are stored under
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::Write {
            key: key.to_string(),
            source: e,
        })?;
        fs::write(self.path_for(key), value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            source: e,
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Remove {
                key: key.to_string(),
                source: e,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_get_missing_key_is_none() {
        let tmp = tempdir().unwrap();
        let backend = FileBackend::new(tmp.path().join("data"));
        assert!(backend.get("checklist").unwrap().is_none());
    }

    #[test]
    fn test_set_get_roundtrip() {
        let tmp = tempdir().unwrap();
        let backend = FileBackend::new(tmp.path().join("data"));

        backend.set("checklist", "[1,2,3]").unwrap();
        assert_eq!(backend.get("checklist").unwrap().unwrap(), "[1,2,3]");
        assert!(tmp.path().join("data/checklist.json").exists());
    }

    #[test]
    fn test_set_overwrites() {
        let tmp = tempdir().unwrap();
        let backend = FileBackend::new(tmp.path());

        backend.set("k", "old").unwrap();
        backend.set("k", "new").unwrap();
        assert_eq!(backend.get("k").unwrap().unwrap(), "new");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let tmp = tempdir().unwrap();
        let backend = FileBackend::new(tmp.path());

        backend.set("k", "v").unwrap();
        backend.remove("k").unwrap();
        assert!(backend.get("k").unwrap().is_none());
        // Removing again must not error
        backend.remove("k").unwrap();
    }
}
