//! JSON file backed store
//!
//! The whole map is held in memory and written through to disk on every
//! `set`, so values survive restarts of the process. Writes go to a temporary
//! file in the same directory which then replaces the store file, so an
//! interrupted write never leaves truncated JSON behind.

use super::KeyValueStore;
use crate::types::{Result, TrackerError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open a store at `path`. A missing file yields an empty store; the file
    /// is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    TrackerError::Store(format!("Failed to parse store file {:?}: {}", path, e))
                })?
            }
        } else {
            BTreeMap::new()
        };

        log::debug!("Opened store {:?} with {} keys", path, values.len());
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(&self.values)?;
        let temp = tempfile::NamedTempFile::new_in(dir)?;
        fs::write(temp.path(), json)?;
        temp.persist(&self.path).map_err(|e| {
            TrackerError::Store(format!("Failed to replace store file {:?}: {}", self.path, e))
        })?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        log::trace!("file store get {}", key);
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        log::trace!("file store set {} = {}", key, value);
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("state.json")).unwrap();
        assert_eq!(store.get("theme"), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("startTime:TM1", "1700000000000").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("startTime:TM1").as_deref(), Some("1700000000000"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(FileStore::open(&path), Err(TrackerError::Store(_))));
    }

    #[test]
    fn test_truncated_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{\"startTime:TM1\": \"17000").unwrap();
        assert!(matches!(FileStore::open(&path), Err(TrackerError::Store(_))));
    }

    #[test]
    fn test_write_replaces_file_and_leaves_no_temporaries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("theme", "dark").unwrap();
        store.set("notifications", "granted").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);

        let written: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.get("theme").map(String::as_str), Some("dark"));
        assert_eq!(written.len(), 2);
    }
}
