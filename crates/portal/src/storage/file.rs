//! JSON-file store.
//!
//! The file is the source of truth: every read goes to disk so that a second
//! process sharing the file sees the latest write. Writes go to a sibling
//! temporary file that is then renamed over the original, so a crash never
//! leaves a half-written session behind.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use super::{Change, KeyValueStore, StorageError, apply_to};

/// Store backed by a JSON object on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), keys = entries.len(), "Session file written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn apply(&self, changes: &[Change]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.load()?;
        apply_to(&mut entries, changes);
        self.store(&entries)
    }

    fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        self.load()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::keys;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("hris-portal-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let store = FileStore::new(temp_path("session.json"));
        assert_eq!(store.get(keys::TOKEN).unwrap(), None);
        assert!(store.entries().unwrap().is_empty());
    }

    #[test]
    fn test_writes_are_visible_to_a_second_handle() {
        let path = temp_path("session.json");
        let writer = FileStore::new(&path);
        let reader = FileStore::new(&path);

        writer
            .apply(&[
                Change::Set(keys::TOKEN, "tok".to_string()),
                Change::Set(keys::ROLE, "admin".to_string()),
            ])
            .unwrap();

        assert_eq!(reader.get(keys::ROLE).unwrap().as_deref(), Some("admin"));

        writer.clear().unwrap();
        assert!(reader.entries().unwrap().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_file() {
        let path = temp_path("session.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"[1, 2").unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(store.get(keys::TOKEN), Err(StorageError::Corrupt(_))));
    }
}
