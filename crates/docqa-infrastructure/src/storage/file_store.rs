//! File-backed key-value store with atomic writes.
//!
//! All keys live in one JSON object on disk. Every mutation rewrites the
//! whole file through a temporary file and an atomic rename, under an
//! exclusive lock, so a reader never observes a partial write.

use docqa_core::error::{DocqaError, Result};
use docqa_core::registry::KeyValueStore;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

type Entries = BTreeMap<String, String>;

/// A [`KeyValueStore`] persisted as a JSON object in a single file.
///
/// Provides:
/// - **Atomicity**: Updates are all-or-nothing via tmp file + atomic rename
/// - **Isolation**: File locking prevents concurrent modifications
/// - **Durability**: Explicit fsync before rename
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every entry.
    ///
    /// A missing or blank file is an empty store. So is a file that does not
    /// parse: the store is advisory and a corrupt file must not block startup.
    fn read_entries(&self) -> Result<Entries> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(
                    "[FileKeyValueStore] Ignoring corrupt store at {}: {}",
                    self.path.display(),
                    e
                );
                Ok(Entries::new())
            }
        }
    }

    fn write_entries(&self, entries: &Entries) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(entries)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Load, modify, save under the exclusive lock.
    fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Entries),
    {
        let _lock = FileLock::acquire(&self.path)?;
        let mut entries = self.read_entries()?;
        f(&mut entries);
        self.write_entries(&entries)
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| DocqaError::io(format!("Path has no file name: {}", self.path.display())))?;
        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        tracing::debug!("[FileKeyValueStore] set {} ({} bytes)", key, value.len());
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        tracing::debug!("[FileKeyValueStore] remove {}", key);
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// Exclusive lock on `<store>.lock`, held until the guard is dropped.
///
/// The lock file itself is never deleted: unlinking it would let a waiter
/// that already opened the old inode and a newcomer that creates a fresh one
/// both hold the lock at once.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| DocqaError::io(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("store.json"));

        store.set("uploadedFiles", r#"["a.pdf"]"#).unwrap();
        assert_eq!(
            store.get("uploadedFiles").unwrap().as_deref(),
            Some(r#"["a.pdf"]"#)
        );
        assert_eq!(store.get("other").unwrap(), None);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("missing.json"));
        assert_eq!(store.get("uploadedFiles").unwrap(), None);
    }

    #[test]
    fn test_remove_keeps_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("store.json"));

        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove("a").unwrap();

        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        fs::write(&path, "{ this is not json").unwrap();

        let store = FileKeyValueStore::new(&path);
        assert_eq!(store.get("uploadedFiles").unwrap(), None);

        // The next write replaces the corrupt content
        store.set("uploadedFiles", "[]").unwrap();
        assert_eq!(store.get("uploadedFiles").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        let store = FileKeyValueStore::new(&path);

        store.set("k", "v").unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join(".store.json.tmp").exists());
    }

    #[test]
    fn test_lock_file_survives_writes() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("store.json"));

        store.set("k", "v").unwrap();
        assert!(temp_dir.path().join("store.lock").exists());

        store.remove("k").unwrap();
        assert!(temp_dir.path().join("store.lock").exists());
    }

    #[test]
    fn test_concurrent_writers_do_not_lose_updates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = FileKeyValueStore::new(&path);
                std::thread::spawn(move || {
                    for round in 0..5 {
                        store.set(&format!("writer-{i}"), &round.to_string()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let store = FileKeyValueStore::new(&path);
        for i in 0..8 {
            assert_eq!(store.get(&format!("writer-{i}")).unwrap().as_deref(), Some("4"));
        }
    }

    #[test]
    fn test_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("store.json");
        let store = FileKeyValueStore::new(&path);

        store.set("k", "v").unwrap();
        assert!(path.exists());
    }
}
