use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::{debug, warn};

use super::traits::KeyValueStore;
use crate::errors::{Result, StorageError};

/// Key-value store persisted as one JSON object on disk.
///
/// Entries are loaded once on [`open`](Self::open) and the whole object is
/// rewritten on every mutation (write to a sibling temp file, then rename).
/// Opening the same path again after a restart yields the last written state.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store; the file and its parent directory are
    /// created on the first write. A file that does not parse is logged and
    /// treated as empty, and the next write replaces it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries: BTreeMap<String, String> = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Store file {} is corrupted, starting empty: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StorageError::ReadFailed {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
                .into())
            }
        };

        debug!("Opened store {} with {} entries", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("File store lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Write the full map to disk. Called with the entries lock held so that
    /// concurrent writers cannot interleave partial files. The in-memory map is
    /// only replaced after this succeeds.
    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let write_failed = |e: std::io::Error| StorageError::WriteFailed {
            path: self.path.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_failed)?;
            }
        }

        let json = serde_json::to_string(entries)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, json).map_err(write_failed)?;
        fs::rename(&tmp_path, &self.path).map_err(write_failed)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock_entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock_entries();
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.lock_entries();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}
