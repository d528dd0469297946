use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::memory::apply_ops;
use crate::traits::{KeyValueStore, StoreOp};

/// File-backed key-value store.
///
/// The whole key space is kept as one JSON object on disk and cached in
/// memory. Every mutation rewrites the file through a temporary sibling that
/// is atomically renamed over the previous file, so a crash leaves either the old
/// or the new contents and a batch is never half-written.
///
/// On-disk format:
/// ```text
/// { "darkMode": "true", "hasVoted_k3j9x0abc": "true", "polls": "[...]" }
/// ```
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store file at `path`.
    ///
    /// A missing file opens as an empty store. A file that is not a JSON
    /// object of strings is treated as empty and overwritten on the next
    /// write; other I/O errors are returned.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => {
                    debug!(path = %path.display(), keys = map.len(), "opened store file");
                    map
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "store file is malformed, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "store file does not exist yet");
                HashMap::new()
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.read_map().map(|map| map.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply `ops` to a copy of the cached map, persist it, then publish it.
    fn commit(&self, ops: &[StoreOp]) -> StoreResult<()> {
        let mut map = self.write_map()?;
        let mut next = map.clone();
        apply_ops(&mut next, ops);
        self.persist(&next)?;
        *map = next;
        Ok(())
    }

    fn persist(&self, map: &HashMap<String, String>) -> StoreResult<()> {
        let ordered: BTreeMap<&str, &str> = map
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let bytes =
            serde_json::to_vec_pretty(&ordered).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        debug!(path = %self.path.display(), keys = map.len(), "persisted store file");
        Ok(())
    }

    fn read_map(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, String>>> {
        self.entries
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write_map(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.entries
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.commit(&[StoreOp::set(key, value)])
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let existed = self.read_map()?.contains_key(key);
        if existed {
            self.commit(&[StoreOp::remove(key)])?;
        }
        Ok(existed)
    }

    fn apply(&self, ops: &[StoreOp]) -> StoreResult<()> {
        if ops.is_empty() {
            return Ok(());
        }
        self.commit(ops)
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("key_count", &self.len())
            .finish()
    }
}
