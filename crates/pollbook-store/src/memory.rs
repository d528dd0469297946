use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{StoreError, StoreResult};
use crate::traits::{KeyValueStore, StoreOp};

/// In-memory, HashMap-based key-value store.
///
/// Intended for tests and embedding. Values live behind a `RwLock`; a batch
/// takes the write lock once, so readers never observe half of it.
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store pre-populated with the given entries.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(map),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.read_map().map(|map| map.len()).unwrap_or_default()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted list of all keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .read_map()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Remove every key.
    pub fn clear(&self) -> StoreResult<()> {
        self.write_map()?.clear();
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

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.write_map()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        Ok(self.write_map()?.remove(key).is_some())
    }

    fn apply(&self, ops: &[StoreOp]) -> StoreResult<()> {
        let mut map = self.write_map()?;
        apply_ops(&mut map, ops);
        Ok(())
    }
}

/// Apply `ops` in order to a plain map.
pub(crate) fn apply_ops(map: &mut HashMap<String, String>, ops: &[StoreOp]) {
    for op in ops {
        match op {
            StoreOp::Set { key, value } => {
                map.insert(key.clone(), value.clone());
            }
            StoreOp::Remove { key } => {
                map.remove(key);
            }
        }
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("key_count", &self.len())
            .finish()
    }
}
