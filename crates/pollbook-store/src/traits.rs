use crate::error::StoreResult;

/// One mutation inside a batch passed to [`KeyValueStore::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreOp {
    /// Create or overwrite `key` with `value`.
    Set { key: String, value: String },
    /// Remove `key` if present.
    Remove { key: String },
}

impl StoreOp {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Self::Remove { key: key.into() }
    }

    /// The key this operation touches.
    pub fn key(&self) -> &str {
        match self {
            Self::Set { key, .. } | Self::Remove { key } => key,
        }
    }
}

/// Synchronous string-keyed store of UTF-8 text values.
///
/// All implementations must satisfy these invariants:
/// - Values are opaque: the store never interprets them.
/// - `get` after `set` returns the value just written; `get` after `remove`
///   returns `None`.
/// - A batch passed to [`apply`](KeyValueStore::apply) becomes visible, and
///   durable, as a whole or not at all.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Create or overwrite the value under `key`.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Returns `true` if it existed.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// Check whether `key` exists.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Apply a batch of operations in order, all-or-nothing.
    ///
    /// The default implementation issues one call per operation and is only
    /// correct for backends whose individual writes cannot fail. Durable
    /// backends override it.
    fn apply(&self, ops: &[StoreOp]) -> StoreResult<()> {
        for op in ops {
            match op {
                StoreOp::Set { key, value } => self.set(key, value)?,
                StoreOp::Remove { key } => {
                    self.remove(key)?;
                }
            }
        }
        Ok(())
    }
}
