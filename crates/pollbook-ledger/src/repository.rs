use std::sync::Arc;

use pollbook_store::{keys, KeyValueStore, StoreOp};
use pollbook_types::Poll;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{LedgerError, LedgerResult, ListError};
use crate::list::PollList;

/// Owner of the canonical poll list, stored as one JSON array under
/// [`keys::POLLS`].
///
/// There is no incremental persistence: every mutation is written back as the
/// whole list.
pub struct PollRepository<S> {
    store: Arc<S>,
}

impl<S: KeyValueStore> PollRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Read the persisted list.
    ///
    /// Never fails. A missing blob, a blob that is not a JSON array, or a
    /// store read error yields an empty list. Entries that fail the schema
    /// check are dropped individually, as are later entries repeating an
    /// id already seen.
    pub fn load_all(&self) -> PollList {
        let raw = match self.store.get(keys::POLLS) {
            Ok(Some(raw)) => raw,
            Ok(None) => return PollList::new(),
            Err(e) => {
                warn!(error = %e, "failed to read poll list, using empty list");
                return PollList::new();
            }
        };
        decode(&raw)
    }

    /// Persist `list`, replacing the previous blob.
    pub fn save_all(&self, list: &PollList) -> LedgerResult<()> {
        let encoded = encode(list)?;
        self.store.set(keys::POLLS, &encoded)?;
        debug!(polls = list.len(), "saved poll list");
        Ok(())
    }

    /// The store operation that would persist `list`, for use in a batch.
    pub fn save_op(&self, list: &PollList) -> LedgerResult<StoreOp> {
        Ok(StoreOp::set(keys::POLLS, encode(list)?))
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

/// Serialize a list to the persisted JSON form.
pub fn encode(list: &PollList) -> LedgerResult<String> {
    serde_json::to_string(list).map_err(|e| LedgerError::Serialization(e.to_string()))
}

/// Parse a persisted blob, dropping anything that does not validate.
pub fn decode(raw: &str) -> PollList {
    let entries = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(other) => {
            warn!(kind = json_kind(&other), "poll list is not an array, using empty list");
            return PollList::new();
        }
        Err(e) => {
            warn!(error = %e, "poll list is malformed, using empty list");
            return PollList::new();
        }
    };

    let mut list = PollList::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let poll: Poll = match serde_json::from_value(entry) {
            Ok(poll) => poll,
            Err(e) => {
                warn!(index, error = %e, "dropping invalid poll entry");
                continue;
            }
        };
        match list.add(poll) {
            Ok(()) => {}
            Err(ListError::DuplicateId(id)) => {
                warn!(index, %id, "dropping poll with repeated id");
            }
            Err(e) => warn!(index, error = %e, "dropping poll entry"),
        }
    }
    list
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
