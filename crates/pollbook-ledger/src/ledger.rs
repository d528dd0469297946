use std::sync::Arc;

use pollbook_store::{keys, KeyValueStore, StoreOp};
use pollbook_types::PollId;
use tracing::debug;

use crate::error::LedgerResult;

/// Value written for a poll this store has voted on.
const VOTED: &str = "true";

/// Per-poll "has voted" records, one store entry per poll.
///
/// State per poll: NotVoted -> Voted (mark) -> NotVoted (clear). Deleting the
/// poll clears the record for good.
pub struct VoteLedger<S> {
    store: Arc<S>,
}

impl<S: KeyValueStore> VoteLedger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Whether a vote on `id` has been recorded. Only the exact value
    /// `"true"` counts.
    pub fn has_voted(&self, id: &PollId) -> LedgerResult<bool> {
        let value = self.store.get(&keys::voted(id))?;
        Ok(value.as_deref() == Some(VOTED))
    }

    pub fn mark_voted(&self, id: &PollId) -> LedgerResult<()> {
        self.store.apply(&[self.mark_op(id)])?;
        debug!(poll = %id, "marked voted");
        Ok(())
    }

    /// Remove the record. Returns `true` if one existed.
    pub fn clear_voted(&self, id: &PollId) -> LedgerResult<bool> {
        let existed = self.store.remove(&keys::voted(id))?;
        debug!(poll = %id, existed, "cleared vote record");
        Ok(existed)
    }

    /// Batch operation equivalent to [`mark_voted`](Self::mark_voted).
    pub fn mark_op(&self, id: &PollId) -> StoreOp {
        StoreOp::set(keys::voted(id), VOTED)
    }

    /// Batch operation equivalent to [`clear_voted`](Self::clear_voted).
    pub fn clear_op(&self, id: &PollId) -> StoreOp {
        StoreOp::remove(keys::voted(id))
    }
}
