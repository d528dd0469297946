use pollbook_types::PollId;

/// Errors from pure list operations on a [`PollList`](crate::PollList).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    #[error("a poll with id {0} already exists")]
    DuplicateId(PollId),

    #[error("poll not found: {0}")]
    NotFound(PollId),
}

/// Errors produced by repository and ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("store error: {0}")]
    Store(#[from] pollbook_store::StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    List(#[from] ListError),
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
