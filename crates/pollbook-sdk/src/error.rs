use pollbook_types::PollId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("poll not found: {0}")]
    PollNotFound(PollId),

    #[error(transparent)]
    Validation(#[from] pollbook_engine::ValidationError),

    #[error(transparent)]
    Vote(#[from] pollbook_engine::VoteError),

    #[error("ledger error: {0}")]
    Ledger(#[from] pollbook_ledger::LedgerError),

    #[error("store error: {0}")]
    Store(#[from] pollbook_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<pollbook_ledger::ListError> for SdkError {
    fn from(err: pollbook_ledger::ListError) -> Self {
        Self::Ledger(err.into())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
