//! High-level SDK for Pollbook.
//!
//! [`Pollbook`] is the contract a presentation layer talks to: create, list,
//! select, vote, reset, and delete polls, plus the persisted theme flag.
//! It wires the pure engine to the repository and vote ledger over any
//! [`KeyValueStore`](pollbook_store::KeyValueStore).

pub mod config;
pub mod error;
pub mod pollbook;

pub use config::PollbookConfig;
pub use error::{SdkError, SdkResult};
pub use pollbook::Pollbook;

// Re-export key types
pub use pollbook_engine::{PollDraft, TallyRow, ValidationError, VoteError};
pub use pollbook_ledger::PollList;
pub use pollbook_store::{FileStore, InMemoryStore, KeyValueStore};
pub use pollbook_types::{ChoiceMode, Poll, PollId, PollOption};
