//! Poll repository and vote ledger for Pollbook.
//!
//! This crate layers the persisted state over a
//! [`KeyValueStore`](pollbook_store::KeyValueStore). It provides:
//! - [`PollList`] with pure add / remove / replace operations
//! - [`PollRepository`] that loads and saves the whole list as one blob,
//!   validating every entry on load
//! - [`VoteLedger`] holding the per-poll "already voted" records
//! - [`Preferences`] for the persisted theme flag
//!
//! Both the repository and the ledger can stage their writes as
//! [`StoreOp`](pollbook_store::StoreOp)s so a caller can commit a poll update
//! and its vote record in a single batch.

pub mod error;
pub mod ledger;
pub mod list;
pub mod preferences;
pub mod repository;

pub use error::{LedgerError, LedgerResult, ListError};
pub use ledger::VoteLedger;
pub use list::PollList;
pub use preferences::Preferences;
pub use repository::PollRepository;
