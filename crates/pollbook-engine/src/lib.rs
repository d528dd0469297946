//! Pure poll engine for Pollbook.
//!
//! Every operation here takes a [`Poll`](pollbook_types::Poll) value and
//! returns a new one (or an error); nothing touches storage. Callers publish
//! the result only after the whole transformation succeeded, which is what
//! makes a vote all-or-nothing.
//!
//! # Quick Start
//!
//! ```rust
//! use pollbook_engine::{cast_vote, construct, tally, PollDraft};
//!
//! let draft = PollDraft::new("Color?").with_options(["Red", "Blue"]);
//! let poll = construct(&draft).unwrap();
//! let poll = cast_vote(&poll, &[0], false).unwrap();
//! let rows = tally(&poll);
//! assert_eq!(rows[0].percent, 100.0);
//! assert_eq!(rows[1].percent, 0.0);
//! ```

pub mod construct;
pub mod draft;
pub mod error;
pub mod tally;
pub mod vote;

// Re-exports for convenience.
pub use construct::{construct, construct_with};
pub use draft::PollDraft;
pub use error::{ValidationError, VoteError};
pub use tally::{tally, TallyRow};
pub use vote::{cast_vote, reset_votes, Selection};
