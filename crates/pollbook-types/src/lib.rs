//! Foundation types for Pollbook.
//!
//! Every other Pollbook crate depends on `pollbook-types`. The crate owns the
//! poll data model and its persisted JSON shape.
//!
//! # Key Types
//!
//! - [`PollId`] -- Opaque random poll identifier
//! - [`Poll`] -- A question with ordered options and per-option vote counters
//! - [`PollOption`] -- One answer and its counter
//! - [`ChoiceMode`] -- Single choice, or multiple choice with an upper bound
//!
//! # Persisted Shape
//!
//! A [`Poll`] serializes to the camelCase record
//! `{ id, question, options: [{ text, votes }], createdAt, multipleChoice, maxChoices }`.
//! Deserialization re-checks the structural invariants, so a value of type
//! [`Poll`] is always well formed no matter where it came from.

pub mod error;
pub mod id;
pub mod poll;

pub use error::TypeError;
pub use id::PollId;
pub use poll::{ChoiceMode, Poll, PollOption};
