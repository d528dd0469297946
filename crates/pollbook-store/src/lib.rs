//! String-keyed persistent storage for Pollbook.
//!
//! The store is the only durable interface of the system: a flat map from
//! string keys to UTF-8 text values, with no transactions beyond a single
//! all-or-nothing batch and no expiry. See [`keys`] for the layout.
//!
//! # Storage Backends
//!
//! All backends implement the [`KeyValueStore`] trait:
//!
//! - [`InMemoryStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileStore`] -- one JSON file, rewritten atomically on every mutation
//!
//! # Design Rules
//!
//! 1. The store never interprets values -- it is a pure key-value store.
//! 2. A batch ([`KeyValueStore::apply`]) lands as a whole or not at all.
//! 3. Missing keys are `Ok(None)`, never errors.
//! 4. I/O errors on write are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod keys;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use traits::{KeyValueStore, StoreOp};
