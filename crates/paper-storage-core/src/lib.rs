//! Core traits and types for paper-docx persistence.
//!
//! The engine itself is stateless; drafts and the active format configuration
//! live in an external key-value store addressed by two fixed keys:
//! - `DRAFT_KEY`: the draft paper content together with its footnotes
//! - `FORMAT_CONFIG_KEY`: the format configuration
//!
//! Backends implement `KeyValueStore`; values are opaque text.

mod error;
mod snapshot;
mod store;

pub use error::StorageError;
pub use snapshot::Snapshot;
pub use store::{validate_key, KeyValueStore, DRAFT_KEY, FORMAT_CONFIG_KEY};
