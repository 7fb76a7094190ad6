//! Local key-value stores for paper-docx.
//!
//! - `FileKvStore`: one file per key under a data directory
//! - `MemoryKvStore`: process-local map, used by tests and one-shot runs

mod file;
mod memory;

pub use file::{default_store_dir, FileKvStore};
pub use memory::MemoryKvStore;
