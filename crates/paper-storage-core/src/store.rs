use async_trait::async_trait;

use crate::error::StorageError;

/// Key holding the draft paper content and its footnotes.
pub const DRAFT_KEY: &str = "paper-factory-draft";

/// Key holding the active format configuration.
pub const FORMAT_CONFIG_KEY: &str = "paper-factory-format-config";

/// Opaque text storage addressed by key.
///
/// Backends must be safe to share between tasks; the engine never holds a
/// store across an export, it only calls `get`/`set` at load and save time.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Returns whether a value was present.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;
}

/// Keys are restricted to ASCII alphanumerics, `-`, `_` and `.` so that
/// file-backed stores can map them to file names directly.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let well_formed = !key.is_empty()
        && key.len() <= 128
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if well_formed {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
