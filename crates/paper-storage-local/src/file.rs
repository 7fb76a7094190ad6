use std::path::{Path, PathBuf};

use async_trait::async_trait;
use paper_storage_core::{validate_key, KeyValueStore, StorageError};
use tokio::fs;
use tracing::{debug, instrument};

/// Default directory for persisted drafts and configuration.
///
/// Falls back to `./.paper-docx` when the platform has no data directory.
pub fn default_store_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("paper-docx"))
        .unwrap_or_else(|| PathBuf::from(".paper-docx"))
}

/// File-backed store.
///
/// Layout:
/// ```text
/// {root}/
///   paper-factory-draft.json
///   paper-factory-format-config.json
/// ```
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash never leaves a half-written value behind.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    root: PathBuf,
}

impl FileKvStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn value_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileKvStore {
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.value_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(text) => {
                debug!("Read {} ({} bytes)", path.display(), text.len());
                Ok(Some(text))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    #[instrument(skip(self, value), level = "debug", fields(value_len = value.len()))]
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.value_path(key)?;
        fs::create_dir_all(&self.root).await.map_err(|e| {
            StorageError::Io(format!(
                "Failed to create store directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value).await.map_err(|e| {
            StorageError::Io(format!("Failed to write {}: {}", temp_path.display(), e))
        })?;
        fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::Io(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        debug!("Wrote {} ({} bytes)", path.display(), value.len());
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.value_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
