//! Draft persistence through the key-value store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use paper_storage_core::{KeyValueStore, Snapshot, StorageError, DRAFT_KEY};
use tracing::{info, instrument, warn};

use crate::model::PaperContent;

/// Saves and restores the draft paper, footnotes included.
#[derive(Clone)]
pub struct DraftStore {
    store: Arc<dyn KeyValueStore>,
}

impl DraftStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The saved draft, if one exists and is readable. An unreadable draft
    /// is reported and treated as absent.
    #[instrument(skip(self), level = "debug")]
    pub async fn load(&self) -> Result<Option<Snapshot<PaperContent>>, StorageError> {
        let Some(text) = self.store.get(DRAFT_KEY).await? else {
            return Ok(None);
        };
        match Snapshot::from_text(&text) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!("Stored draft is unreadable, ignoring it: {}", e);
                Ok(None)
            }
        }
    }

    /// Persist `paper`, returning the save timestamp.
    #[instrument(skip_all, level = "debug")]
    pub async fn save(&self, paper: &PaperContent) -> Result<DateTime<Utc>, StorageError> {
        let snapshot = Snapshot::now(paper);
        self.store.set(DRAFT_KEY, &snapshot.to_text()?).await?;
        Ok(snapshot.saved_at)
    }

    /// Remove the draft. Returns whether one existed.
    pub async fn clear(&self) -> Result<bool, StorageError> {
        let existed = self.store.delete(DRAFT_KEY).await?;
        if existed {
            info!("Draft cleared");
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Footnote;
    use paper_storage_local::MemoryKvStore;

    fn drafts() -> (DraftStore, Arc<MemoryKvStore>) {
        let store = Arc::new(MemoryKvStore::new());
        (DraftStore::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_save_then_load_keeps_footnotes() {
        let (drafts, _store) = drafts();
        let paper = PaperContent {
            title: "草稿".into(),
            body: "正文[1]".into(),
            footnotes: vec![Footnote { id: 1, content: "注".into() }],
            ..Default::default()
        };

        let saved_at = drafts.save(&paper).await.unwrap();
        let loaded = drafts.load().await.unwrap().unwrap();
        assert_eq!(loaded.value, paper);
        assert_eq!(loaded.saved_at, saved_at);
    }

    #[tokio::test]
    async fn test_load_absent_and_corrupt() {
        let (drafts, store) = drafts();
        assert!(drafts.load().await.unwrap().is_none());

        store.set(DRAFT_KEY, "not a draft").await.unwrap();
        assert!(drafts.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let (drafts, _store) = drafts();
        assert!(!drafts.clear().await.unwrap());
        drafts.save(&PaperContent::default()).await.unwrap();
        assert!(drafts.clear().await.unwrap());
        assert!(drafts.load().await.unwrap().is_none());
    }
}
