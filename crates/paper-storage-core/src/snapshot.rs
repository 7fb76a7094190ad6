use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// A persisted value stamped with the time it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<T> {
    pub saved_at: DateTime<Utc>,
    pub value: T,
}

impl<T> Snapshot<T> {
    /// Wrap a value with the current timestamp.
    pub fn now(value: T) -> Self {
        Self {
            saved_at: Utc::now(),
            value,
        }
    }
}

impl<T: Serialize> Snapshot<T> {
    pub fn to_text(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<T: DeserializeOwned> Snapshot<T> {
    pub fn from_text(text: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(text)?)
    }
}
