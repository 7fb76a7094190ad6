//! Paper content as produced by the editor.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One labelled line of the personal-info block ("姓名：张三").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfoItem {
    pub id: String,
    pub label: String,
    pub value: String,
}

impl PersonalInfoItem {
    /// Create an item with a fresh random id.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A numbered footnote. Ids are positive and unique but need not be contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footnote {
    pub id: u32,
    #[serde(default)]
    pub content: String,
}

/// The semantic content of a paper.
///
/// Constructed by the editor and handed to the engine by reference; the
/// engine never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaperContent {
    pub title: String,
    pub personal_info: Vec<PersonalInfoItem>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: String,
    pub introduction: String,
    #[serde(alias = "content")]
    pub body: String,
    pub conclusion: String,
    pub references: String,
    pub footnotes: Vec<Footnote>,
}

impl PaperContent {
    pub fn footnote(&self, id: u32) -> Option<&Footnote> {
        self.footnotes.iter().find(|f| f.id == id)
    }

    /// Append an empty personal-info item and return its id.
    pub fn add_personal_info_item(&mut self) -> String {
        let item = PersonalInfoItem::new("", "");
        let id = item.id.clone();
        self.personal_info.push(item);
        id
    }

    /// Update label and/or value of the item with `id`. Returns whether it exists.
    pub fn update_personal_info_item(
        &mut self,
        id: &str,
        label: Option<&str>,
        value: Option<&str>,
    ) -> bool {
        match self.personal_info.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                if let Some(label) = label {
                    item.label = label.to_string();
                }
                if let Some(value) = value {
                    item.value = value.to_string();
                }
                true
            }
            None => false,
        }
    }

    pub fn delete_personal_info_item(&mut self, id: &str) -> bool {
        let before = self.personal_info.len();
        self.personal_info.retain(|item| item.id != id);
        self.personal_info.len() != before
    }

    /// Append an empty footnote numbered one past the current maximum.
    ///
    /// Returns `None`, leaving the table unchanged, when the maximum id is
    /// already `u32::MAX`.
    pub fn add_footnote(&mut self) -> Option<u32> {
        let id = match self.footnotes.iter().map(|f| f.id).max() {
            Some(max) => max.checked_add(1)?,
            None => 1,
        };
        self.footnotes.push(Footnote {
            id,
            content: String::new(),
        });
        Some(id)
    }

    pub fn update_footnote(&mut self, id: u32, content: &str) -> bool {
        match self.footnotes.iter_mut().find(|f| f.id == id) {
            Some(footnote) => {
                footnote.content = content.to_string();
                true
            }
            None => false,
        }
    }

    pub fn delete_footnote(&mut self, id: u32) -> bool {
        let before = self.footnotes.len();
        self.footnotes.retain(|f| f.id != id);
        self.footnotes.len() != before
    }
}
