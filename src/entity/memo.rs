// src/entity/memo.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MemoId;

/// A persisted memo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    pub id: MemoId,
    pub title: String,
    pub tags: Vec<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Memo {
    pub fn new(id: MemoId, draft: MemoDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            tags: draft.tags,
            content: draft.content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields supplied by the caller when creating a memo
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoDraft {
    pub title: String,
    pub tags: Vec<String>,
    pub content: String,
}

/// Sparse patch applied by `MemoStore::update`.
///
/// A field is only written when it is present and non-empty, so an update can
/// never clear a title, the tag list or the content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoUpdate {
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub content: Option<String>,
}

impl MemoUpdate {
    /// Copy the non-empty fields onto `memo`. Timestamps are left to the caller.
    pub fn apply_to(self, memo: &mut Memo) {
        if let Some(title) = self.title.filter(|t| !t.is_empty()) {
            memo.title = title;
        }
        if let Some(tags) = self.tags.filter(|t| !t.is_empty()) {
            memo.tags = tags;
        }
        if let Some(content) = self.content.filter(|c| !c.is_empty()) {
            memo.content = content;
        }
    }
}
