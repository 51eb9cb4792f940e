use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{PageId, QuestionId};

/// A saved question. At most one per `(page_id, question_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub page_id: PageId,
    pub question_id: QuestionId,
    pub question_text: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl Bookmark {
    #[must_use]
    pub fn new(
        page_id: PageId,
        question_id: QuestionId,
        question_text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            page_id,
            question_id,
            question_text: question_text.into(),
            timestamp,
        }
    }

    #[must_use]
    pub fn matches(&self, page_id: &PageId, question_id: &QuestionId) -> bool {
        self.page_id == *page_id && self.question_id == *question_id
    }
}

/// Bookmarks in insertion order, which is also display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkList(Vec<Bookmark>);

impl BookmarkList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unless the key is already present. Returns whether it was added.
    pub fn insert(&mut self, bookmark: Bookmark) -> bool {
        if self.contains(&bookmark.page_id, &bookmark.question_id) {
            return false;
        }
        self.0.push(bookmark);
        true
    }

    /// Drop the bookmark with this key. Returns whether anything was removed.
    pub fn remove(&mut self, page_id: &PageId, question_id: &QuestionId) -> bool {
        let before = self.0.len();
        self.0.retain(|b| !b.matches(page_id, question_id));
        self.0.len() != before
    }

    #[must_use]
    pub fn contains(&self, page_id: &PageId, question_id: &QuestionId) -> bool {
        self.0.iter().any(|b| b.matches(page_id, question_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bookmark> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Bookmark] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
