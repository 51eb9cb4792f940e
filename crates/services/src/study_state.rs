//! Durable study state: page progress, bookmarks, checklist ticks and
//! expanded questions.
//!
//! Every collection is loaded once at startup. Reads are served from memory;
//! each mutation updates memory first and then writes the whole collection
//! back under its storage key.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex as AsyncMutex;

use guide_core::Clock;
use guide_core::model::{Bookmark, BookmarkList, ChecklistItemId, PageId, PageTable, QuestionId};
use guide_core::progress::{
    ChecklistTally, ExpansionCount, NavStatus, ProgressMap, total_progress,
};
use storage::repository::{KeyValueStore, StorageKey};

use crate::error::StateError;

#[derive(Clone, Debug, Default)]
struct StateMaps {
    progress: ProgressMap,
    bookmarks: BookmarkList,
    checklist: BTreeMap<ChecklistItemId, bool>,
    expanded: BTreeMap<QuestionId, bool>,
}

/// Shared handle to the learner's persisted state.
///
/// Clones share the same maps, so a handle can be passed to every view.
#[derive(Clone)]
pub struct StudyState {
    store: Arc<dyn KeyValueStore>,
    pages: Arc<PageTable>,
    clock: Clock,
    maps: Arc<Mutex<StateMaps>>,
    // Serializes snapshot-then-write so storage sees writes in mutation order.
    write_gate: Arc<AsyncMutex<()>>,
    revision: Arc<AtomicU64>,
}

impl StudyState {
    /// Load all four collections from `store`.
    ///
    /// Missing, unreadable or malformed entries start empty; the problem is
    /// logged and never surfaced.
    pub async fn load(store: Arc<dyn KeyValueStore>, pages: Arc<PageTable>, clock: Clock) -> Self {
        let maps = StateMaps {
            progress: read_entry(store.as_ref(), StorageKey::Progress).await,
            bookmarks: read_entry(store.as_ref(), StorageKey::Bookmarks).await,
            checklist: read_entry(store.as_ref(), StorageKey::Checklist).await,
            expanded: read_entry(store.as_ref(), StorageKey::ExpandedQuestions).await,
        };
        tracing::debug!(
            pages = maps.progress.len(),
            bookmarks = maps.bookmarks.len(),
            checklist = maps.checklist.len(),
            expanded = maps.expanded.len(),
            "loaded study state"
        );
        Self {
            store,
            pages,
            clock,
            maps: Arc::new(Mutex::new(maps)),
            write_gate: Arc::new(AsyncMutex::new(())),
            revision: Arc::new(AtomicU64::new(0)),
        }
    }

    #[must_use]
    pub fn pages(&self) -> &PageTable {
        &self.pages
    }

    /// Bumped once per mutation. Views compare it to decide when to re-read.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    //
    // ─── PROGRESS ──────────────────────────────────────────────────────────────
    //

    /// Overwrite the stored percentage for `page`. Values are stored as given.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the progress map cannot be persisted.
    pub async fn set_page_progress(&self, page: &PageId, percent: u8) -> Result<(), StateError> {
        self.mutate(StorageKey::Progress, |maps| {
            maps.progress.insert(page.clone(), percent);
            ((), encode(&maps.progress))
        })
        .await
    }

    /// Stored percentage for `page`, or 0 when the page was never visited.
    #[must_use]
    pub fn page_progress(&self, page: &PageId) -> u8 {
        self.read().progress.get(page).copied().unwrap_or(0)
    }

    /// Rounded mean over every page except the landing page.
    #[must_use]
    pub fn total_progress(&self) -> u8 {
        total_progress(&self.read().progress, &self.pages)
    }

    #[must_use]
    pub fn nav_status(&self, page: &PageId) -> NavStatus {
        NavStatus::from_percent(self.page_progress(page))
    }

    //
    // ─── BOOKMARKS ─────────────────────────────────────────────────────────────
    //

    /// Save a question. Returns `false` without writing when it is already saved.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the bookmark list cannot be persisted.
    pub async fn add_bookmark(
        &self,
        page: &PageId,
        question: &QuestionId,
        question_text: &str,
    ) -> Result<bool, StateError> {
        let bookmark = Bookmark::new(
            page.clone(),
            question.clone(),
            question_text,
            self.clock.now(),
        );
        self.mutate_if(StorageKey::Bookmarks, |maps| {
            maps.bookmarks.insert(bookmark).then(|| encode(&maps.bookmarks))
        })
        .await
    }

    /// Forget a saved question. Returns `false` without writing when absent.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the bookmark list cannot be persisted.
    pub async fn remove_bookmark(
        &self,
        page: &PageId,
        question: &QuestionId,
    ) -> Result<bool, StateError> {
        self.mutate_if(StorageKey::Bookmarks, |maps| {
            maps.bookmarks
                .remove(page, question)
                .then(|| encode(&maps.bookmarks))
        })
        .await
    }

    /// Add or remove, whichever applies. Returns the new bookmarked state.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the bookmark list cannot be persisted.
    pub async fn toggle_bookmark(
        &self,
        page: &PageId,
        question: &QuestionId,
        question_text: &str,
    ) -> Result<bool, StateError> {
        let bookmark = Bookmark::new(
            page.clone(),
            question.clone(),
            question_text,
            self.clock.now(),
        );
        self.mutate(StorageKey::Bookmarks, |maps| {
            let saved = !maps.bookmarks.remove(page, question) && maps.bookmarks.insert(bookmark);
            (saved, encode(&maps.bookmarks))
        })
        .await
    }

    /// Saved questions in insertion order.
    #[must_use]
    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.read().bookmarks.as_slice().to_vec()
    }

    #[must_use]
    pub fn is_bookmarked(&self, page: &PageId, question: &QuestionId) -> bool {
        self.read().bookmarks.contains(page, question)
    }

    //
    // ─── CHECKLIST ─────────────────────────────────────────────────────────────
    //

    /// Flip the item and return its new state.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the checklist cannot be persisted.
    pub async fn toggle_checklist_item(&self, item: &ChecklistItemId) -> Result<bool, StateError> {
        self.mutate(StorageKey::Checklist, |maps| {
            let entry = maps.checklist.entry(item.clone()).or_insert(false);
            *entry = !*entry;
            let checked = *entry;
            (checked, encode(&maps.checklist))
        })
        .await
    }

    #[must_use]
    pub fn is_checked(&self, item: &ChecklistItemId) -> bool {
        self.read().checklist.get(item).copied().unwrap_or(false)
    }

    /// Tally over the items rendered on a page.
    #[must_use]
    pub fn checklist_tally(&self, items: &[ChecklistItemId]) -> ChecklistTally {
        let maps = self.read();
        ChecklistTally {
            checked: items
                .iter()
                .filter(|id| maps.checklist.get(*id).copied().unwrap_or(false))
                .count(),
            total: items.len(),
        }
    }

    //
    // ─── EXPANDED QUESTIONS ────────────────────────────────────────────────────
    //

    /// Flip the question and return whether it is now expanded.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the expansion map cannot be persisted.
    pub async fn toggle_question_expanded(&self, question: &QuestionId) -> Result<bool, StateError> {
        self.mutate(StorageKey::ExpandedQuestions, |maps| {
            let entry = maps.expanded.entry(question.clone()).or_insert(false);
            *entry = !*entry;
            let expanded = *entry;
            (expanded, encode(&maps.expanded))
        })
        .await
    }

    /// Force a question open or closed. Skips the write when nothing changes.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the expansion map cannot be persisted.
    pub async fn set_question_expanded(
        &self,
        question: &QuestionId,
        expanded: bool,
    ) -> Result<bool, StateError> {
        self.set_questions_expanded(std::slice::from_ref(question), expanded)
            .await
    }

    /// Force every listed question open or closed with a single write.
    /// Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the expansion map cannot be persisted.
    pub async fn set_questions_expanded(
        &self,
        questions: &[QuestionId],
        expanded: bool,
    ) -> Result<bool, StateError> {
        self.mutate_if(StorageKey::ExpandedQuestions, |maps| {
            let mut changed = false;
            for id in questions {
                let previous = maps.expanded.insert(id.clone(), expanded);
                changed |= previous.unwrap_or(false) != expanded;
            }
            changed.then(|| encode(&maps.expanded))
        })
        .await
    }

    #[must_use]
    pub fn is_question_expanded(&self, question: &QuestionId) -> bool {
        self.read().expanded.get(question).copied().unwrap_or(false)
    }

    /// How many of `questions` are currently expanded.
    #[must_use]
    pub fn expansion_count(&self, questions: &[QuestionId]) -> ExpansionCount {
        let maps = self.read();
        ExpansionCount {
            expanded: questions
                .iter()
                .filter(|id| maps.expanded.get(*id).copied().unwrap_or(false))
                .count(),
            total: questions.len(),
        }
    }

    //
    // ─── LIFECYCLE ─────────────────────────────────────────────────────────────
    //

    /// Write the in-memory copy of one collection back to storage.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the collection cannot be encoded or written.
    pub async fn save(&self, key: StorageKey) -> Result<(), StateError> {
        let _gate = self.write_gate.lock().await;
        let encoded = {
            let maps = self.read();
            match key {
                StorageKey::Progress => encode(&maps.progress),
                StorageKey::Bookmarks => encode(&maps.bookmarks),
                StorageKey::Checklist => encode(&maps.checklist),
                StorageKey::ExpandedQuestions => encode(&maps.expanded),
            }
        };
        self.persist(key, encoded).await
    }

    /// `save` for every collection.
    ///
    /// # Errors
    ///
    /// Returns the first `StateError` encountered.
    pub async fn save_all(&self) -> Result<(), StateError> {
        for key in StorageKey::ALL {
            self.save(key).await?;
        }
        Ok(())
    }

    //
    // ─── INTERNALS ─────────────────────────────────────────────────────────────
    //

    fn read(&self) -> MutexGuard<'_, StateMaps> {
        self.maps.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn mutate<R>(
        &self,
        key: StorageKey,
        apply: impl FnOnce(&mut StateMaps) -> (R, Encoded),
    ) -> Result<R, StateError> {
        let _gate = self.write_gate.lock().await;
        let (result, encoded) = {
            let mut maps = self.read();
            apply(&mut *maps)
        };
        self.revision.fetch_add(1, Ordering::AcqRel);
        self.persist(key, encoded).await?;
        Ok(result)
    }

    async fn mutate_if(
        &self,
        key: StorageKey,
        apply: impl FnOnce(&mut StateMaps) -> Option<Encoded>,
    ) -> Result<bool, StateError> {
        let _gate = self.write_gate.lock().await;
        let encoded = {
            let mut maps = self.read();
            apply(&mut *maps)
        };
        let Some(encoded) = encoded else {
            return Ok(false);
        };
        self.revision.fetch_add(1, Ordering::AcqRel);
        self.persist(key, encoded).await?;
        Ok(true)
    }

    async fn persist(&self, key: StorageKey, encoded: Encoded) -> Result<(), StateError> {
        let payload = encoded.map_err(|source| StateError::Encode {
            key: key.as_str(),
            source,
        })?;
        self.store.put(key.as_str(), &payload).await?;
        tracing::trace!(key = key.as_str(), bytes = payload.len(), "persisted study state");
        Ok(())
    }
}

/// A collection serialized while the maps are locked.
type Encoded = Result<String, serde_json::Error>;

fn encode<T: Serialize>(value: &T) -> Encoded {
    serde_json::to_string(value)
}

async fn read_entry<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: StorageKey) -> T {
    let raw = match store.get(key.as_str()).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(err) => {
            tracing::warn!(key = key.as_str(), error = %err, "failed to read study state");
            return T::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        tracing::warn!(key = key.as_str(), error = %err, "discarding malformed study state");
        T::default()
    })
}
