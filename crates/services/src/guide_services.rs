use std::path::PathBuf;
use std::sync::Arc;

use guide_core::model::{PageId, PageTable, QuestionId};
use guide_core::settings::GuideSettings;
use storage::content::DirectoryContent;
use storage::repository::Storage;

use crate::error::GuideServicesError;
use crate::page_library::PageLibraryService;
use crate::progress_tracker::ProgressTracker;
use crate::study_state::StudyState;
use crate::Clock;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct GuideServices {
    pages: Arc<PageTable>,
    settings: GuideSettings,
    state: StudyState,
    library: Arc<PageLibraryService>,
}

impl GuideServices {
    /// Build services over an already-assembled `Storage`.
    pub async fn new(
        storage: Storage,
        pages: PageTable,
        settings: GuideSettings,
        clock: Clock,
    ) -> Self {
        let pages = Arc::new(pages);
        let state = StudyState::load(Arc::clone(&storage.kv), Arc::clone(&pages), clock).await;
        let library = Arc::new(PageLibraryService::new(
            Arc::clone(&pages),
            Arc::clone(&storage.content),
            settings.search,
        ));
        Self {
            pages,
            settings,
            state,
            library,
        }
    }

    /// Build services backed by `SQLite` state and page documents read from
    /// `content_dir`.
    ///
    /// # Errors
    ///
    /// Returns `GuideServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        db_url: &str,
        content_dir: impl Into<PathBuf>,
        settings: GuideSettings,
        clock: Clock,
    ) -> Result<Self, GuideServicesError> {
        let content = DirectoryContent::new(content_dir);
        tracing::info!(content = %content.root().display(), "reading page documents");
        let storage = Storage::sqlite(db_url)
            .await?
            .with_content(Arc::new(content));
        Ok(Self::new(storage, PageTable::builtin(), settings, clock).await)
    }

    #[must_use]
    pub fn pages(&self) -> Arc<PageTable> {
        Arc::clone(&self.pages)
    }

    #[must_use]
    pub fn settings(&self) -> &GuideSettings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> StudyState {
        self.state.clone()
    }

    #[must_use]
    pub fn library(&self) -> Arc<PageLibraryService> {
        Arc::clone(&self.library)
    }

    /// A fresh tracker for one view of `page`.
    #[must_use]
    pub fn tracker(&self, page: PageId, questions: Vec<QuestionId>) -> ProgressTracker {
        ProgressTracker::new(self.state(), page, questions, self.settings.progress)
    }
}
