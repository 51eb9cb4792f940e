use std::sync::{Arc, Mutex, PoisonError};

use guide_core::model::{PageId, PageTable, QuestionId};
use guide_core::settings::GuideSettings;
use services::{PageLibraryService, ProgressTracker, StudyState};

/// What the composition root hands to the UI.
pub trait UiApp: Send + Sync {
    fn study_state(&self) -> StudyState;
    fn library(&self) -> Arc<PageLibraryService>;
    fn settings(&self) -> GuideSettings;
    fn tracker(&self, page: PageId, questions: Vec<QuestionId>) -> ProgressTracker;

    /// Address to show first, e.g. `pages/telephony.html#telephony-q2`.
    fn launch_address(&self) -> Option<String>;
}

#[derive(Clone)]
pub struct AppContext {
    app: Arc<dyn UiApp>,
    state: StudyState,
    library: Arc<PageLibraryService>,
    settings: GuideSettings,
    launch_address_once: Arc<Mutex<Option<String>>>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: Arc<dyn UiApp>) -> Self {
        let state = app.study_state();
        let library = app.library();
        let settings = app.settings();
        let launch_address = app.launch_address();
        Self {
            app,
            state,
            library,
            settings,
            launch_address_once: Arc::new(Mutex::new(launch_address)),
        }
    }

    #[must_use]
    pub fn state(&self) -> StudyState {
        self.state.clone()
    }

    #[must_use]
    pub fn library(&self) -> Arc<PageLibraryService> {
        Arc::clone(&self.library)
    }

    #[must_use]
    pub fn pages(&self) -> &PageTable {
        self.library.pages()
    }

    #[must_use]
    pub fn settings(&self) -> &GuideSettings {
        &self.settings
    }

    #[must_use]
    pub fn tracker(&self, page: PageId, questions: Vec<QuestionId>) -> ProgressTracker {
        self.app.tracker(page, questions)
    }

    /// The launch address, handed out once.
    #[must_use]
    pub fn take_launch_address(&self) -> Option<String> {
        self.launch_address_once
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
