use std::collections::HashMap;

use dioxus::prelude::*;
use services::{LoadedPage, ProgressTracker, StudyState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message() -> &'static str {
        "Something went wrong. Please try again."
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

/// Window-wide UI signals shared by the layout, the page and the overlays.
#[derive(Clone, Copy, PartialEq)]
pub struct GuideUi {
    revision: Signal<u64>,
    pub search_open: Signal<bool>,
    pub bookmarks_open: Signal<bool>,
    pub sidebar_open: Signal<bool>,
    pub search_query: Signal<String>,
    /// Active tab per tab group on the page shown, keyed by the group's first
    /// target.
    pub selected_tabs: Signal<HashMap<String, String>>,
    /// The page on screen, once its document has loaded.
    pub current_page: Signal<Option<LoadedPage>>,
    pub tracker: Signal<Option<ProgressTracker>>,
}

impl GuideUi {
    fn new() -> Self {
        Self {
            revision: Signal::new(0),
            search_open: Signal::new(false),
            bookmarks_open: Signal::new(false),
            sidebar_open: Signal::new(false),
            search_query: Signal::new(String::new()),
            selected_tabs: Signal::new(HashMap::new()),
            current_page: Signal::new(None),
            tracker: Signal::new(None),
        }
    }

    /// Subscribe the calling component to study state changes.
    #[must_use]
    pub fn observe(&self) -> u64 {
        (self.revision)()
    }

    /// Re-render every observer after a `StudyState` mutation.
    pub fn refresh(mut self, state: &StudyState) {
        let revision = state.revision();
        if *self.revision.peek() != revision {
            self.revision.set(revision);
        }
    }
}

pub fn use_guide_ui_provider() -> GuideUi {
    use_context_provider(GuideUi::new)
}

#[must_use]
pub fn use_guide_ui() -> GuideUi {
    use_context::<GuideUi>()
}
