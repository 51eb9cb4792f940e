use dioxus::prelude::*;
use guide_core::model::{ChecklistItemId, PageId, QuestionId};

/// Everything a click or shortcut can ask of the guide.
#[derive(Clone, Debug, PartialEq)]
pub enum GuideIntent {
    ToggleQuestion(QuestionId),
    ToggleBookmark {
        page: PageId,
        question: QuestionId,
        title: String,
    },
    ToggleChecklistItem(ChecklistItemId),
    SelectTab {
        group: String,
        target: String,
    },
    OpenSearch,
    CloseSearch,
    SetQuery(String),
    SelectSearchResult(QuestionId),
    ToggleBookmarksPanel,
    CloseBookmarksPanel,
    /// Same-page bookmark: close the panel and reveal the question in place.
    OpenBookmark(QuestionId),
    /// A click that reached the layout without being claimed by a panel.
    OutsideClick,
    ToggleSidebar,
    CloseSidebar,
    ExpandAll,
    CollapseAll,
    Print,
}

/// Map a key press on the layout to an intent.
///
/// Ctrl+K or Cmd+K opens search; Escape closes it while it is open.
#[must_use]
pub fn shortcut_intent(key: &Key, modifiers: Modifiers, search_open: bool) -> Option<GuideIntent> {
    let command = modifiers.contains(Modifiers::CONTROL) || modifiers.contains(Modifiers::META);
    match key {
        Key::Character(value) if command && value.eq_ignore_ascii_case("k") => {
            Some(GuideIntent::OpenSearch)
        }
        Key::Escape if search_open => Some(GuideIntent::CloseSearch),
        _ => None,
    }
}
