//! Intent dispatch and the page-level actions behind it.

use std::time::Duration;

use dioxus::prelude::*;
use guide_core::model::{ChecklistItemId, PageId, QuestionId};
use services::{ProgressTracker, StudyState};

use crate::context::AppContext;

use super::intent::GuideIntent;
use super::scripts::{self, SEARCH_INPUT_ID};
use super::state::{GuideUi, use_guide_ui};

#[derive(Clone, Copy)]
pub struct GuideDispatcher {
    pub dispatch: Callback<GuideIntent>,
}

impl GuideDispatcher {
    pub fn call(&self, intent: GuideIntent) {
        self.dispatch.call(intent);
    }
}

/// Build the dispatcher and provide it to every component below the caller.
/// Call after `use_guide_ui_provider`.
pub fn use_guide_dispatcher_provider() -> GuideDispatcher {
    let ctx = use_context::<AppContext>();
    let ui = use_guide_ui();
    let dispatch = use_callback(move |intent: GuideIntent| apply_intent(&ctx, ui, intent));
    use_context_provider(|| GuideDispatcher { dispatch })
}

#[must_use]
pub fn use_guide_dispatcher() -> GuideDispatcher {
    use_context::<GuideDispatcher>()
}

fn apply_intent(ctx: &AppContext, ui: GuideUi, intent: GuideIntent) {
    let GuideUi {
        mut search_open,
        mut bookmarks_open,
        mut sidebar_open,
        mut search_query,
        mut selected_tabs,
        ..
    } = ui;
    let state = ctx.state();
    match intent {
        GuideIntent::ToggleQuestion(question) => toggle_question(ui, state, question),
        GuideIntent::ToggleBookmark {
            page,
            question,
            title,
        } => toggle_bookmark(ui, state, page, question, title),
        GuideIntent::ToggleChecklistItem(item) => toggle_checklist_item(ui, state, item),
        GuideIntent::SelectTab { group, target } => {
            selected_tabs.write().insert(group, target);
        }
        GuideIntent::OpenSearch => {
            search_open.set(true);
            scripts::focus_element(SEARCH_INPUT_ID);
        }
        GuideIntent::CloseSearch => {
            search_open.set(false);
            search_query.set(String::new());
        }
        GuideIntent::SetQuery(query) => search_query.set(query),
        GuideIntent::SelectSearchResult(question) => {
            search_open.set(false);
            search_query.set(String::new());
            reveal_question(ui, state, question, Duration::ZERO);
        }
        GuideIntent::ToggleBookmarksPanel => {
            let open = *bookmarks_open.peek();
            bookmarks_open.set(!open);
        }
        GuideIntent::CloseBookmarksPanel => bookmarks_open.set(false),
        GuideIntent::OpenBookmark(question) => {
            bookmarks_open.set(false);
            reveal_question(ui, state, question, Duration::ZERO);
        }
        GuideIntent::OutsideClick => {
            if *bookmarks_open.peek() {
                bookmarks_open.set(false);
            }
        }
        GuideIntent::ToggleSidebar => {
            let open = *sidebar_open.peek();
            sidebar_open.set(!open);
        }
        GuideIntent::CloseSidebar => sidebar_open.set(false),
        GuideIntent::ExpandAll => set_all_expanded(ui, state, true),
        GuideIntent::CollapseAll => set_all_expanded(ui, state, false),
        GuideIntent::Print => print_page(ui, state),
    }
}

fn toggle_question(ui: GuideUi, state: StudyState, question: QuestionId) {
    spawn(async move {
        if let Err(err) = state.toggle_question_expanded(&question).await {
            tracing::warn!(question = %question, error = %err, "failed to save expanded question");
        }
        ui.refresh(&state);
        let tracker = ui.tracker.peek().clone();
        if let Some(tracker) = tracker {
            schedule_progress(ui, state, tracker);
        }
    });
}

fn toggle_bookmark(ui: GuideUi, state: StudyState, page: PageId, question: QuestionId, title: String) {
    spawn(async move {
        match state.toggle_bookmark(&page, &question, &title).await {
            Ok(now_bookmarked) => {
                tracing::debug!(page = %page, question = %question, now_bookmarked, "bookmark toggled");
            }
            Err(err) => {
                tracing::warn!(page = %page, question = %question, error = %err, "failed to save bookmark");
            }
        }
        ui.refresh(&state);
    });
}

fn toggle_checklist_item(ui: GuideUi, state: StudyState, item: ChecklistItemId) {
    spawn(async move {
        if let Err(err) = state.toggle_checklist_item(&item).await {
            tracing::warn!(item = %item, error = %err, "failed to save checklist item");
        }
        ui.refresh(&state);
    });
}

/// Expand `question`, then scroll it into view once `delay` has passed.
pub fn reveal_question(ui: GuideUi, state: StudyState, question: QuestionId, delay: Duration) {
    spawn(async move {
        if let Err(err) = state.set_question_expanded(&question, true).await {
            tracing::warn!(question = %question, error = %err, "failed to save expanded question");
        }
        ui.refresh(&state);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        scripts::reveal_question(&question).await;
    });
}

/// Expand or collapse every question of the page on screen.
fn set_all_expanded(ui: GuideUi, state: StudyState, expanded: bool) {
    let questions = current_questions(ui);
    if questions.is_empty() {
        return;
    }
    spawn(async move {
        if let Err(err) = state.set_questions_expanded(&questions, expanded).await {
            tracing::warn!(expanded, error = %err, "failed to save expanded questions");
        }
        ui.refresh(&state);
    });
}

/// Open every question, then hand the page to the print dialog.
fn print_page(ui: GuideUi, state: StudyState) {
    let questions = current_questions(ui);
    spawn(async move {
        if let Err(err) = state.set_questions_expanded(&questions, true).await {
            tracing::warn!(error = %err, "failed to save expanded questions before printing");
        }
        ui.refresh(&state);
        scripts::print_page().await;
    });
}

/// Re-evaluate page progress on the next frame unless an evaluation is
/// already pending.
pub fn schedule_progress(ui: GuideUi, state: StudyState, tracker: ProgressTracker) {
    if !tracker.request_frame() {
        return;
    }
    spawn(async move {
        let Some(metrics) = scripts::read_scroll_metrics().await else {
            tracker.abandon_frame();
            return;
        };
        match tracker.on_frame(metrics).await {
            Ok(percent) => tracing::trace!(page = %tracker.page(), percent, "page progress"),
            Err(err) => tracing::warn!(page = %tracker.page(), error = %err, "failed to save page progress"),
        }
        ui.refresh(&state);
    });
}

fn current_questions(ui: GuideUi) -> Vec<QuestionId> {
    ui.current_page
        .peek()
        .as_ref()
        .map(|page| page.document.question_ids())
        .unwrap_or_default()
}
