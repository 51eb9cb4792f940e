use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use guide_core::model::{ChecklistItemId, PageId, QuestionId};

use super::blocks::use_copy_control;
use super::intent::{GuideIntent, shortcut_intent};
use super::test_harness::{ViewHarness, drive_dom, setup_view_harness, test_services};

const INCIDENT_RESPONSE: &str = "pages/incident-response.html";

async fn incident_response() -> ViewHarness {
    let services = test_services().await;
    let mut harness = setup_view_harness(services, Some(INCIDENT_RESPONSE));
    harness.settle().await;
    harness
}

fn first_question() -> QuestionId {
    QuestionId::new("incident-response-q0")
}

fn custody() -> QuestionId {
    QuestionId::new("chain-of-custody")
}

/// Up to `len` bytes of markup following the first `marker`.
fn after<'a>(html: &'a str, marker: &str, len: usize) -> &'a str {
    let Some(start) = html.find(marker) else {
        return "";
    };
    let rest = &html[start..];
    let mut end = len.min(rest.len());
    while !rest.is_char_boundary(end) {
        end -= 1;
    }
    &rest[..end]
}

#[tokio::test(flavor = "current_thread")]
async fn header_click_toggles_and_persists_expansion() {
    let mut harness = incident_response().await;
    assert!(!harness.render().contains("question-content show"));

    harness
        .dispatch(GuideIntent::ToggleQuestion(first_question()))
        .await;
    let state = harness.state();
    assert!(state.is_question_expanded(&first_question()));
    assert!(!state.is_question_expanded(&custody()));
    let html = harness.render();
    assert!(html.contains("question-header expanded"), "missing expanded header in {html}");
    assert!(html.contains("question-content show"), "missing expanded card in {html}");

    harness
        .dispatch(GuideIntent::ToggleQuestion(first_question()))
        .await;
    assert!(!harness.state().is_question_expanded(&first_question()));
    let html = harness.render();
    assert!(!html.contains("question-content show"), "card still expanded in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn bookmark_toggle_does_not_expand_the_card() {
    let mut harness = incident_response().await;
    let page = PageId::new("incident-response");
    let bookmark = GuideIntent::ToggleBookmark {
        page: page.clone(),
        question: custody(),
        title: "Why does chain of custody matter?".to_string(),
    };

    harness.dispatch(bookmark.clone()).await;
    let state = harness.state();
    assert!(state.is_bookmarked(&page, &custody()));
    assert!(!state.is_question_expanded(&custody()));
    let html = harness.render();
    assert!(html.contains("bookmark-btn bookmarked"), "missing filled star in {html}");
    assert!(html.contains("bookmark-item"), "missing bookmark row in {html}");
    assert!(!html.contains("question-content show"), "card expanded in {html}");

    harness.dispatch(bookmark).await;
    assert!(!harness.state().is_bookmarked(&page, &custody()));
    assert!(!harness.render().contains("bookmark-btn bookmarked"));
}

#[tokio::test(flavor = "current_thread")]
async fn checklist_clicks_update_the_counter() {
    let mut harness = incident_response().await;
    assert!(harness.render().contains("0/2 (0%)"));

    harness
        .dispatch(GuideIntent::ToggleChecklistItem(ChecklistItemId::new("ir-1")))
        .await;
    let html = harness.render();
    assert!(html.contains("1/2 (50%)"), "missing half counter in {html}");
    assert!(html.contains("checklist-item checked"), "missing checked item in {html}");

    harness
        .dispatch(GuideIntent::ToggleChecklistItem(ChecklistItemId::new("ir-2")))
        .await;
    assert!(harness.render().contains("2/2 (100%)"));

    harness
        .dispatch(GuideIntent::ToggleChecklistItem(ChecklistItemId::new("ir-1")))
        .await;
    assert!(harness.render().contains("1/2 (50%)"));
    assert!(!harness.state().is_checked(&ChecklistItemId::new("ir-1")));
}

#[tokio::test(flavor = "current_thread")]
async fn tab_click_deactivates_its_siblings() {
    let mut harness = incident_response().await;
    let html = harness.render();
    assert!(after(&html, "tab-btn active", 60).contains("Windows"), "{html}");
    assert!(after(&html, "tab-content active", 80).contains("Event Viewer"), "{html}");

    harness
        .dispatch(GuideIntent::SelectTab {
            group: "ir-win".to_string(),
            target: "ir-linux".to_string(),
        })
        .await;
    let html = harness.render();
    assert_eq!(html.matches("tab-btn active").count(), 1, "{html}");
    assert_eq!(html.matches("tab-content active").count(), 1, "{html}");
    assert!(after(&html, "tab-btn active", 60).contains("Linux"), "{html}");
    assert!(after(&html, "tab-content active", 80).contains("journalctl"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn shortcuts_open_and_close_search() {
    let mut harness = incident_response().await;
    assert!(!harness.render().contains("search-modal show"));

    let open = shortcut_intent(
        &Key::Character("k".to_string()),
        Modifiers::CONTROL,
        harness.ui(|ui| *ui.search_open.peek()),
    )
    .expect("ctrl+k is bound");
    harness.dispatch(open).await;
    let html = harness.render();
    assert!(html.contains("search-modal show"), "search not open in {html}");
    assert!(html.contains("Type to search..."), "missing prompt in {html}");

    harness
        .dispatch(GuideIntent::SetQuery("custody".to_string()))
        .await;
    let html = harness.render();
    assert!(html.contains("<mark>custody</mark>"), "missing highlight in {html}");
    assert!(!html.contains("No results found"), "{html}");

    let close = shortcut_intent(
        &Key::Escape,
        Modifiers::empty(),
        harness.ui(|ui| *ui.search_open.peek()),
    )
    .expect("escape closes an open search");
    harness.dispatch(close).await;
    assert!(!harness.render().contains("search-modal show"));
    assert!(harness.ui(|ui| ui.search_query.peek().is_empty()));
}

#[tokio::test(flavor = "current_thread")]
async fn backdrop_click_closes_search_and_result_reveals_question() {
    let mut harness = incident_response().await;

    harness.dispatch(GuideIntent::OpenSearch).await;
    harness.dispatch(GuideIntent::CloseSearch).await;
    assert!(!harness.render().contains("search-modal show"));

    harness.dispatch(GuideIntent::OpenSearch).await;
    harness
        .dispatch(GuideIntent::SetQuery("zzzz".to_string()))
        .await;
    assert!(harness.render().contains("No results found"));

    harness
        .dispatch(GuideIntent::SelectSearchResult(custody()))
        .await;
    assert!(!harness.render().contains("search-modal show"));
    assert!(harness.state().is_question_expanded(&custody()));
}

#[tokio::test(flavor = "current_thread")]
async fn outside_click_closes_bookmarks_panel() {
    let mut harness = incident_response().await;
    assert!(!harness.render().contains("bookmarks-panel show"));

    harness.dispatch(GuideIntent::ToggleBookmarksPanel).await;
    assert!(harness.render().contains("bookmarks-panel show"));

    harness.dispatch(GuideIntent::OutsideClick).await;
    assert!(!harness.render().contains("bookmarks-panel show"));

    harness.dispatch(GuideIntent::OutsideClick).await;
    assert!(!harness.ui(|ui| *ui.bookmarks_open.peek()));

    harness.dispatch(GuideIntent::ToggleBookmarksPanel).await;
    harness.dispatch(GuideIntent::CloseBookmarksPanel).await;
    assert!(!harness.render().contains("bookmarks-panel show"));
}

#[tokio::test(flavor = "current_thread")]
async fn same_page_bookmark_closes_panel_and_expands_question() {
    let mut harness = incident_response().await;
    harness.dispatch(GuideIntent::ToggleBookmarksPanel).await;

    harness.dispatch(GuideIntent::OpenBookmark(custody())).await;
    assert!(!harness.ui(|ui| *ui.bookmarks_open.peek()));
    assert!(harness.state().is_question_expanded(&custody()));
}

#[tokio::test(flavor = "current_thread")]
async fn expand_all_and_collapse_all_cover_every_question() {
    let mut harness = incident_response().await;

    harness.dispatch(GuideIntent::ExpandAll).await;
    let state = harness.state();
    assert!(state.is_question_expanded(&first_question()));
    assert!(state.is_question_expanded(&custody()));
    assert_eq!(harness.render().matches("question-content show").count(), 2);

    harness.dispatch(GuideIntent::CollapseAll).await;
    assert!(!harness.state().is_question_expanded(&first_question()));
    assert!(!harness.render().contains("question-content show"));
}

#[tokio::test(flavor = "current_thread")]
async fn sidebar_toggle_and_close() {
    let mut harness = incident_response().await;

    harness.dispatch(GuideIntent::ToggleSidebar).await;
    assert!(harness.render().contains("sidebar open"));
    assert!(harness.render().contains("sidebar-overlay active"));

    harness.dispatch(GuideIntent::CloseSidebar).await;
    assert!(!harness.render().contains("sidebar open"));
}

// ─── Copy feedback ──────────────────────────────────────────────────────────

const REVERT_AFTER: Duration = Duration::from_millis(60);

#[derive(Clone, Default)]
struct CopyHandles(Rc<RefCell<Option<Callback<()>>>>);

impl PartialEq for CopyHandles {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn CopyLabel(handles: CopyHandles) -> Element {
    let control = use_copy_control(REVERT_AFTER);
    let confirm = use_callback(move |()| control.confirm());
    let mut registered = use_signal(|| false);
    if !registered() {
        registered.set(true);
        *handles.0.borrow_mut() = Some(confirm);
    }
    let feedback = control.feedback();
    rsx! {
        span { "{feedback.label()}" }
    }
}

async fn run_for(dom: &mut VirtualDom, duration: Duration) {
    let deadline = tokio::time::Instant::now() + duration;
    while tokio::time::Instant::now() < deadline {
        let remaining = deadline - tokio::time::Instant::now();
        let _ = tokio::time::timeout(remaining, dom.wait_for_work()).await;
        dom.render_immediate(&mut NoOpMutations);
    }
}

#[tokio::test(flavor = "current_thread")]
async fn copy_label_confirms_then_reverts_once() {
    let handles = CopyHandles::default();
    let mut dom = VirtualDom::new_with_props(
        CopyLabel,
        CopyLabelProps {
            handles: handles.clone(),
        },
    );
    dom.rebuild_in_place();
    drive_dom(&mut dom);
    assert!(dioxus_ssr::render(&dom).contains(">Copy<"));

    let confirm = (*handles.0.borrow()).expect("confirm registered");
    dom.in_runtime(|| confirm.call(()));
    drive_dom(&mut dom);
    assert!(dioxus_ssr::render(&dom).contains("Copied!"));

    run_for(&mut dom, Duration::from_millis(30)).await;
    dom.in_runtime(|| confirm.call(()));
    drive_dom(&mut dom);

    // past the first revert, short of the second
    run_for(&mut dom, Duration::from_millis(45)).await;
    assert!(dioxus_ssr::render(&dom).contains("Copied!"));

    run_for(&mut dom, Duration::from_millis(60)).await;
    assert!(dioxus_ssr::render(&dom).contains(">Copy<"));
}
