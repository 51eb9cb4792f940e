use dioxus::prelude::*;
use dioxus_router::{use_navigator, use_route};

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{BookmarkEntryVm, EMPTY_HINT, EMPTY_MESSAGE, map_bookmark_entries};

use super::actions::use_guide_dispatcher;
use super::intent::GuideIntent;
use super::state::use_guide_ui;

#[component]
pub fn BookmarksPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_guide_ui();
    let _ = ui.observe();
    let dispatcher = use_guide_dispatcher();
    let open = ui.bookmarks_open;

    let entries = map_bookmark_entries(
        &ctx.state().bookmarks(),
        ctx.pages(),
        ctx.settings().bookmark_preview_chars,
    );

    rsx! {
        div {
            class: if open() { "bookmarks-panel show" } else { "bookmarks-panel" },
            onclick: move |evt| evt.stop_propagation(),
            div { class: "bookmarks-header",
                span { class: "bookmarks-title", "📌 Bookmarked Questions" }
                button {
                    class: "bookmarks-close",
                    onclick: move |_| dispatcher.call(GuideIntent::CloseBookmarksPanel),
                    "×"
                }
            }
            div { class: "bookmarks-list",
                if entries.is_empty() {
                    p { class: "bookmarks-empty",
                        "{EMPTY_MESSAGE}"
                        br {}
                        "{EMPTY_HINT}"
                    }
                }
                for entry in entries {
                    BookmarkRow {
                        key: "{entry.page_id}/{entry.question_id}",
                        entry: entry.clone(),
                    }
                }
            }
        }
    }
}

/// Opens the bookmarked question: in place when it is on the page shown,
/// otherwise by navigating to its page with the question as the fragment.
#[component]
fn BookmarkRow(entry: BookmarkEntryVm) -> Element {
    let ctx = use_context::<AppContext>();
    let dispatcher = use_guide_dispatcher();
    let navigator = use_navigator();
    let route = use_route::<Route>();

    let on_current_page = route.page(ctx.pages()).id() == &entry.page_id;
    let target = ctx
        .pages()
        .get(&entry.page_id)
        .map(|page| Route::for_page(ctx.pages(), page, Some(&entry.question_id)));
    let question = entry.question_id.clone();

    rsx! {
        div {
            class: "bookmark-item",
            onclick: move |_| {
                if on_current_page {
                    dispatcher.call(GuideIntent::OpenBookmark(question.clone()));
                } else if let Some(target) = &target {
                    dispatcher.call(GuideIntent::CloseBookmarksPanel);
                    navigator.push(target.clone());
                }
            },
            div { class: "bookmark-page", "{entry.icon} {entry.page_title}" }
            div { class: "bookmark-text", "{entry.excerpt}" }
        }
    }
}
