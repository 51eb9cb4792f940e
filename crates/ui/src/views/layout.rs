use dioxus::prelude::*;
use dioxus_router::{Outlet, use_navigator, use_route};

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{NavEntryVm, ProgressBarVm, build_nav_sections};

use super::actions::use_guide_dispatcher;
use super::bookmarks::BookmarksPanel;
use super::intent::{GuideIntent, shortcut_intent};
use super::scripts;
use super::search::SearchModal;
use super::state::use_guide_ui;

const LAYOUT_ROOT_ID: &str = "guide-root";

/// Shell around every page: sidebar navigation, toolbar and the overlays.
#[component]
pub fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_guide_ui();
    let dispatcher = use_guide_dispatcher();
    let navigator = use_navigator();

    use_effect(move || {
        if let Some(address) = ctx.take_launch_address() {
            tracing::info!(%address, "opening launch address");
            navigator.replace(Route::for_address(ctx.pages(), &address));
        }
        scripts::focus_element(LAYOUT_ROOT_ID);
    });

    let search_open = ui.search_open;
    let sidebar_open = ui.sidebar_open;

    let on_key = move |evt: KeyboardEvent| {
        let Some(intent) = shortcut_intent(&evt.data.key(), evt.data.modifiers(), *search_open.peek())
        else {
            return;
        };
        if intent == GuideIntent::OpenSearch {
            evt.prevent_default();
        }
        dispatcher.call(intent);
    };

    rsx! {
        div {
            id: LAYOUT_ROOT_ID,
            class: "layout",
            tabindex: "-1",
            onkeydown: on_key,
            onclick: move |_| dispatcher.call(GuideIntent::OutsideClick),
            Sidebar {}
            div {
                class: if sidebar_open() { "sidebar-overlay active" } else { "sidebar-overlay" },
                onclick: move |_| dispatcher.call(GuideIntent::CloseSidebar),
            }
            main { class: "main-content",
                Toolbar {}
                Outlet::<Route> {}
            }
            SearchModal {}
            BookmarksPanel {}
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_guide_ui();
    let route = use_route::<Route>();
    let _ = ui.observe();

    let state = ctx.state();
    let location = route.location();
    let current = route.page(ctx.pages()).id().clone();
    let sections = build_nav_sections(ctx.pages(), &current, &location, |page| {
        state.page_progress(page)
    });
    let overall = ProgressBarVm::new(state.total_progress());
    let dispatcher = use_guide_dispatcher();
    let sidebar_open = ui.sidebar_open;

    rsx! {
        nav { class: if sidebar_open() { "sidebar open" } else { "sidebar" },
            div { class: "sidebar-header",
                h1 { class: "sidebar-title", "Interview Prep" }
                p { class: "sidebar-subtitle", "IT Security & Infrastructure" }
                div { class: "progress-overview",
                    div { class: "progress-bar",
                        div { class: "progress-fill", style: "{overall.width_style}" }
                    }
                    span { class: "progress-text", "{overall.label}" }
                }
                div { class: "search-box",
                    input {
                        r#type: "text",
                        placeholder: "Search... (Ctrl+K)",
                        readonly: true,
                        onfocus: move |_| dispatcher.call(GuideIntent::OpenSearch),
                    }
                }
            }
            for section in sections {
                div { key: "{section.label}", class: "nav-section",
                    div { class: "nav-section-title", "{section.label}" }
                    for entry in section.entries {
                        NavLink { key: "{entry.page_id}", entry: entry.clone() }
                    }
                }
            }
        }
    }
}

#[component]
fn NavLink(entry: NavEntryVm) -> Element {
    let ctx = use_context::<AppContext>();
    let dispatcher = use_guide_dispatcher();
    let navigator = use_navigator();
    let target = ctx
        .pages()
        .get(&entry.page_id)
        .map_or(Route::Index {}, |page| Route::for_page(ctx.pages(), page, None));

    rsx! {
        a {
            class: if entry.active { "nav-item active" } else { "nav-item" },
            href: "{entry.href}",
            onclick: move |evt: MouseEvent| {
                evt.prevent_default();
                dispatcher.call(GuideIntent::CloseSidebar);
                navigator.push(target.clone());
            },
            span { class: "nav-icon", "{entry.icon}" }
            span { class: "nav-title", "{entry.title}" }
            span { class: "nav-badge {entry.status_class}", "{entry.status_label}" }
        }
    }
}

#[component]
fn Toolbar() -> Element {
    let ui = use_guide_ui();
    let dispatcher = use_guide_dispatcher();
    let has_questions = ui
        .current_page
        .read()
        .as_ref()
        .is_some_and(|page| !page.index.is_empty());

    rsx! {
        div { class: "toolbar",
            button {
                class: "menu-toggle",
                title: "Menu",
                onclick: move |evt: MouseEvent| {
                    evt.stop_propagation();
                    dispatcher.call(GuideIntent::ToggleSidebar);
                },
                "☰"
            }
            div { class: "toolbar-actions",
                button {
                    class: "toolbar-btn",
                    onclick: move |_| dispatcher.call(GuideIntent::OpenSearch),
                    "🔍 Search"
                }
                button {
                    class: "toolbar-btn bookmarks-toggle",
                    onclick: move |evt: MouseEvent| {
                        evt.stop_propagation();
                        dispatcher.call(GuideIntent::ToggleBookmarksPanel);
                    },
                    "🔖 Bookmarks"
                }
                if has_questions {
                    button {
                        class: "toolbar-btn",
                        onclick: move |_| dispatcher.call(GuideIntent::ExpandAll),
                        "Expand All"
                    }
                    button {
                        class: "toolbar-btn",
                        onclick: move |_| dispatcher.call(GuideIntent::CollapseAll),
                        "Collapse All"
                    }
                }
                button {
                    class: "toolbar-btn",
                    onclick: move |_| dispatcher.call(GuideIntent::Print),
                    "🖨 Print"
                }
            }
        }
    }
}
