use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::use_navigator;
use guide_core::model::{PageId, QuestionId};
use services::LoadedPage;

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{NavEntryVm, ProgressBarVm, build_nav_sections};

use super::actions;
use super::blocks::DocumentBlocks;
use super::scripts::{self, CONTENT_BODY_ID};
use super::state::{GuideUi, ViewError, ViewState, use_guide_ui, view_state_from_resource};

#[component]
pub fn PageView(file: String, question: String) -> Element {
    let ctx = use_context::<AppContext>();
    let route = Route::Page { file, question };
    let page = route.page(ctx.pages()).id().clone();
    rsx! {
        PageScreen { page, question: route.question(), overview: false }
    }
}

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let page = ctx.pages().landing().id().clone();
    rsx! {
        PageScreen { page, question: None, overview: true }
    }
}

/// One loaded page: header, authored blocks and the progress tracker bound
/// to its scroll container. `question` is expanded and revealed on arrival;
/// `overview` adds the dashboard cards above the blocks.
#[component]
fn PageScreen(
    page: PageId,
    #[props(!optional)] question: Option<QuestionId>,
    overview: bool,
) -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_guide_ui();
    let _ = ui.observe();

    let library = ctx.library();
    let resource = use_resource(use_reactive((&page,), move |(page,)| {
        let library = library.clone();
        async move {
            let descriptor = library.pages().get(&page).ok_or(ViewError::Unknown)?.clone();
            Ok::<LoadedPage, ViewError>(library.load(&descriptor).await)
        }
    }));

    let mut arrived = use_signal(|| None::<(PageId, Option<QuestionId>)>);
    let effect_ctx = ctx.clone();
    use_effect(use_reactive((&question,), move |(question,)| {
        let Some(Ok(loaded)) = resource.value().read().clone() else {
            return;
        };
        let page = loaded.descriptor.id().clone();
        let key = (page.clone(), question.clone());
        if arrived.peek().as_ref() == Some(&key) {
            return;
        }
        let page_changed = arrived.peek().as_ref().map(|(seen, _)| seen) != Some(&page);
        arrived.set(Some(key));

        let GuideUi {
            mut current_page,
            mut tracker,
            mut selected_tabs,
            ..
        } = ui;
        if page_changed {
            selected_tabs.write().clear();
        }
        current_page.set(Some(loaded.clone()));
        let fresh = effect_ctx.tracker(page, loaded.document.question_ids());
        tracker.set(Some(fresh.clone()));

        let state = effect_ctx.state();
        let delay = Duration::from_millis(effect_ctx.settings().fragment_scroll_delay_ms);
        let target = question.filter(|id| loaded.document.find_question(id).is_some());
        spawn(async move {
            if let Some(target) = &target {
                if let Err(err) = state.set_question_expanded(target, true).await {
                    tracing::warn!(question = %target, error = %err, "failed to save expanded question");
                }
            }
            match fresh.initialize().await {
                Ok(Some(percent)) => tracing::debug!(page = %fresh.page(), percent, "page opened"),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(page = %fresh.page(), error = %err, "failed to save page progress");
                }
            }
            ui.refresh(&state);
            if let Some(target) = target {
                tokio::time::sleep(delay).await;
                scripts::reveal_question(&target).await;
            }
        });
    }));

    let scroll_state = ctx.state();
    let on_scroll = move |_| {
        let tracker = ui.tracker.peek().clone();
        if let Some(tracker) = tracker {
            actions::schedule_progress(ui, scroll_state.clone(), tracker);
        }
    };

    match view_state_from_resource(resource) {
        ViewState::Idle | ViewState::Loading => rsx! {
            div { class: "content-body", id: CONTENT_BODY_ID,
                p { class: "loading", "Loading..." }
            }
        },
        ViewState::Error(_) => rsx! {
            div { class: "content-body", id: CONTENT_BODY_ID,
                p { class: "error", "{ViewError::message()}" }
            }
        },
        ViewState::Ready(loaded) => {
            let items: Vec<_> = loaded
                .document
                .checklist_items()
                .into_iter()
                .map(|entry| entry.id.clone())
                .collect();
            let checklist_label = ctx.state().checklist_tally(&items).label();
            rsx! {
                div {
                    class: "content-body",
                    id: CONTENT_BODY_ID,
                    onscroll: on_scroll,
                    header { class: "page-header",
                        h1 { class: "page-title", "{loaded.document.title}" }
                        if let Some(subtitle) = &loaded.document.subtitle {
                            p { class: "page-subtitle", "{subtitle}" }
                        }
                        if let Some(label) = checklist_label {
                            div { class: "checklist-progress", "{label}" }
                        }
                    }
                    if overview {
                        DashboardOverview {}
                    }
                    DocumentBlocks {
                        page: loaded.descriptor.id().clone(),
                        document: loaded.document.clone(),
                    }
                }
            }
        }
    }
}

/// Overall progress and one card per tracked page, grouped by section.
#[component]
fn DashboardOverview() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_guide_ui();
    let _ = ui.observe();

    let state = ctx.state();
    let pages = ctx.pages();
    let landing = pages.landing();
    let overall = ProgressBarVm::new(state.total_progress());
    let sections: Vec<_> = build_nav_sections(pages, landing.id(), "/", |page| {
        state.page_progress(page)
    })
    .into_iter()
    .filter_map(|mut section| {
        section.entries.retain(|entry| !pages.is_landing(&entry.page_id));
        (!section.entries.is_empty()).then_some(section)
    })
    .collect();

    rsx! {
        div { class: "dashboard",
            div { class: "overall-progress",
                h2 { "Overall Progress" }
                div { class: "progress-bar large",
                    div { class: "progress-fill", style: "{overall.width_style}" }
                }
                span { class: "progress-text", "{overall.label}" }
            }
            for section in sections {
                div { key: "{section.label}", class: "dashboard-section",
                    h2 { class: "section-title", "{section.label}" }
                    div { class: "topic-grid",
                        for entry in section.entries {
                            TopicCard { key: "{entry.page_id}", entry: entry.clone() }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn TopicCard(entry: NavEntryVm) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let target = ctx
        .pages()
        .get(&entry.page_id)
        .map_or(Route::Index {}, |page| Route::for_page(ctx.pages(), page, None));

    rsx! {
        a {
            class: "topic-card",
            href: "{entry.href}",
            onclick: move |evt: MouseEvent| {
                evt.prevent_default();
                navigator.push(target.clone());
            },
            span { class: "topic-icon", "{entry.icon}" }
            h3 { class: "topic-title", "{entry.title}" }
            span { class: "nav-badge {entry.status_class}", "{entry.status_label}" }
        }
    }
}
