use dioxus::prelude::*;
use guide_core::search::{Highlighted, SearchHit};

use crate::vm::{SearchPanelVm, search_panel};

use super::actions::use_guide_dispatcher;
use super::intent::GuideIntent;
use super::scripts::{self, SEARCH_INPUT_ID};
use super::state::use_guide_ui;

/// Search overlay over the current page's questions. Closing it clears the
/// query.
#[component]
pub fn SearchModal() -> Element {
    let ui = use_guide_ui();
    let dispatcher = use_guide_dispatcher();
    let query = ui.search_query;
    let search_open = ui.search_open;

    use_effect(move || {
        if search_open() {
            scripts::focus_element(SEARCH_INPUT_ID);
        }
    });

    if !search_open() {
        return rsx! {};
    }

    let panel = {
        let current = ui.current_page.read();
        search_panel(current.as_ref().map(|page| &page.index), &query.read())
    };

    rsx! {
        div {
            class: "search-modal show",
            onclick: move |_| dispatcher.call(GuideIntent::CloseSearch),
            div {
                class: "search-modal-content",
                onclick: move |evt| evt.stop_propagation(),
                div { class: "search-modal-header",
                    input {
                        id: SEARCH_INPUT_ID,
                        class: "search-modal-input",
                        r#type: "text",
                        placeholder: "Search questions, topics, commands...",
                        autocomplete: "off",
                        value: "{query}",
                        oninput: move |evt| dispatcher.call(GuideIntent::SetQuery(evt.value())),
                    }
                }
                div { class: "search-results",
                    match panel {
                        SearchPanelVm::Results(hits) => rsx! {
                            for hit in hits {
                                SearchResult { key: "{hit.id}", hit: hit.clone() }
                            }
                        },
                        other => rsx! {
                            div { class: "search-empty", "{other.message().unwrap_or_default()}" }
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn SearchResult(hit: SearchHit) -> Element {
    let dispatcher = use_guide_dispatcher();
    let question = hit.id.clone();

    rsx! {
        div {
            class: "search-result",
            onclick: move |_| dispatcher.call(GuideIntent::SelectSearchResult(question.clone())),
            div { class: "search-result-category", "{hit.page_title}" }
            div { class: "search-result-title", HighlightedText { text: hit.title.clone() } }
            div { class: "search-result-excerpt", HighlightedText { text: hit.excerpt.clone() } }
        }
    }
}

#[component]
fn HighlightedText(text: Highlighted) -> Element {
    rsx! {
        for (index, segment) in text.segments.iter().enumerate() {
            if segment.is_match {
                mark { key: "{index}", "{segment.text}" }
            } else {
                span { key: "{index}", "{segment.text}" }
            }
        }
    }
}
