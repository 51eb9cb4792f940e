//! Renders authored page blocks and binds each interactive one to the
//! study state.

use std::time::Duration;

use dioxus::prelude::*;
use guide_core::model::{
    ChecklistEntry, ChecklistGroup, CodeSnippet, ContentBlock, PageBlock, PageDocument, PageId,
    QuestionCard, QuestionId, TabGroup,
};

use crate::context::AppContext;
use crate::vm::{CopyFeedback, TabStripVm};

use super::actions::use_guide_dispatcher;
use super::intent::GuideIntent;
use super::scripts;
use super::state::use_guide_ui;

#[component]
pub fn DocumentBlocks(page: PageId, document: PageDocument) -> Element {
    let document = document.with_resolved_ids(&page);
    let rendered = document
        .blocks
        .into_iter()
        .enumerate()
        .map(move |(index, block)| match block {
            PageBlock::Heading { text } => rsx! {
                h2 { key: "block-{index}", class: "section-title", "{text}" }
            },
            PageBlock::Paragraph { text } => rsx! {
                p { key: "block-{index}", class: "section-text", "{text}" }
            },
            PageBlock::Question(card) => match card.id.clone() {
                Some(id) => rsx! {
                    QuestionCardView { key: "{id}", page: page.clone(), id, card }
                },
                None => VNode::empty(),
            },
            PageBlock::Checklist(group) => rsx! {
                ChecklistView { key: "block-{index}", group }
            },
            PageBlock::Tabs(group) => rsx! {
                TabsView { key: "block-{index}", group }
            },
            PageBlock::Code(snippet) => rsx! {
                CodeBlockView { key: "block-{index}", snippet }
            },
        });

    rsx! {
        div { class: "page-blocks", {rendered} }
    }
}

#[component]
fn ContentBlocks(blocks: Vec<ContentBlock>) -> Element {
    let rendered = blocks.into_iter().enumerate().map(|(index, block)| match block {
        ContentBlock::Paragraph { text } => rsx! { p { key: "{index}", "{text}" } },
        ContentBlock::List { items } => rsx! {
            ul { key: "{index}",
                for (item_index, item) in items.into_iter().enumerate() {
                    li { key: "{item_index}", "{item}" }
                }
            }
        },
        ContentBlock::Code(snippet) => rsx! { CodeBlockView { key: "{index}", snippet } },
    });
    rsx! {
        {rendered}
    }
}

// ─── Question cards ─────────────────────────────────────────────────────────

#[component]
pub fn QuestionCardView(page: PageId, id: QuestionId, card: QuestionCard) -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_guide_ui();
    let _ = ui.observe();
    let dispatcher = use_guide_dispatcher();

    let state = ctx.state();
    let expanded = state.is_question_expanded(&id);
    let bookmarked = state.is_bookmarked(&page, &id);

    let toggle_id = id.clone();
    let bookmark_intent = GuideIntent::ToggleBookmark {
        page,
        question: id.clone(),
        title: card.title.clone(),
    };

    rsx! {
        div { class: "question-card", id: "{id}",
            div {
                class: if expanded { "question-header expanded" } else { "question-header" },
                onclick: move |_| dispatcher.call(GuideIntent::ToggleQuestion(toggle_id.clone())),
                span { class: "question-title", "{card.title}" }
                div { class: "question-actions",
                    button {
                        class: if bookmarked { "bookmark-btn bookmarked" } else { "bookmark-btn" },
                        title: if bookmarked { "Remove bookmark" } else { "Bookmark this question" },
                        onclick: move |evt: MouseEvent| {
                            evt.stop_propagation();
                            dispatcher.call(bookmark_intent.clone());
                        },
                        if bookmarked { "★" } else { "☆" }
                    }
                    span { class: "question-toggle", "▼" }
                }
            }
            div { class: if expanded { "question-content show" } else { "question-content" },
                ContentBlocks { blocks: card.body.clone() }
            }
        }
    }
}

// ─── Checklist ──────────────────────────────────────────────────────────────

#[component]
fn ChecklistView(group: ChecklistGroup) -> Element {
    rsx! {
        div { class: "checklist",
            if let Some(title) = &group.title {
                h3 { class: "checklist-title", "{title}" }
            }
            ul {
                for entry in group.items.iter() {
                    ChecklistItemView { key: "{entry.id}", entry: entry.clone() }
                }
            }
        }
    }
}

#[component]
fn ChecklistItemView(entry: ChecklistEntry) -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_guide_ui();
    let _ = ui.observe();
    let dispatcher = use_guide_dispatcher();

    let checked = ctx.state().is_checked(&entry.id);
    let item = entry.id.clone();

    rsx! {
        li {
            class: if checked { "checklist-item checked" } else { "checklist-item" },
            onclick: move |_| dispatcher.call(GuideIntent::ToggleChecklistItem(item.clone())),
            span { class: "checklist-box", if checked { "✓" } }
            span { class: "checklist-label", "{entry.label}" }
        }
    }
}

// ─── Tabs ───────────────────────────────────────────────────────────────────

#[component]
fn TabsView(group: TabGroup) -> Element {
    let ui = use_guide_ui();
    let dispatcher = use_guide_dispatcher();
    let key = group.initial_target().unwrap_or_default().to_string();
    let strip = {
        let selected = ui.selected_tabs.read();
        TabStripVm::new(&group, selected.get(&key).map(String::as_str))
    };

    let buttons = strip.tabs.iter().cloned().map(move |tab| {
        let intent = GuideIntent::SelectTab {
            group: key.clone(),
            target: tab.target.clone(),
        };
        rsx! {
            button {
                key: "{tab.target}",
                class: if tab.active { "tab-btn active" } else { "tab-btn" },
                onclick: move |_| dispatcher.call(intent.clone()),
                "{tab.label}"
            }
        }
    });
    let panels = group.panels.into_iter().map(|panel| {
        let active = strip.is_panel_active(&panel.id);
        rsx! {
            div {
                key: "{panel.id}",
                id: "{panel.id}",
                class: if active { "tab-content active" } else { "tab-content" },
                ContentBlocks { blocks: panel.body }
            }
        }
    });

    rsx! {
        div { class: "tabs",
            div { class: "tab-buttons", {buttons} }
            {panels}
        }
    }
}

// ─── Code blocks ────────────────────────────────────────────────────────────

/// Label state of a copy control plus the pending revert.
#[derive(Clone, Copy)]
pub struct CopyControl {
    feedback: Signal<CopyFeedback>,
    revert_task: Signal<Option<Task>>,
    revert_after: Duration,
}

impl CopyControl {
    /// Show the confirmation and schedule its revert, replacing any revert
    /// still pending from an earlier copy.
    pub fn confirm(mut self) {
        let generation = self.feedback.write().confirm();
        if let Some(previous) = self.revert_task.write().take() {
            previous.cancel();
        }
        let mut feedback = self.feedback;
        let revert_after = self.revert_after;
        let task = spawn(async move {
            tokio::time::sleep(revert_after).await;
            feedback.write().revert(generation);
        });
        self.revert_task.set(Some(task));
    }

    #[must_use]
    pub fn feedback(&self) -> CopyFeedback {
        *self.feedback.read()
    }
}

pub fn use_copy_control(revert_after: Duration) -> CopyControl {
    let feedback = use_signal(CopyFeedback::default);
    let revert_task = use_signal(|| None::<Task>);
    CopyControl {
        feedback,
        revert_task,
        revert_after,
    }
}

#[component]
fn CodeBlockView(snippet: CodeSnippet) -> Element {
    let ctx = use_context::<AppContext>();
    let control = use_copy_control(Duration::from_millis(ctx.settings().copy_feedback_ms));

    let code = snippet.code.clone();
    let on_copy = move |_| {
        let code = code.clone();
        spawn(async move {
            match scripts::write_clipboard(&code).await {
                Ok(()) => control.confirm(),
                Err(err) => tracing::error!(error = %err, "failed to copy code to the clipboard"),
            }
        });
    };

    let feedback = control.feedback();
    let language = snippet.language.as_deref().unwrap_or("code");

    rsx! {
        div { class: "code-block",
            div { class: "code-header",
                span { class: "code-lang", "{language}" }
                button {
                    class: if feedback.is_copied() { "copy-btn copied" } else { "copy-btn" },
                    onclick: on_copy,
                    "{feedback.label()}"
                }
            }
            pre { code { "{snippet.code}" } }
        }
    }
}
