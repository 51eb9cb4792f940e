//! Typed page content: the markup contract the controllers bind to.
//!
//! Documents are authored as JSON, one file per page.

use serde::{Deserialize, Serialize};

use crate::model::ids::{ChecklistItemId, PageId, QuestionId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDocument {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub blocks: Vec<PageBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageBlock {
    Heading { text: String },
    Paragraph { text: String },
    Question(QuestionCard),
    Checklist(ChecklistGroup),
    Tabs(TabGroup),
    Code(CodeSnippet),
}

/// Body content inside a question card or a tab panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Paragraph { text: String },
    List { items: Vec<String> },
    Code(CodeSnippet),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCard {
    #[serde(default)]
    pub id: Option<QuestionId>,
    pub title: String,
    #[serde(default)]
    pub body: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippet {
    #[serde(default)]
    pub language: Option<String>,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistGroup {
    #[serde(default)]
    pub title: Option<String>,
    pub items: Vec<ChecklistEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    pub id: ChecklistItemId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabGroup {
    pub tabs: Vec<TabSpec>,
    pub panels: Vec<TabPanel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSpec {
    /// Id of the panel this tab shows.
    pub target: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabPanel {
    pub id: String,
    #[serde(default)]
    pub body: Vec<ContentBlock>,
}

/// A question card paired with its effective id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionRef<'a> {
    pub id: &'a QuestionId,
    pub card: &'a QuestionCard,
}

impl PageDocument {
    /// Placeholder for pages whose content could not be loaded.
    #[must_use]
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            blocks: Vec::new(),
        }
    }

    /// Fill in `<page>-q<index>` ids for question cards authored without one.
    ///
    /// The index counts question cards only, in document order.
    #[must_use]
    pub fn with_resolved_ids(mut self, page: &PageId) -> Self {
        let mut index = 0usize;
        for block in &mut self.blocks {
            if let PageBlock::Question(card) = block {
                if card.id.is_none() {
                    card.id = Some(QuestionId::positional(page, index));
                }
                index += 1;
            }
        }
        self
    }

    /// Question cards in document order. Cards without an id are skipped, so
    /// call `with_resolved_ids` first.
    #[must_use]
    pub fn questions(&self) -> Vec<QuestionRef<'_>> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                PageBlock::Question(card) => card.id.as_ref().map(|id| QuestionRef { id, card }),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn question_ids(&self) -> Vec<QuestionId> {
        self.questions().into_iter().map(|q| q.id.clone()).collect()
    }

    #[must_use]
    pub fn find_question(&self, id: &QuestionId) -> Option<&QuestionCard> {
        self.questions()
            .into_iter()
            .find(|q| q.id == id)
            .map(|q| q.card)
    }

    /// Every checklist item on the page, across groups.
    #[must_use]
    pub fn checklist_items(&self) -> Vec<&ChecklistEntry> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                PageBlock::Checklist(group) => Some(group.items.iter()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

impl QuestionCard {
    /// Plain text of the body, as a reader would select it.
    #[must_use]
    pub fn body_text(&self) -> String {
        self.body
            .iter()
            .map(ContentBlock::text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ContentBlock {
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            ContentBlock::Paragraph { text } => text.clone(),
            ContentBlock::List { items } => items.join(" "),
            ContentBlock::Code(snippet) => snippet.code.clone(),
        }
    }
}

impl TabGroup {
    /// Target shown before any tab is clicked.
    #[must_use]
    pub fn initial_target(&self) -> Option<&str> {
        self.tabs.first().map(|tab| tab.target.as_str())
    }

    #[must_use]
    pub fn has_target(&self, target: &str) -> bool {
        self.tabs.iter().any(|tab| tab.target == target)
    }
}
