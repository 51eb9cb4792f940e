//! In-page question search.
//!
//! The index covers the question cards of the page currently shown; it is
//! rebuilt on every page view and never persisted.

use crate::model::{PageDocument, QuestionId};
use crate::settings::SearchSettings;
use crate::text::{self, ELLIPSIS};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchEntry {
    /// Element id of the card; selecting a result targets it.
    pub id: QuestionId,
    pub question: String,
    /// Body text truncated to `content_limit_chars`.
    pub content: String,
    pub page_title: String,
}

/// One run of text, flagged when it is part of a match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub is_match: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Highlighted {
    pub segments: Vec<Segment>,
}

impl Highlighted {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment {
                text: text.into(),
                is_match: false,
            }],
        }
    }

    #[must_use]
    pub fn to_plain_string(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[must_use]
    pub fn matched(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter(|s| s.is_match)
            .map(|s| s.text.as_str())
            .collect()
    }

    fn push(&mut self, text: &str, is_match: bool) {
        if text.is_empty() {
            return;
        }
        self.segments.push(Segment {
            text: text.to_string(),
            is_match,
        });
    }
}

/// A rendered search result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub id: QuestionId,
    pub page_title: String,
    pub title: Highlighted,
    pub excerpt: Highlighted,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
    settings: SearchSettings,
}

impl SearchIndex {
    #[must_use]
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            entries: Vec::new(),
            settings,
        }
    }

    /// Index every question card of `document`, in document order.
    #[must_use]
    pub fn from_document(document: &PageDocument, settings: SearchSettings) -> Self {
        let mut index = Self::new(settings);
        for question in document.questions() {
            index.push(
                question.id.clone(),
                &question.card.title,
                &question.card.body_text(),
                &document.title,
            );
        }
        index
    }

    pub fn push(&mut self, id: QuestionId, question: &str, body: &str, page_title: &str) {
        let content = text::truncate_chars(body, self.settings.content_limit_chars).to_string();
        self.entries.push(SearchEntry {
            id,
            question: question.to_string(),
            content,
            page_title: page_title.to_string(),
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn settings(&self) -> SearchSettings {
        self.settings
    }

    /// Entries whose title or body contains the trimmed query, ignoring case.
    ///
    /// Queries under `min_query_chars` characters return nothing. Results keep
    /// index order and stop at `max_results`.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&SearchEntry> {
        let Some(query) = self.usable_query(query) else {
            return Vec::new();
        };
        self.entries
            .iter()
            .filter(|entry| {
                text::contains_ignore_case(&entry.question, query)
                    || text::contains_ignore_case(&entry.content, query)
            })
            .take(self.settings.max_results)
            .collect()
    }

    /// `search` plus highlighting, ready for display.
    #[must_use]
    pub fn hits(&self, query: &str) -> Vec<SearchHit> {
        let trimmed = query.trim();
        self.search(query)
            .into_iter()
            .map(|entry| SearchHit {
                id: entry.id.clone(),
                page_title: entry.page_title.clone(),
                title: highlight(&entry.question, trimmed),
                excerpt: excerpt(&entry.content, trimmed, &self.settings),
            })
            .collect()
    }

    fn usable_query<'q>(&self, query: &'q str) -> Option<&'q str> {
        let trimmed = query.trim();
        (trimmed.chars().count() >= self.settings.min_query_chars).then_some(trimmed)
    }
}

/// Split `text` around every case-insensitive occurrence of `query`.
#[must_use]
pub fn highlight(text: &str, query: &str) -> Highlighted {
    let mut out = Highlighted::default();
    let mut cursor = 0;
    for range in text::find_all_ignore_case(text, query) {
        out.push(&text[cursor..range.start], false);
        out.push(&text[range.clone()], true);
        cursor = range.end;
    }
    out.push(&text[cursor..], false);
    out
}

/// Window of `content` around the first occurrence of `query`, highlighted.
///
/// Without an occurrence the excerpt is the opening `lead_in_chars`
/// characters followed by `...`.
#[must_use]
pub fn excerpt(content: &str, query: &str, settings: &SearchSettings) -> Highlighted {
    let Some(found) = text::find_ignore_case(content, query) else {
        let lead = text::truncate_chars(content, settings.lead_in_chars);
        return Highlighted::plain(format!("{lead}{ELLIPSIS}"));
    };

    let total_chars = content.chars().count();
    let match_start = text::char_offset(content, found.start);
    let match_end = text::char_offset(content, found.end);
    let window_start = match_start.saturating_sub(settings.excerpt_context_chars);
    let window_end = (match_end + settings.excerpt_context_chars).min(total_chars);

    let start_byte = text::byte_offset(content, window_start);
    let end_byte = text::byte_offset(content, window_end);

    let mut out = Highlighted::default();
    if window_start > 0 {
        out.push(ELLIPSIS, false);
    }
    out.segments
        .extend(highlight(&content[start_byte..end_byte], query).segments);
    if window_end < total_chars {
        out.push(ELLIPSIS, false);
    }
    out
}
