use guide_core::search::{SearchHit, SearchIndex};

pub const PROMPT_MESSAGE: &str = "Type to search...";
pub const NO_RESULTS_MESSAGE: &str = "No results found";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchPanelVm {
    /// Nothing typed yet.
    Prompt,
    NoResults,
    Results(Vec<SearchHit>),
}

impl SearchPanelVm {
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SearchPanelVm::Prompt => Some(PROMPT_MESSAGE),
            SearchPanelVm::NoResults => Some(NO_RESULTS_MESSAGE),
            SearchPanelVm::Results(_) => None,
        }
    }
}

/// What the search surface shows for `query` against the current page.
/// Without a loaded page every non-empty query has no results.
#[must_use]
pub fn search_panel(index: Option<&SearchIndex>, query: &str) -> SearchPanelVm {
    if query.is_empty() {
        return SearchPanelVm::Prompt;
    }
    let hits = index.map(|index| index.hits(query)).unwrap_or_default();
    if hits.is_empty() {
        SearchPanelVm::NoResults
    } else {
        SearchPanelVm::Results(hits)
    }
}
