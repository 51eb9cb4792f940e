use guide_core::model::{Bookmark, PageId, PageTable, QuestionId};
use guide_core::text::preview;

const FALLBACK_ICON: &str = "📄";

pub const EMPTY_MESSAGE: &str = "No bookmarks yet.";
pub const EMPTY_HINT: &str = "Click the bookmark icon on any question to save it.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookmarkEntryVm {
    pub page_id: PageId,
    pub question_id: QuestionId,
    pub icon: String,
    pub page_title: String,
    pub excerpt: String,
}

/// Panel rows in insertion order. Bookmarks whose page is no longer in the
/// table show a generic icon and the raw page id.
#[must_use]
pub fn map_bookmark_entries(
    bookmarks: &[Bookmark],
    pages: &PageTable,
    preview_chars: usize,
) -> Vec<BookmarkEntryVm> {
    bookmarks
        .iter()
        .map(|bookmark| {
            let (icon, page_title) = pages.get(&bookmark.page_id).map_or_else(
                || (FALLBACK_ICON.to_string(), bookmark.page_id.to_string()),
                |page| (page.icon().to_string(), page.title().to_string()),
            );
            BookmarkEntryVm {
                page_id: bookmark.page_id.clone(),
                question_id: bookmark.question_id.clone(),
                icon,
                page_title,
                excerpt: preview(&bookmark.question_text, preview_chars),
            }
        })
        .collect()
}
