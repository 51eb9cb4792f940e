mod bookmark;
pub mod document;
mod ids;
mod page;

pub use bookmark::{Bookmark, BookmarkList};
pub use document::{
    ChecklistEntry, ChecklistGroup, CodeSnippet, ContentBlock, PageBlock, PageDocument,
    QuestionCard, QuestionRef, TabGroup, TabPanel, TabSpec,
};
pub use ids::{ChecklistItemId, PageId, QuestionId};
pub use page::{PageAddress, PageDescriptor, PageTable, PageTableError, Section};
