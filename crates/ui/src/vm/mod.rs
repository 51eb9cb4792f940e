mod bookmark_vm;
mod copy_feedback;
mod nav_vm;
mod search_vm;
mod tabs_vm;

pub use bookmark_vm::{BookmarkEntryVm, EMPTY_HINT, EMPTY_MESSAGE, map_bookmark_entries};
pub use copy_feedback::{COPIED_LABEL, COPY_LABEL, CopyFeedback};
pub use nav_vm::{NavEntryVm, NavSectionVm, ProgressBarVm, build_nav_sections};
pub use search_vm::{NO_RESULTS_MESSAGE, PROMPT_MESSAGE, SearchPanelVm, search_panel};
pub use tabs_vm::{TabButtonVm, TabStripVm};
