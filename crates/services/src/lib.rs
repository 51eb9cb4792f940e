#![forbid(unsafe_code)]

pub mod error;
pub mod guide_services;
pub mod page_library;
pub mod progress_tracker;
pub mod study_state;

pub use guide_core::Clock;

pub use error::{GuideServicesError, LibraryError, StateError};
pub use guide_services::GuideServices;
pub use page_library::{LoadedPage, PageLibraryService};
pub use progress_tracker::ProgressTracker;
pub use study_state::StudyState;
