use guide_core::model::{PageId, PageTable};
use guide_core::progress::NavStatus;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavEntryVm {
    pub page_id: PageId,
    pub title: String,
    pub icon: String,
    pub href: String,
    pub active: bool,
    pub status_label: String,
    pub status_class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavSectionVm {
    pub label: &'static str,
    pub entries: Vec<NavEntryVm>,
}

/// Sidebar sections with per-page badges and the active entry marked.
#[must_use]
pub fn build_nav_sections(
    pages: &PageTable,
    current: &PageId,
    current_location: &str,
    progress: impl Fn(&PageId) -> u8,
) -> Vec<NavSectionVm> {
    pages
        .by_section()
        .into_iter()
        .map(|(section, entries)| NavSectionVm {
            label: section.label(),
            entries: entries
                .into_iter()
                .map(|page| {
                    let status = NavStatus::from_percent(progress(page.id()));
                    NavEntryVm {
                        page_id: page.id().clone(),
                        title: page.title().to_string(),
                        icon: page.icon().to_string(),
                        href: pages.relative_href(current_location, page, None),
                        active: page.id() == current,
                        status_label: status.label(),
                        status_class: status.css_class(),
                    }
                })
                .collect(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressBarVm {
    pub percent: u8,
    pub label: String,
    pub width_style: String,
}

impl ProgressBarVm {
    #[must_use]
    pub fn new(percent: u8) -> Self {
        Self {
            percent,
            label: format!("{percent}% Complete"),
            width_style: format!("width: {percent}%"),
        }
    }
}
