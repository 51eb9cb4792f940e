use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{PageId, QuestionId};

//
// ─── SECTIONS ──────────────────────────────────────────────────────────────────
//

/// Navigation group a page is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Overview,
    Security,
    Infrastructure,
    Interview,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Overview,
        Section::Security,
        Section::Infrastructure,
        Section::Interview,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::Security => "Security & Compliance",
            Section::Infrastructure => "Infrastructure",
            Section::Interview => "Interview Prep",
        }
    }
}

//
// ─── PAGE DESCRIPTOR ───────────────────────────────────────────────────────────
//

/// Static metadata for one document of the guide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    id: PageId,
    title: String,
    icon: String,
    file: String,
    section: Section,
}

impl PageDescriptor {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        icon: impl Into<String>,
        file: impl Into<String>,
        section: Section,
    ) -> Self {
        Self {
            id: PageId::new(id),
            title: title.into(),
            icon: icon.into(),
            file: file.into(),
            section,
        }
    }

    #[must_use]
    pub fn id(&self) -> &PageId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Site-relative file, e.g. `pages/backup-dr.html`.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Last path component of `file`.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.file.rsplit('/').next().unwrap_or(&self.file)
    }

    #[must_use]
    pub fn section(&self) -> Section {
        self.section
    }
}

//
// ─── PAGE TABLE ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PageTableError {
    #[error("landing page {0} is not in the table")]
    MissingLanding(PageId),

    #[error("duplicate page id {0}")]
    DuplicatePage(PageId),
}

/// The site's navigation topology. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTable {
    pages: Vec<PageDescriptor>,
    landing: PageId,
}

const LANDING_FILE: &str = "index.html";
const NESTED_DIR_MARKER: &str = "/pages/";

impl PageTable {
    /// Build a table from descriptors.
    ///
    /// # Errors
    ///
    /// Returns `PageTableError` if ids repeat or the landing page is absent.
    pub fn new(pages: Vec<PageDescriptor>, landing: PageId) -> Result<Self, PageTableError> {
        let mut seen = HashSet::new();
        for page in &pages {
            if !seen.insert(page.id.clone()) {
                return Err(PageTableError::DuplicatePage(page.id.clone()));
            }
        }
        if !seen.contains(&landing) {
            return Err(PageTableError::MissingLanding(landing));
        }
        Ok(Self { pages, landing })
    }

    /// The pages shipped with the guide.
    #[must_use]
    pub fn builtin() -> Self {
        use Section::{Infrastructure, Interview, Overview, Security};

        let pages = vec![
            PageDescriptor::new("index", "Dashboard", "🏠", "index.html", Overview),
            PageDescriptor::new(
                "cybersecurity-fundamentals",
                "Cybersecurity Fundamentals",
                "🛡️",
                "pages/cybersecurity-fundamentals.html",
                Security,
            ),
            PageDescriptor::new(
                "incident-response",
                "Incident Response",
                "🚨",
                "pages/incident-response.html",
                Security,
            ),
            PageDescriptor::new(
                "endpoint-protection",
                "Endpoint Protection",
                "💻",
                "pages/endpoint-protection.html",
                Infrastructure,
            ),
            PageDescriptor::new(
                "microsoft-365",
                "Microsoft 365 Admin",
                "☁️",
                "pages/microsoft-365.html",
                Infrastructure,
            ),
            PageDescriptor::new(
                "network-infrastructure",
                "Network Infrastructure",
                "🌐",
                "pages/network-infrastructure.html",
                Infrastructure,
            ),
            PageDescriptor::new(
                "backup-dr",
                "Backup & Disaster Recovery",
                "💾",
                "pages/backup-dr.html",
                Infrastructure,
            ),
            PageDescriptor::new(
                "telephony",
                "Telephony & Communications",
                "📞",
                "pages/telephony.html",
                Infrastructure,
            ),
            PageDescriptor::new(
                "vulnerability-management",
                "Vulnerability Management",
                "🔍",
                "pages/vulnerability-management.html",
                Security,
            ),
            PageDescriptor::new(
                "identity-access",
                "Identity & Access Management",
                "🔐",
                "pages/identity-access.html",
                Security,
            ),
            PageDescriptor::new(
                "dlp-compliance",
                "DLP & Compliance",
                "📋",
                "pages/dlp-compliance.html",
                Security,
            ),
            PageDescriptor::new(
                "security-awareness",
                "Security Awareness",
                "🎓",
                "pages/security-awareness.html",
                Security,
            ),
            PageDescriptor::new(
                "behavioral-interview",
                "Behavioral Interview",
                "🗣️",
                "pages/behavioral-interview.html",
                Interview,
            ),
            PageDescriptor::new(
                "scenario-exercises",
                "Scenario Exercises",
                "📝",
                "pages/scenario-exercises.html",
                Interview,
            ),
            PageDescriptor::new(
                "thirty-sixty-ninety",
                "30-60-90 Day Plan",
                "📅",
                "pages/thirty-sixty-ninety.html",
                Interview,
            ),
        ];

        Self {
            pages,
            landing: PageId::new("index"),
        }
    }

    #[must_use]
    pub fn landing(&self) -> &PageDescriptor {
        // `new` and `builtin` guarantee the landing page is present.
        self.get(&self.landing).unwrap_or(&self.pages[0])
    }

    #[must_use]
    pub fn is_landing(&self, id: &PageId) -> bool {
        *id == self.landing
    }

    #[must_use]
    pub fn get(&self, id: &PageId) -> Option<&PageDescriptor> {
        self.pages.iter().find(|page| page.id == *id)
    }

    /// Lookup by the last component of a page's file (`backup-dr.html`).
    #[must_use]
    pub fn by_file_name(&self, file_name: &str) -> Option<&PageDescriptor> {
        self.pages.iter().find(|page| page.file_name() == file_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageDescriptor> {
        self.pages.iter()
    }

    /// Every page except the landing page; these are the ones that carry progress.
    pub fn tracked(&self) -> impl Iterator<Item = &PageDescriptor> {
        self.pages.iter().filter(|page| page.id != self.landing)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages grouped by section, in section order then table order. Empty
    /// sections are skipped.
    #[must_use]
    pub fn by_section(&self) -> Vec<(Section, Vec<&PageDescriptor>)> {
        Section::ALL
            .iter()
            .filter_map(|section| {
                let pages: Vec<_> = self
                    .pages
                    .iter()
                    .filter(|page| page.section == *section)
                    .collect();
                (!pages.is_empty()).then_some((*section, pages))
            })
            .collect()
    }

    /// Match an address path against the table.
    ///
    /// A page matches when its file occurs in the path; the landing page also
    /// matches any path ending in `/` or `index.html`. Unknown paths fall back
    /// to the landing page.
    #[must_use]
    pub fn resolve_path(&self, location: &str) -> &PageDescriptor {
        let path = strip_fragment_and_query(location);
        self.pages
            .iter()
            .find(|page| {
                path.contains(page.file.as_str())
                    || (page.id == self.landing
                        && (path.ends_with('/') || path.ends_with(LANDING_FILE)))
            })
            .unwrap_or_else(|| self.landing())
    }

    /// Href of `page` relative to the document at `current_location`.
    ///
    /// Documents under `/pages/` need a `../` prefix to reach the site root.
    #[must_use]
    pub fn relative_href(
        &self,
        current_location: &str,
        page: &PageDescriptor,
        fragment: Option<&QuestionId>,
    ) -> String {
        let base = if current_location.contains(NESTED_DIR_MARKER) {
            "../"
        } else {
            ""
        };
        match fragment {
            Some(question) => format!("{base}{}#{question}", page.file),
            None => format!("{base}{}", page.file),
        }
    }
}

//
// ─── ADDRESSES ─────────────────────────────────────────────────────────────────
//

/// A parsed location: path plus optional question fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAddress {
    pub path: String,
    pub fragment: Option<QuestionId>,
}

impl PageAddress {
    /// Split `raw` at the first `#`. An empty fragment counts as none.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.split_once('#') {
            Some((path, fragment)) => Self {
                path: path.to_string(),
                fragment: (!fragment.is_empty()).then(|| QuestionId::new(fragment)),
            },
            None => Self {
                path: raw.to_string(),
                fragment: None,
            },
        }
    }
}

fn strip_fragment_and_query(location: &str) -> &str {
    location
        .split(['#', '?'])
        .next()
        .unwrap_or(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_valid() {
        let table = PageTable::builtin();
        let rebuilt = PageTable::new(table.pages.clone(), PageId::new("index")).unwrap();
        assert_eq!(rebuilt.len(), 15);
        assert_eq!(rebuilt.tracked().count(), 14);
    }

    #[test]
    fn resolves_nested_page() {
        let table = PageTable::builtin();
        let page = table.resolve_path("/site/pages/incident-response.html");
        assert_eq!(page.id().as_str(), "incident-response");
    }

    #[test]
    fn resolves_landing_for_root_and_unknown_paths() {
        let table = PageTable::builtin();
        assert_eq!(table.resolve_path("/").id().as_str(), "index");
        assert_eq!(table.resolve_path("/site/index.html").id().as_str(), "index");
        assert_eq!(table.resolve_path("/nowhere/else").id().as_str(), "index");
    }

    #[test]
    fn fragment_does_not_affect_resolution() {
        let table = PageTable::builtin();
        let page = table.resolve_path("/pages/backup-dr.html#q2");
        assert_eq!(page.id().as_str(), "backup-dr");
    }

    #[test]
    fn relative_href_depends_on_nesting() {
        let table = PageTable::builtin();
        let target = table.get(&PageId::new("telephony")).unwrap();
        assert_eq!(
            table.relative_href("/pages/backup-dr.html", target, None),
            "../pages/telephony.html"
        );
        assert_eq!(
            table.relative_href("/index.html", target, Some(&QuestionId::new("q4"))),
            "pages/telephony.html#q4"
        );
    }

    #[test]
    fn rejects_table_without_landing() {
        let pages = vec![PageDescriptor::new("a", "A", "x", "a.html", Section::Security)];
        let err = PageTable::new(pages, PageId::new("index")).unwrap_err();
        assert!(matches!(err, PageTableError::MissingLanding(_)));
    }

    #[test]
    fn parses_address_fragment() {
        let address = PageAddress::parse("pages/telephony.html#q3");
        assert_eq!(address.path, "pages/telephony.html");
        assert_eq!(address.fragment, Some(QuestionId::new("q3")));
        assert_eq!(PageAddress::parse("index.html#").fragment, None);
    }

    #[test]
    fn sections_group_in_order() {
        let table = PageTable::builtin();
        let groups = table.by_section();
        assert_eq!(groups[0].0, Section::Overview);
        assert_eq!(groups.len(), 4);
    }
}
