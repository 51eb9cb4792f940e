use dioxus::prelude::*;
use dioxus_router::Routable;

use guide_core::model::{PageAddress, PageDescriptor, PageTable, QuestionId};

use crate::views::{DashboardView, Layout, PageView};

/// The landing page lives at `/`; every other page at `/pages/<file>`, with
/// the targeted question as the fragment.
#[derive(Clone, Routable, PartialEq, Debug)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", DashboardView)] Index {},
        #[route("/pages/:file#:question", PageView)] Page { file: String, question: String },
}

impl Route {
    /// The route showing `page`, optionally targeting one of its questions.
    #[must_use]
    pub fn for_page(pages: &PageTable, page: &PageDescriptor, question: Option<&QuestionId>) -> Self {
        if pages.is_landing(page.id()) {
            return Route::Index {};
        }
        Route::Page {
            file: page.file_name().to_string(),
            question: question.map(ToString::to_string).unwrap_or_default(),
        }
    }

    /// Route for a free-form address such as `pages/backup-dr.html#backup-dr-q1`.
    /// Unknown paths land on the dashboard.
    #[must_use]
    pub fn for_address(pages: &PageTable, raw: &str) -> Self {
        let address = PageAddress::parse(raw);
        let page = pages.resolve_path(&address.path);
        Self::for_page(pages, page, address.fragment.as_ref())
    }

    /// Location string fed to page-table lookups.
    #[must_use]
    pub fn location(&self) -> String {
        match self {
            Route::Index {} => "/".to_string(),
            Route::Page { file, question } if question.is_empty() => format!("/pages/{file}"),
            Route::Page { file, question } => format!("/pages/{file}#{question}"),
        }
    }

    /// The question named by the fragment, if any.
    #[must_use]
    pub fn question(&self) -> Option<QuestionId> {
        match self {
            Route::Page { question, .. } if !question.is_empty() => {
                Some(QuestionId::new(question.as_str()))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn page<'a>(&self, pages: &'a PageTable) -> &'a PageDescriptor {
        pages.resolve_path(&self.location())
    }
}
