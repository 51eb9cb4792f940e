use std::sync::Arc;

use guide_core::model::{PageDescriptor, PageDocument, PageTable};
use guide_core::search::SearchIndex;
use guide_core::settings::SearchSettings;
use storage::content::ContentRepository;
use storage::repository::StorageError;

use crate::error::LibraryError;

/// A page ready to render: its descriptor, its document with every question
/// id resolved, and the search index over its questions.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedPage {
    pub descriptor: PageDescriptor,
    pub document: PageDocument,
    pub index: SearchIndex,
}

/// Loads authored page documents and indexes them for search.
#[derive(Clone)]
pub struct PageLibraryService {
    pages: Arc<PageTable>,
    content: Arc<dyn ContentRepository>,
    search: SearchSettings,
}

impl PageLibraryService {
    #[must_use]
    pub fn new(
        pages: Arc<PageTable>,
        content: Arc<dyn ContentRepository>,
        search: SearchSettings,
    ) -> Self {
        Self {
            pages,
            content,
            search,
        }
    }

    #[must_use]
    pub fn pages(&self) -> &PageTable {
        &self.pages
    }

    /// The page a location points at, falling back to the landing page.
    #[must_use]
    pub fn resolve(&self, location: &str) -> &PageDescriptor {
        self.pages.resolve_path(location)
    }

    /// Load `page`, surfacing storage problems.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Missing` when the page has no document and
    /// `LibraryError::Storage` when it cannot be read.
    pub async fn try_load(&self, page: &PageDescriptor) -> Result<LoadedPage, LibraryError> {
        let document = match self.content.load_document(page).await {
            Ok(document) => document.with_resolved_ids(page.id()),
            Err(StorageError::NotFound) => {
                return Err(LibraryError::Missing(page.id().to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        Ok(self.assemble(page, document))
    }

    /// Load `page`, substituting an empty document titled after the page when
    /// its content is missing or broken.
    pub async fn load(&self, page: &PageDescriptor) -> LoadedPage {
        match self.try_load(page).await {
            Ok(loaded) => loaded,
            Err(LibraryError::Missing(id)) => {
                tracing::debug!(page = %id, "page has no document");
                self.assemble(page, PageDocument::empty(page.title()))
            }
            Err(err) => {
                tracing::warn!(page = %page.id(), error = %err, "failed to load page document");
                self.assemble(page, PageDocument::empty(page.title()))
            }
        }
    }

    fn assemble(&self, page: &PageDescriptor, document: PageDocument) -> LoadedPage {
        let index = SearchIndex::from_document(&document, self.search);
        tracing::debug!(page = %page.id(), questions = index.len(), "indexed page");
        LoadedPage {
            descriptor: page.clone(),
            document,
            index,
        }
    }
}
