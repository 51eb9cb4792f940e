//! Page documents: one JSON file per page, named after the page id.

use async_trait::async_trait;
use guide_core::model::{PageDescriptor, PageDocument, PageId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::repository::StorageError;

#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Load the authored document for `page`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when the page has no document, or
    /// `Io`/`Serialization` when it cannot be read or parsed.
    async fn load_document(&self, page: &PageDescriptor) -> Result<PageDocument, StorageError>;
}

/// Reads `<root>/<page-id>.json`.
#[derive(Clone, Debug)]
pub struct DirectoryContent {
    root: PathBuf,
}

impl DirectoryContent {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path_for(&self, page: &PageDescriptor) -> PathBuf {
        self.root.join(format!("{}.json", page.id()))
    }
}

#[async_trait]
impl ContentRepository for DirectoryContent {
    async fn load_document(&self, page: &PageDescriptor) -> Result<PageDocument, StorageError> {
        let path = self.path_for(page);
        let raw = tokio::fs::read_to_string(&path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound
            } else {
                StorageError::Io(format!("{}: {err}", path.display()))
            }
        })?;
        tracing::debug!(path = %path.display(), bytes = raw.len(), "read page document");
        serde_json::from_str(&raw)
            .map_err(|err| StorageError::Serialization(format!("{}: {err}", path.display())))
    }
}

/// Documents held in memory, keyed by page id.
#[derive(Clone, Default)]
pub struct InMemoryContent {
    documents: Arc<Mutex<HashMap<PageId, PageDocument>>>,
}

impl InMemoryContent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert(&self, page: PageId, document: PageDocument) -> Result<(), StorageError> {
        let mut guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(page, document);
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for InMemoryContent {
    async fn load_document(&self, page: &PageDescriptor) -> Result<PageDocument, StorageError> {
        let guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(page.id()).cloned().ok_or(StorageError::NotFound)
    }
}
