//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `StudyState` when a mutation cannot be persisted.
///
/// The in-memory state has already changed when one of these is returned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StateError {
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `PageLibraryService::try_load`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LibraryError {
    #[error("no document for page {0}")]
    Missing(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping guide services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GuideServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
