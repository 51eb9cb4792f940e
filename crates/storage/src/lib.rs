#![forbid(unsafe_code)]

pub mod content;
pub mod repository;
pub mod sqlite;

pub use content::{ContentRepository, DirectoryContent, InMemoryContent};
pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError, StorageKey};
