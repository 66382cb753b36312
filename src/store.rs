//! Storage types and the file-store seam consumed by the catalog.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Display name used wherever an unnamed upload needs a caption or title.
pub const UNTITLED_NAME: &str = "untitled";

/// A stored file: Telegram file handle, display name, category label.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct FileRecord {
    pub id: i64,
    pub file_id: String,
    pub name: Option<String>,
    pub category: String,
    pub uploaded_at: DateTime<Utc>,
}

impl FileRecord {
    /// Name shown in captions and search titles.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNTITLED_NAME)
    }
}

/// Errors originating in the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or the operation failed inside it.
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// Append-only file storage with the two supported read shapes. Exactly one
/// filter applies per call; the modes are not combinable.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Append a record. Duplicates are not checked for.
    async fn save(
        &self,
        file_id: &str,
        name: Option<&str>,
        category: &str,
    ) -> Result<(), StoreError>;

    /// All records whose category equals `category` exactly, in insertion
    /// order. An empty category yields an empty result, not an error.
    async fn fetch_by_category(&self, category: &str) -> Result<Vec<FileRecord>, StoreError>;

    /// All records whose name contains `query` as a case-insensitive
    /// substring, in insertion order. Matches only the name, never the file
    /// handle or category. An empty query yields an empty result.
    async fn fetch_by_query(&self, query: &str) -> Result<Vec<FileRecord>, StoreError>;
}
