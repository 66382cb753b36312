//! Catalog service: maps inbound chat events to store operations and
//! outbound actions.
//!
//! The three event shapes the transport can deliver (document upload,
//! category selection, inline query) each get one handler. Handlers hold no
//! state between calls; every lookup is answered fresh from the store.

use std::sync::Arc;

use tracing::{debug, info};

use crate::store::{FileStore, StoreError, UNTITLED_NAME};

/// Notice sent when a browsed category holds no files.
pub const NO_FILES_TEXT: &str = "No files found in this category.";

/// A newly uploaded file descriptor, as delivered by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_id: String,
    pub name: Option<String>,
}

impl Upload {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNTITLED_NAME)
    }
}

/// The fixed set of browsable categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Documents,
    Music,
    Images,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Documents, Category::Music, Category::Images];

    /// Machine value stored on records and carried as callback data.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Documents => "documents",
            Category::Music => "music",
            Category::Images => "images",
        }
    }

    /// Human-readable button label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Documents => "📁 Documents",
            Category::Music => "🎵 Music",
            Category::Images => "📷 Images",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.slug() == slug)
    }
}

/// Maps an upload descriptor to the category it is filed under.
pub trait Classify: Send + Sync {
    fn classify(&self, upload: &Upload) -> Category;
}

/// Default classifier: every upload is filed under `documents`.
#[derive(Debug, Default)]
pub struct FixedClassifier;

impl Classify for FixedClassifier {
    fn classify(&self, _upload: &Upload) -> Category {
        Category::Documents
    }
}

/// Outbound action toward the chat transport.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogAction {
    SendText { body: String },
    SendDocument { file_id: String, caption: String },
}

/// One selectable inline-search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub body: String,
}

/// Logic layer between inbound chat events and the file store.
pub struct Catalog {
    store: Arc<dyn FileStore>,
    classifier: Arc<dyn Classify>,
}

impl Catalog {
    pub fn new(store: Arc<dyn FileStore>, classifier: Arc<dyn Classify>) -> Self {
        Self { store, classifier }
    }

    /// Store an uploaded document and produce the confirmation reply.
    ///
    /// A `StoreError` propagates to the caller; no confirmation is produced
    /// for a failed save.
    pub async fn handle_upload(&self, upload: &Upload) -> Result<CatalogAction, StoreError> {
        let category = self.classifier.classify(upload);
        info!(file_id = %upload.file_id, category = %category.slug(), "Filing uploaded document");

        self.store
            .save(&upload.file_id, upload.name.as_deref(), category.slug())
            .await?;

        Ok(CatalogAction::SendText {
            body: format!("File '{}' saved successfully!", upload.display_name()),
        })
    }

    /// Answer a category selection: one send-document action per stored
    /// record in store order, or a single notice when the category is empty.
    pub async fn handle_category(&self, category: &str) -> Result<Vec<CatalogAction>, StoreError> {
        let records = self.store.fetch_by_category(category).await?;
        info!(category = %category, files = records.len(), "Category browsed");

        if records.is_empty() {
            return Ok(vec![CatalogAction::SendText {
                body: NO_FILES_TEXT.to_string(),
            }]);
        }

        Ok(records
            .into_iter()
            .map(|record| CatalogAction::SendDocument {
                caption: record.display_name().to_string(),
                file_id: record.file_id,
            })
            .collect())
    }

    /// Answer an inline search with one result per matching record, in store
    /// order. Empty query text produces no results and never reaches the
    /// store.
    pub async fn handle_inline_query(&self, query: &str) -> Result<Vec<SearchResult>, StoreError> {
        if query.is_empty() {
            debug!("Skipping empty inline query");
            return Ok(Vec::new());
        }

        let records = self.store.fetch_by_query(query).await?;
        info!(query = %query, results = records.len(), "Inline search answered");

        Ok(records
            .into_iter()
            .map(|record| SearchResult {
                title: record.display_name().to_string(),
                body: format!("Here's your file: {}", record.display_name()),
                id: record.file_id,
            })
            .collect())
    }
}
