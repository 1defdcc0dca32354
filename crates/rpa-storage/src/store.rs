//! The DocumentStore trait that backends implement.

use crate::query::Query;
use crate::types::{Collection, DocumentId};
use crate::{Document, Fields, StoreError};

/// Collection-scoped document storage the console depends on.
///
/// Every method addresses exactly one collection. Queries support equality
/// filters and a single ordering field only.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    // ───────────────────────────────────── Writes ─────────────────────────────────────────

    /// Create a document with a generated id.
    async fn create(&self, collection: Collection, fields: Fields)
        -> Result<DocumentId, StoreError>;

    /// Create or fully overwrite a document under a caller-chosen id.
    async fn set(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), StoreError>;

    /// Shallow-merge `fields` into an existing document.
    /// Fails with `NotFound` when the document does not exist.
    async fn update(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), StoreError>;

    /// Delete a document. Deleting an absent document succeeds.
    async fn delete(&self, collection: Collection, id: &DocumentId) -> Result<(), StoreError>;

    // ───────────────────────────────────── Reads ──────────────────────────────────────────

    /// Get a single document by id.
    async fn get(&self, collection: Collection, id: &DocumentId) -> Result<Document, StoreError>;

    /// Run a filtered / ordered query over one collection.
    async fn query(&self, collection: Collection, query: &Query)
        -> Result<Vec<Document>, StoreError>;
}
