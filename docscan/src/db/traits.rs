use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Document, NewDocument};

/// Insert and point-lookup operations for document records.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a record and return it with its generated id.
    async fn create_document(&self, doc: &NewDocument) -> Result<Document>;
    async fn get_document_by_id(&self, id: i64) -> Result<Option<Document>>;
}

/// A complete database backend: the document store plus lifecycle checks.
#[async_trait]
pub trait DatabaseBackend: DocumentStore {
    /// Round-trip a trivial query to confirm the database is reachable.
    async fn ping(&self) -> Result<()>;
}
