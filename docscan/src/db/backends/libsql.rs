use crate::db::connection::Database;
use crate::db::repository::DocumentRepository;
use crate::db::traits::{DatabaseBackend, DocumentStore};
use crate::error::Result;
use crate::models::{Document, NewDocument};
use async_trait::async_trait;

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentStore for LibSqlBackend {
    async fn create_document(&self, doc: &NewDocument) -> Result<Document> {
        let conn = self.db.acquire().await?;
        DocumentRepository::create(&conn, doc).await
    }

    async fn get_document_by_id(&self, id: i64) -> Result<Option<Document>> {
        let conn = self.db.acquire().await?;
        DocumentRepository::get_by_id(&conn, id).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn ping(&self) -> Result<()> {
        let conn = self.db.acquire().await?;
        let mut rows = conn.query("SELECT 1", ()).await?;
        rows.next().await?;
        Ok(())
    }
}
