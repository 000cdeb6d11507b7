use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::{DocscanError, Result};
use crate::models::{Document, NewDocument};

pub struct DocumentRepository;

impl DocumentRepository {
    pub async fn create(conn: &Connection, doc: &NewDocument) -> Result<Document> {
        let created_at = Utc::now();

        let mut rows = conn
            .query(
                r#"
                INSERT INTO documents (filename, blob_url, text, created_at)
                VALUES (?1, ?2, ?3, ?4)
                RETURNING id
                "#,
                params![
                    doc.filename.clone(),
                    doc.blob_url.clone(),
                    doc.text.clone(),
                    created_at.to_rfc3339(),
                ],
            )
            .await?;

        let id: i64 = match rows.next().await? {
            Some(row) => row.get(0)?,
            None => {
                return Err(DocscanError::Internal(
                    "Insert into documents returned no id".to_string(),
                ))
            }
        };

        Ok(Document {
            id,
            filename: doc.filename.clone(),
            blob_url: doc.blob_url.clone(),
            text: doc.text.clone(),
            created_at,
        })
    }

    pub async fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Document>> {
        let mut rows = conn
            .query(
                "SELECT id, filename, blob_url, text, created_at FROM documents WHERE id = ?1",
                params![id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_document(&row)?))
        } else {
            Ok(None)
        }
    }

    fn row_to_document(row: &libsql::Row) -> Result<Document> {
        let raw_created_at: String = row.get(4)?;
        let created_at = DateTime::parse_from_rfc3339(&raw_created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                DocscanError::Internal(format!(
                    "Invalid created_at '{raw_created_at}' in documents: {e}"
                ))
            })?;

        Ok(Document {
            id: row.get(0)?,
            filename: row.get(1)?,
            blob_url: row.get(2)?,
            text: row.get(3)?,
            created_at,
        })
    }
}
