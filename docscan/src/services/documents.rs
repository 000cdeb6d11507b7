use std::sync::Arc;

use axum::body::Bytes;
use tracing::{error, info, warn};

use crate::db::DatabaseBackend;
use crate::error::{DocscanError, Result};
use crate::models::{Document, NewDocument};
use crate::ocr::{decode_image, OcrEngine};
use crate::storage::{blob_key, detect_content_type, BlobStore};

/// Upload and lookup workflows over the three adapters.
#[derive(Clone)]
pub struct DocumentService {
    db: Arc<dyn DatabaseBackend>,
    storage: Arc<dyn BlobStore>,
    ocr: Arc<dyn OcrEngine>,
}

impl DocumentService {
    pub fn new(
        db: Arc<dyn DatabaseBackend>,
        storage: Arc<dyn BlobStore>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Self {
        Self { db, storage, ocr }
    }

    /// Store the bytes, extract their text and record the result.
    ///
    /// The image is decoded before anything is written, so undecodable input
    /// leaves no blob and no row behind. Once the blob is uploaded there is no
    /// rollback: if OCR or the insert fails the blob stays in the container.
    pub async fn upload(&self, filename: &str, bytes: Bytes) -> Result<Document> {
        let decode_input = bytes.clone();
        let image = tokio::task::spawn_blocking(move || decode_image(&decode_input))
            .await
            .map_err(|e| DocscanError::Internal(format!("Image decode task failed: {e}")))??;

        let key = blob_key(filename);
        let content_type = detect_content_type(&bytes, filename);
        let size = bytes.len();

        if let Err(e) = self.storage.upload(&key, bytes, &content_type).await {
            error!(key = %key, error = %e, "Blob upload failed");
            return Err(e);
        }
        let blob_url = self.storage.blob_url(&key);

        let text = match self.ocr.recognize(&image).await {
            Ok(text) => text,
            Err(e) => {
                error!(key = %key, engine = %self.ocr.name(), error = %e, "OCR failed");
                if self.storage.is_enabled() {
                    warn!(key = %key, "Blob left without a document record");
                }
                return Err(e);
            }
        };

        let new_doc = NewDocument::new(filename, blob_url, text);
        let document = match self.db.create_document(&new_doc).await {
            Ok(document) => document,
            Err(e) => {
                error!(key = %key, error = %e, "Failed to insert document record");
                if self.storage.is_enabled() {
                    warn!(key = %key, "Blob left without a document record");
                }
                return Err(e);
            }
        };

        info!(
            id = document.id,
            filename = %document.filename,
            bytes = size,
            content_type = %content_type,
            text_len = document.text.len(),
            "Document uploaded"
        );

        Ok(document)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Document>> {
        self.db.get_document_by_id(id).await
    }

    pub fn storage(&self) -> &dyn BlobStore {
        self.storage.as_ref()
    }

    pub fn ocr(&self) -> &dyn OcrEngine {
        self.ocr.as_ref()
    }
}
