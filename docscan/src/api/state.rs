use std::sync::Arc;

use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::ocr::OcrEngine;
use crate::services::DocumentService;
use crate::storage::BlobStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseBackend>,
    pub documents: DocumentService,
}

impl AppState {
    pub fn new(
        config: Config,
        db: Arc<dyn DatabaseBackend>,
        storage: Arc<dyn BlobStore>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Self {
        let documents = DocumentService::new(db.clone(), storage, ocr);

        Self {
            config: Arc::new(config),
            db,
            documents,
        }
    }
}
