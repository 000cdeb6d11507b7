use async_trait::async_trait;
use axum::body::Bytes;
use tracing::{info, warn};

use crate::config::StorageConfig;
use crate::error::Result;

use super::azure::{AzureBlobClient, ConnectionString};

/// Stored in `blob_url` when blob storage is not configured.
pub const BLOB_URL_PLACEHOLDER: &str = "not_uploaded";

/// Durable object storage for uploaded bytes.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<()>;

    /// URL under which `key` is (or would be) reachable.
    fn blob_url(&self, key: &str) -> String;

    fn is_enabled(&self) -> bool {
        true
    }

    fn name(&self) -> String;
}

#[derive(Clone, Debug)]
enum StorageBackend {
    Azure { client: AzureBlobClient },
    Disabled,
}

/// Blob store selected from configuration.
///
/// With no connection string every upload is a no-op and URLs are the
/// [`BLOB_URL_PLACEHOLDER`]. A connection string that does not parse is a
/// startup error rather than a silent downgrade.
#[derive(Clone, Debug)]
pub struct StorageProvider {
    backend: StorageBackend,
}

impl StorageProvider {
    pub fn new(config: Option<&StorageConfig>) -> Result<Self> {
        let backend = match config {
            Some(config) => {
                let connection = ConnectionString::parse(&config.connection_string)?;
                info!(
                    endpoint = %connection.blob_endpoint(),
                    container = %config.container,
                    "Azure blob storage configured"
                );
                StorageBackend::Azure {
                    client: AzureBlobClient::new(
                        connection,
                        &config.container,
                        config.timeout_secs,
                    )?,
                }
            }
            None => {
                warn!("AZURE_STORAGE_CONNECTION_STRING not set, uploads will not be persisted");
                StorageBackend::Disabled
            }
        };

        Ok(Self { backend })
    }

    pub fn disabled() -> Self {
        Self {
            backend: StorageBackend::Disabled,
        }
    }
}

#[async_trait]
impl BlobStore for StorageProvider {
    async fn upload(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<()> {
        match &self.backend {
            StorageBackend::Azure { client } => client.put_blob(key, bytes, content_type).await,
            StorageBackend::Disabled => Ok(()),
        }
    }

    fn blob_url(&self, key: &str) -> String {
        match &self.backend {
            StorageBackend::Azure { client } => client.blob_url(key).to_string(),
            StorageBackend::Disabled => BLOB_URL_PLACEHOLDER.to_string(),
        }
    }

    fn is_enabled(&self) -> bool {
        matches!(self.backend, StorageBackend::Azure { .. })
    }

    fn name(&self) -> String {
        match &self.backend {
            StorageBackend::Azure { .. } => "azure".to_string(),
            StorageBackend::Disabled => "disabled".to_string(),
        }
    }
}
