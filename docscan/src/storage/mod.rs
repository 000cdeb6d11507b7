//! Blob storage for uploaded files.
//!
//! Uploads are written to Azure Blob Storage under a key built by
//! [`blob_key`]. When no connection string is configured the
//! [`StorageProvider`] runs disabled: nothing is written and documents carry
//! [`BLOB_URL_PLACEHOLDER`] as their URL.

mod azure;
mod key;
mod provider;

pub use azure::{AzureBlobClient, ConnectionString};
pub use key::{blob_key, detect_content_type};
pub use provider::{BlobStore, StorageProvider, BLOB_URL_PLACEHOLDER};
