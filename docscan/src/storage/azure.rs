//! Azure Blob Storage through `object_store`.
//!
//! The connection string is parsed here; request signing (SharedKey or SAS)
//! and the `Put Blob` call are left to `object_store::azure`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::path::Path;
use object_store::{
    Attribute, AttributeValue, Attributes, ClientOptions, ObjectStore, PutOptions, PutPayload,
    RetryConfig,
};
use url::Url;

use crate::error::{DocscanError, Result};

const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";
const DEV_ACCOUNT_NAME: &str = "devstoreaccount1";
// Published well-known key of the local storage emulator.
const DEV_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const DEV_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

#[derive(Clone)]
enum AccountAuth {
    AccessKey(String),
    Sas(Vec<(String, String)>),
}

impl fmt::Debug for AccountAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountAuth::AccessKey(_) => f.write_str("AccessKey(..)"),
            AccountAuth::Sas(_) => f.write_str("Sas(..)"),
        }
    }
}

/// Parsed `AZURE_STORAGE_CONNECTION_STRING`.
#[derive(Clone, Debug)]
pub struct ConnectionString {
    account: String,
    blob_endpoint: Url,
    auth: AccountAuth,
}

impl ConnectionString {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut account_name = None;
        let mut account_key = None;
        let mut sas = None;
        let mut blob_endpoint = None;
        let mut protocol = None;
        let mut suffix = None;
        let mut development = false;

        for part in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((name, value)) = part.split_once('=') else {
                return Err(DocscanError::Configuration(format!(
                    "Malformed connection string segment '{part}'"
                )));
            };
            let value = value.trim().to_string();

            match name.trim().to_ascii_lowercase().as_str() {
                "accountname" => account_name = Some(value),
                "accountkey" => account_key = Some(value),
                "sharedaccesssignature" => sas = Some(value),
                "blobendpoint" => blob_endpoint = Some(value),
                "defaultendpointsprotocol" => protocol = Some(value),
                "endpointsuffix" => suffix = Some(value),
                "usedevelopmentstorage" => development = value.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }

        if development {
            account_name.get_or_insert_with(|| DEV_ACCOUNT_NAME.to_string());
            account_key.get_or_insert_with(|| DEV_ACCOUNT_KEY.to_string());
            blob_endpoint.get_or_insert_with(|| DEV_BLOB_ENDPOINT.to_string());
        }

        let Some(account) = account_name else {
            return Err(DocscanError::Configuration(
                "Connection string needs AccountName".to_string(),
            ));
        };

        let endpoint = blob_endpoint.unwrap_or_else(|| {
            format!(
                "{}://{}.blob.{}",
                protocol.as_deref().unwrap_or("https"),
                account,
                suffix.as_deref().unwrap_or(DEFAULT_ENDPOINT_SUFFIX)
            )
        });

        let blob_endpoint = Url::parse(&endpoint).map_err(|e| {
            DocscanError::Configuration(format!("Invalid blob endpoint '{endpoint}': {e}"))
        })?;
        if blob_endpoint.cannot_be_a_base()
            || !matches!(blob_endpoint.scheme(), "http" | "https")
        {
            return Err(DocscanError::Configuration(format!(
                "Blob endpoint must be an http(s) URL, got '{endpoint}'"
            )));
        }

        let auth = match (sas, account_key) {
            (Some(token), _) => AccountAuth::Sas(
                url::form_urlencoded::parse(token.trim_start_matches('?').as_bytes())
                    .into_owned()
                    .collect(),
            ),
            (None, Some(key)) => AccountAuth::AccessKey(key),
            (None, None) => {
                return Err(DocscanError::Configuration(
                    "Connection string needs AccountKey or SharedAccessSignature".to_string(),
                ))
            }
        };

        Ok(Self {
            account,
            blob_endpoint,
            auth,
        })
    }

    pub fn blob_endpoint(&self) -> &Url {
        &self.blob_endpoint
    }
}

/// Writes blobs into one container.
#[derive(Clone)]
pub struct AzureBlobClient {
    store: Arc<dyn ObjectStore>,
    container: String,
    endpoint: Url,
}

impl fmt::Debug for AzureBlobClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureBlobClient")
            .field("container", &self.container)
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl AzureBlobClient {
    /// Every request is bounded by `timeout_secs` and never retried.
    pub fn new(connection: ConnectionString, container: &str, timeout_secs: u64) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_secs);
        let options = ClientOptions::new()
            .with_timeout(timeout)
            .with_allow_http(connection.blob_endpoint.scheme() == "http");
        let retry = RetryConfig {
            max_retries: 0,
            retry_timeout: timeout,
            ..RetryConfig::default()
        };

        let builder = MicrosoftAzureBuilder::new()
            .with_account(&connection.account)
            .with_container_name(container)
            .with_endpoint(connection.blob_endpoint.as_str().trim_end_matches('/').to_string())
            .with_client_options(options)
            .with_retry(retry);

        let builder = match connection.auth {
            AccountAuth::AccessKey(key) => builder.with_access_key(key),
            AccountAuth::Sas(pairs) => builder.with_sas_authorization(pairs),
        };

        let store = builder.build().map_err(|e| {
            DocscanError::Configuration(format!("Invalid Azure storage configuration: {e}"))
        })?;

        Ok(Self {
            store: Arc::new(store),
            container: container.to_string(),
            endpoint: connection.blob_endpoint,
        })
    }

    /// Public URL of a blob, derived from configuration only. Segments match
    /// the object path the store writes to.
    pub fn blob_url(&self, key: &str) -> Url {
        let mut url = self.endpoint.clone();
        // Endpoint is validated as a base URL in ConnectionString::parse.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&self.container)
                .extend(Path::from(key).parts());
        }
        url
    }

    /// Upload `body` as a block blob, overwriting any blob with the same key.
    pub async fn put_blob(&self, key: &str, body: Bytes, content_type: &str) -> Result<()> {
        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
        let options = PutOptions {
            attributes,
            ..PutOptions::default()
        };

        self.store
            .put_opts(&Path::from(key), PutPayload::from(body), options)
            .await
            .map_err(|e| {
                DocscanError::Storage(format!("Blob upload to {} failed: {e}", self.container))
            })?;

        tracing::debug!(container = %self.container, key, "Blob uploaded");
        Ok(())
    }
}
