use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored record linking an uploaded file to its blob and extracted text.
///
/// Records are written once per successful upload and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub filename: String,
    pub blob_url: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when recording a new document. The id and
/// timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub filename: String,
    pub blob_url: String,
    pub text: String,
}

impl NewDocument {
    pub fn new(
        filename: impl Into<String>,
        blob_url: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            blob_url: blob_url.into(),
            text: text.into(),
        }
    }
}
