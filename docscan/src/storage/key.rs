use uuid::Uuid;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Build a storage key for an upload: a fresh UUID v4 joined to the
/// client-supplied filename.
///
/// The random prefix keeps keys unique even when many clients upload files
/// with the same name.
pub fn blob_key(filename: &str) -> String {
    let id = Uuid::new_v4();
    if filename.is_empty() {
        id.to_string()
    } else {
        format!("{id}-{filename}")
    }
}

/// Pick a content type for the stored blob: sniff the bytes first, then the
/// filename extension.
pub fn detect_content_type(bytes: &[u8], filename: &str) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }

    mime_guess::from_path(filename)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
}
