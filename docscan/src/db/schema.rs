use libsql::Connection;

use crate::error::Result;

/// Create the `documents` table if it is missing. Existing tables are left
/// untouched; there is no migration step.
pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            filename TEXT NOT NULL,
            blob_url TEXT NOT NULL,
            text TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_documents_created_at ON documents(created_at);
        "#,
    )
    .await?;

    Ok(())
}
