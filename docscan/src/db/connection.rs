use libsql::{Builder, Connection};
use std::ops::Deref;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::config::DatabaseConfig;
use crate::error::{DocscanError, Result};

use super::schema;

/// Handle to the metadata database with a bounded connection pool.
///
/// Every caller goes through [`Database::acquire`], which waits for one of
/// `max_connections` permits before opening a connection. The permit travels
/// with the returned [`PooledConnection`] and is released when it is dropped,
/// so the number of live connections never exceeds the pool size.
pub struct Database {
    pub(crate) db: Arc<libsql::Database>,
    permits: Arc<Semaphore>,
    max_connections: usize,
    busy_timeout_ms: u64,
    is_local: bool,
    // In-memory databases vanish with their connection, so they share one.
    shared: Option<Connection>,
}

/// A connection checked out of the pool.
pub struct PooledConnection {
    conn: Connection,
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

fn is_in_memory(url: &str) -> bool {
    url == ":memory:" || url == "file::memory:"
}

fn is_remote(url: &str) -> bool {
    url.starts_with("libsql://") || url.starts_with("https://") || url.starts_with("http://")
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let in_memory = is_in_memory(&config.url);
        let remote = is_remote(&config.url);

        let db = if remote {
            Builder::new_remote(
                config.url.clone(),
                config.auth_token.clone().unwrap_or_default(),
            )
            .build()
            .await?
        } else if in_memory {
            Builder::new_local(":memory:").build().await?
        } else {
            let path = config.url.strip_prefix("file:").unwrap_or(&config.url);
            Builder::new_local(path).build().await?
        };

        let shared = if in_memory { Some(db.connect()?) } else { None };
        let max_connections = if in_memory {
            1
        } else {
            config.max_connections.max(1)
        };

        let database = Self {
            db: Arc::new(db),
            permits: Arc::new(Semaphore::new(max_connections)),
            max_connections,
            busy_timeout_ms: config.busy_timeout_ms,
            is_local: !remote,
            shared,
        };
        database.configure_database().await?;
        database.init_schema().await?;

        tracing::info!(
            url = %redact_url(&config.url),
            max_connections,
            "Database ready"
        );

        Ok(database)
    }

    /// Check a connection out of the pool, waiting if all are in use.
    pub async fn acquire(&self) -> Result<PooledConnection> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| DocscanError::Internal(format!("Connection pool closed: {e}")))?;

        let conn = match &self.shared {
            Some(conn) => conn.clone(),
            None => {
                let conn = self.db.connect()?;
                if self.is_local {
                    self.apply_busy_timeout(&conn).await;
                }
                conn
            }
        };

        Ok(PooledConnection {
            conn,
            _permit: permit,
        })
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    pub fn available_connections(&self) -> usize {
        self.permits.available_permits()
    }

    async fn apply_busy_timeout(&self, conn: &Connection) {
        let sql = format!("PRAGMA busy_timeout = {}", self.busy_timeout_ms);
        if let Err(error) = conn.execute_batch(&sql).await {
            tracing::warn!(
                busy_timeout_ms = self.busy_timeout_ms,
                error = %error,
                "Failed to set SQLite busy_timeout"
            );
        }
    }

    async fn configure_database(&self) -> Result<()> {
        if !self.is_local || self.shared.is_some() {
            return Ok(());
        }

        let conn = self.acquire().await?;
        if let Err(error) = conn.execute_batch("PRAGMA journal_mode = WAL").await {
            tracing::warn!(error = %error, "Failed to set SQLite journal_mode");
        }

        Ok(())
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.acquire().await?;
        schema::init_schema(&conn).await?;
        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            permits: Arc::clone(&self.permits),
            max_connections: self.max_connections,
            busy_timeout_ms: self.busy_timeout_ms,
            is_local: self.is_local,
            shared: self.shared.clone(),
        }
    }
}

/// Strip any query string so auth parameters never reach the logs.
fn redact_url(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
