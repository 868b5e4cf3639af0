use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bb8::{ManageConnection, Pool};
use rusqlite::OpenFlags;
use tokio::sync::Mutex;

use crate::error::SqlSessionError;

/// Shared handle to a rusqlite connection guarded by a mutex for async access.
pub type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

/// A connection checked out of the pool.
pub type SqlitePooledConnection<'a> = bb8::PooledConnection<'a, SqliteManager>;

const DEFAULT_MAX_CONNECTIONS: u32 = 4;
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Options for configuring a `SQLite` pool.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    /// Path or `file:` URI of the database.
    pub db_path: String,
    pub max_connections: u32,
    /// How long a checkout may wait for a free connection.
    pub connection_timeout: Duration,
    pub busy_timeout: Duration,
    /// Switch each new connection to `journal_mode = WAL`.
    pub wal: bool,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            wal: false,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), SqlSessionError> {
        if self.db_path.trim().is_empty() {
            return Err(SqlSessionError::ConfigError(
                "SQLite database path must not be empty".into(),
            ));
        }
        if self.max_connections == 0 {
            return Err(SqlSessionError::ConfigError(
                "max_connections must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.opts.max_connections = max_connections;
        self
    }

    #[must_use]
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.opts.connection_timeout = timeout;
        self
    }

    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.opts.busy_timeout = timeout;
        self
    }

    #[must_use]
    pub fn wal(mut self, wal: bool) -> Self {
        self.opts.wal = wal;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }
}

/// bb8 manager that opens rusqlite connections for one database path.
#[derive(Debug, Clone)]
pub struct SqliteManager {
    db_path: String,
    busy_timeout: Duration,
    wal: bool,
}

impl SqliteManager {
    #[must_use]
    pub fn new(opts: &SqliteOptions) -> Self {
        Self {
            db_path: opts.db_path.clone(),
            busy_timeout: opts.busy_timeout,
            wal: opts.wal,
        }
    }

    fn open(&self) -> Result<rusqlite::Connection, SqlSessionError> {
        let conn = rusqlite::Connection::open_with_flags(&self.db_path, OpenFlags::default())
            .map_err(|e| {
                SqlSessionError::ConnectionError(format!(
                    "failed to open SQLite database {}: {e}",
                    self.db_path
                ))
            })?;
        conn.busy_timeout(self.busy_timeout)?;
        if self.wal {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        tracing::debug!(db_path = %self.db_path, wal = self.wal, "opened sqlite connection");
        Ok(conn)
    }
}

impl ManageConnection for SqliteManager {
    type Connection = SharedSqliteConnection;
    type Error = SqlSessionError;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let manager = self.clone();
        async move {
            let conn = tokio::task::spawn_blocking(move || manager.open())
                .await
                .map_err(|e| {
                    SqlSessionError::ConnectionError(format!("sqlite open join error: {e}"))
                })??;
            Ok(Arc::new(Mutex::new(conn)))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        async move {
            let guard = conn.lock().await;
            guard.query_row("SELECT 1", [], |_| Ok(()))?;
            Ok(())
        }
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}

/// Build the connection pool. No connection is opened here; checkouts that
/// cannot connect fail without retrying.
///
/// # Errors
/// Returns `SqlSessionError::ConfigError` for invalid options and
/// `SqlSessionError::ConnectionError` if the pool cannot be created.
pub async fn build_pool(opts: &SqliteOptions) -> Result<Pool<SqliteManager>, SqlSessionError> {
    opts.validate()?;
    let pool = Pool::builder()
        .max_size(opts.max_connections)
        .connection_timeout(opts.connection_timeout)
        .retry_connection(false)
        .test_on_check_out(false)
        .build(SqliteManager::new(opts))
        .await?;
    tracing::debug!(
        db_path = %opts.db_path,
        max_connections = opts.max_connections,
        "built sqlite pool"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let opts = SqliteOptionsBuilder::new("gee.db")
            .max_connections(2)
            .busy_timeout(Duration::from_millis(250))
            .wal(true)
            .finish();
        assert_eq!(opts.db_path, "gee.db");
        assert_eq!(opts.max_connections, 2);
        assert_eq!(opts.busy_timeout, Duration::from_millis(250));
        assert_eq!(opts.connection_timeout, DEFAULT_CONNECTION_TIMEOUT);
        assert!(opts.wal);
    }

    #[test]
    fn rejects_empty_path_and_zero_pool() {
        assert!(SqliteOptions::new("  ").validate().is_err());
        let mut opts = SqliteOptions::new("gee.db");
        opts.max_connections = 0;
        assert!(matches!(
            opts.validate(),
            Err(SqlSessionError::ConfigError(_))
        ));
    }
}
