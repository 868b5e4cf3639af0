use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bb8::Pool;

use crate::error::SqlSessionError;
use crate::results::{CustomDbRow, ExecResult, ResultSet};
use crate::sqlite::connection;
use crate::sqlite::{SqliteManager, SqliteOptions, SqlitePooledConnection, build_pool};
use crate::types::{DatabaseType, RowValues};

/// Shared, thread-safe database handle: the connection pool plus its type.
///
/// Cloning is cheap and every clone refers to the same pool. Sessions borrow
/// a handle and never close it; the owning [`Engine`](crate::Engine) does.
#[derive(Clone)]
pub struct DatabaseHandle {
    pool: Pool<SqliteManager>,
    db_type: DatabaseType,
    closed: Arc<AtomicBool>,
}

/// Snapshot of pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    pub connections: u32,
    pub idle_connections: u32,
}

impl std::fmt::Debug for DatabaseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseHandle")
            .field("db_type", &self.db_type)
            .field("closed", &self.is_closed())
            .field("state", &self.pool_state())
            .finish()
    }
}

impl DatabaseHandle {
    /// Create the pool for `db_type`. No connection is opened until the first
    /// checkout; call [`ping`](Self::ping) to prove the database is reachable.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ConfigError` for invalid options, or a
    /// connection error if the pool cannot be built.
    pub async fn open(
        db_type: DatabaseType,
        opts: &SqliteOptions,
    ) -> Result<Self, SqlSessionError> {
        let pool = match db_type {
            DatabaseType::Sqlite => build_pool(opts).await?,
        };
        Ok(Self {
            pool,
            db_type,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    #[must_use]
    pub fn db_type(&self) -> DatabaseType {
        self.db_type
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn pool_state(&self) -> PoolState {
        let state = self.pool.state();
        PoolState {
            connections: state.connections,
            idle_connections: state.idle_connections,
        }
    }

    async fn checkout(&self) -> Result<SqlitePooledConnection<'_>, SqlSessionError> {
        if self.is_closed() {
            return Err(SqlSessionError::ConnectionError("database is closed".into()));
        }
        self.pool.get().await.map_err(|err| {
            tracing::warn!(error = ?err, "sqlite checkout failed");
            SqlSessionError::from(err)
        })
    }

    /// Open a connection outside the pool and run a trivial query on it, so an
    /// open failure surfaces as the driver reported it.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ConnectionError` if the database is unreachable
    /// or the handle is closed.
    pub async fn ping(&self) -> Result<(), SqlSessionError> {
        if self.is_closed() {
            return Err(SqlSessionError::ConnectionError("database is closed".into()));
        }
        let conn = self.pool.dedicated_connection().await.map_err(|err| {
            tracing::warn!(error = %err, "sqlite ping failed to connect");
            err
        })?;
        connection::ping(conn).await
    }

    /// Mark the handle closed. Pooled connections are released once the last
    /// clone of the handle is dropped.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ConnectionError` if the handle was already closed.
    pub fn close(&self) -> Result<(), SqlSessionError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(SqlSessionError::ConnectionError(
                "database is already closed".into(),
            ));
        }
        Ok(())
    }

    /// Execute a data-modifying statement with bound parameters.
    ///
    /// # Errors
    /// Propagates checkout and driver errors.
    pub async fn exec(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ExecResult, SqlSessionError> {
        let conn = self.checkout().await?;
        connection::dml(&conn, query, params).await
    }

    /// Execute a query and materialize every row.
    ///
    /// # Errors
    /// Propagates checkout and driver errors.
    pub async fn query(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlSessionError> {
        let conn = self.checkout().await?;
        connection::select(&conn, query, params).await
    }

    /// Execute a query and keep only its first row.
    ///
    /// # Errors
    /// Propagates checkout and driver errors; an empty result is `Ok(None)`.
    pub async fn query_first(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<Option<CustomDbRow>, SqlSessionError> {
        let conn = self.checkout().await?;
        connection::select_first(&conn, query, params).await
    }
}
