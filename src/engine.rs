use std::sync::Arc;
use std::time::Duration;

use crate::error::SqlSessionError;
use crate::logging::Logger;
use crate::pool::DatabaseHandle;
use crate::session::Session;
use crate::sqlite::{SqliteOptions, SqliteOptionsBuilder};
use crate::types::DatabaseType;

/// Owns the database handle and the logger, and hands out sessions.
#[derive(Debug)]
pub struct Engine {
    handle: DatabaseHandle,
    logger: Arc<Logger>,
}

impl Engine {
    /// Open `source` with the driver named by `driver` (`"sqlite3"` or
    /// `"sqlite"`), logging to standard output.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ConfigError` for an unknown driver and
    /// `SqlSessionError::ConnectionError` if the database cannot be reached.
    /// Either way the error is logged first.
    pub async fn new(driver: &str, source: &str) -> Result<Self, SqlSessionError> {
        let logger = Arc::new(Logger::stdout());
        let db_type = match driver.parse::<DatabaseType>() {
            Ok(db_type) => db_type,
            Err(err) => {
                logger.error(&err);
                return Err(err);
            }
        };
        Self::connect(db_type, SqliteOptions::new(source), logger).await
    }

    #[must_use]
    pub fn sqlite_builder(db_path: impl Into<String>) -> EngineBuilder {
        EngineBuilder::new(db_path)
    }

    /// Open the handle, prove it with a ping, and log the outcome.
    ///
    /// # Errors
    /// Returns the open or ping failure after logging it.
    pub async fn connect(
        db_type: DatabaseType,
        opts: SqliteOptions,
        logger: Arc<Logger>,
    ) -> Result<Self, SqlSessionError> {
        let handle = match DatabaseHandle::open(db_type, &opts).await {
            Ok(handle) => handle,
            Err(err) => {
                logger.error(&err);
                return Err(err);
            }
        };
        if let Err(err) = handle.ping().await {
            logger.error(&err);
            return Err(err);
        }
        logger.info("Connect database success");
        Ok(Self { handle, logger })
    }

    /// A fresh session sharing this engine's handle and logger.
    #[must_use]
    pub fn new_session(&self) -> Session<'_> {
        Session::new(&self.handle, &self.logger)
    }

    #[must_use]
    pub fn handle(&self) -> &DatabaseHandle {
        &self.handle
    }

    #[must_use]
    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Close the handle. Failures are logged, not returned.
    pub fn close(self) {
        if let Err(err) = self.handle.close() {
            self.logger.errorf(format_args!("Failed to close database: {err}"));
        }
        self.logger.info("Close database success");
    }
}

/// Fluent builder for an [`Engine`] over `SQLite`.
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    opts: SqliteOptionsBuilder,
    logger: Option<Arc<Logger>>,
}

impl EngineBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: SqliteOptionsBuilder::new(db_path),
            logger: None,
        }
    }

    #[must_use]
    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.opts = self.opts.max_connections(max_connections);
        self
    }

    #[must_use]
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.opts = self.opts.connection_timeout(timeout);
        self
    }

    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.opts = self.opts.busy_timeout(timeout);
        self
    }

    #[must_use]
    pub fn wal(mut self, wal: bool) -> Self {
        self.opts = self.opts.wal(wal);
        self
    }

    /// Share an existing logger instead of a fresh stdout one.
    #[must_use]
    pub fn logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Build and ping the engine.
    ///
    /// # Errors
    /// Returns `SqlSessionError` if the options are invalid or the database is unreachable.
    pub async fn build(self) -> Result<Engine, SqlSessionError> {
        let logger = self.logger.unwrap_or_else(|| Arc::new(Logger::stdout()));
        Engine::connect(DatabaseType::Sqlite, self.opts.finish(), logger).await
    }
}
