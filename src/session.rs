//! Reusable raw-SQL session.
//!
//! A [`Session`] accumulates SQL text and positional parameters through
//! [`raw`](Session::raw), then runs them with one of the terminal calls
//! ([`exec`](Session::exec), [`query_row`](Session::query_row),
//! [`query_rows`](Session::query_rows)). Every terminal call logs the
//! statement, hands the parameters to the driver's binding path, and leaves
//! the session empty whether the statement succeeded or not.
//!
//! ```rust,no_run
//! use sql_session::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlSessionError> {
//! let engine = Engine::new("sqlite3", "gee.db").await?;
//! let mut s = engine.new_session();
//! s.raw("CREATE TABLE IF NOT EXISTS User(Name text);", &[]).exec().await?;
//! let result = s
//!     .raw("INSERT INTO User(`Name`) values (?), (?)", &["Tom".into(), "Sam".into()])
//!     .exec()
//!     .await?;
//! assert_eq!(result.rows_affected, 2);
//! # Ok(()) }
//! ```

use crate::error::SqlSessionError;
use crate::logging::Logger;
use crate::pool::DatabaseHandle;
use crate::results::{CustomDbRow, ExecResult, ResultSet};
use crate::types::{DisplayParams, RowValues};

/// SQL statement builder bound to a borrowed database handle.
///
/// Not synchronized: all mutating calls take `&mut self`, so one instance is
/// driven by one caller at a time. Create one per unit of work with
/// [`Engine::new_session`](crate::Engine::new_session).
#[derive(Debug)]
pub struct Session<'h> {
    handle: &'h DatabaseHandle,
    logger: &'h Logger,
    sql: String,
    params: Vec<RowValues>,
}

impl<'h> Session<'h> {
    #[must_use]
    pub fn new(handle: &'h DatabaseHandle, logger: &'h Logger) -> Self {
        Self {
            handle,
            logger,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// The handle this session executes against.
    #[must_use]
    pub fn handle(&self) -> &'h DatabaseHandle {
        self.handle
    }

    /// Append `sql` plus one separating space, and append `params` in order.
    ///
    /// Nothing is validated here; a placeholder/parameter mismatch surfaces as a
    /// driver error from the terminal call.
    pub fn raw(&mut self, sql: &str, params: &[RowValues]) -> &mut Self {
        self.sql.push_str(sql);
        self.sql.push(' ');
        self.params.extend_from_slice(params);
        self
    }

    /// Pending SQL text, including the trailing separator.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Pending parameters.
    #[must_use]
    pub fn params(&self) -> &[RowValues] {
        &self.params
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty() && self.params.is_empty()
    }

    /// Drop the pending statement. Idempotent.
    pub fn clear(&mut self) {
        self.sql.clear();
        self.params.clear();
    }

    /// Move the pending statement out, leaving the session empty before the
    /// driver runs.
    fn take_statement(&mut self) -> (String, Vec<RowValues>) {
        let statement = (
            std::mem::take(&mut self.sql),
            std::mem::take(&mut self.params),
        );
        self.logger
            .infof(format_args!("{} {}", statement.0, DisplayParams(&statement.1)));
        statement
    }

    /// Run the pending statement as INSERT/UPDATE/DELETE/DDL.
    ///
    /// # Errors
    /// Returns the driver error (logged at error level). The session is empty
    /// afterwards either way.
    pub async fn exec(&mut self) -> Result<ExecResult, SqlSessionError> {
        let (sql, params) = self.take_statement();
        let result = self.handle.exec(&sql, &params).await;
        if let Err(err) = &result {
            self.logger.error(err);
        }
        result
    }

    /// Run the pending statement as a query expected to return at most one row.
    ///
    /// Neither an empty result nor a driver error is reported here; both are
    /// kept on the returned [`SingleRow`] for the caller to inspect.
    pub async fn query_row(&mut self) -> SingleRow {
        let (sql, params) = self.take_statement();
        let outcome = self.handle.query_first(&sql, &params).await;
        if let Err(err) = &outcome {
            self.logger.error(err);
        }
        SingleRow { outcome }
    }

    /// Run the pending statement as a query returning zero or more rows.
    ///
    /// # Errors
    /// Returns the driver error (logged at error level). The session is empty
    /// afterwards either way.
    pub async fn query_rows(&mut self) -> Result<ResultSet, SqlSessionError> {
        let (sql, params) = self.take_statement();
        let result = self.handle.query(&sql, &params).await;
        if let Err(err) = &result {
            self.logger.error(err);
        }
        result
    }
}

/// Single-row cursor: the deferred outcome of [`Session::query_row`].
#[derive(Debug)]
pub struct SingleRow {
    outcome: Result<Option<CustomDbRow>, SqlSessionError>,
}

impl SingleRow {
    /// The row, or [`SqlSessionError::NoRows`] if the query produced none.
    ///
    /// # Errors
    /// Returns the deferred driver error, or `NoRows`.
    pub fn scan(self) -> Result<CustomDbRow, SqlSessionError> {
        self.outcome?.ok_or(SqlSessionError::NoRows)
    }

    /// The row if there was one; an empty result is `Ok(None)`.
    ///
    /// # Errors
    /// Returns the deferred driver error.
    pub fn optional(self) -> Result<Option<CustomDbRow>, SqlSessionError> {
        self.outcome
    }

    /// The deferred driver error, if the query failed.
    #[must_use]
    pub fn err(&self) -> Option<&SqlSessionError> {
        self.outcome.as_ref().err()
    }
}
