use std::sync::Arc;

use tokio::task::spawn_blocking;

use super::config::{SharedSqliteConnection, SqlitePooledConnection};
use super::params::Params;
use super::query::{build_first_row, build_result_set};
use crate::error::SqlSessionError;
use crate::results::{CustomDbRow, ExecResult, ResultSet};
use crate::types::RowValues;

/// Run synchronous `rusqlite` logic against a pooled connection on the blocking pool.
pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, SqlSessionError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlSessionError> + Send + 'static,
    R: Send + 'static,
{
    spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| SqlSessionError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}

/// Execute a data-modifying statement and report rows affected and the last rowid.
///
/// Without parameters the buffer runs as a batch, so several `;`-separated
/// statements are accepted. Rows returned by a statement are discarded.
pub(crate) async fn dml(
    conn: &SqlitePooledConnection<'_>,
    query: &str,
    params: &[RowValues],
) -> Result<ExecResult, SqlSessionError> {
    let converted = Params::convert(params);
    let sql_owned = query.to_owned();
    run_blocking(Arc::clone(&**conn), move |guard| {
        let before = total_changes(guard)?;
        if converted.as_values().is_empty() {
            guard.execute_batch(&sql_owned)?;
        } else {
            let mut stmt = guard.prepare(&sql_owned)?;
            let mut rows = stmt.query(converted.as_bind())?;
            while rows.next()?.is_some() {}
        }
        let after = total_changes(guard)?;
        Ok(ExecResult {
            rows_affected: usize::try_from(after - before).unwrap_or(0),
            last_insert_id: guard.last_insert_rowid(),
        })
    })
    .await
}

fn total_changes(guard: &rusqlite::Connection) -> Result<i64, SqlSessionError> {
    Ok(guard.query_row("SELECT total_changes()", [], |row| row.get(0))?)
}

/// Execute a query and materialize all rows.
pub(crate) async fn select(
    conn: &SqlitePooledConnection<'_>,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlSessionError> {
    let converted = Params::convert(params);
    let sql_owned = query.to_owned();
    run_blocking(Arc::clone(&**conn), move |guard| {
        let mut stmt = guard.prepare(&sql_owned)?;
        build_result_set(&mut stmt, &converted)
    })
    .await
}

/// Execute a query and keep at most one row.
pub(crate) async fn select_first(
    conn: &SqlitePooledConnection<'_>,
    query: &str,
    params: &[RowValues],
) -> Result<Option<CustomDbRow>, SqlSessionError> {
    let converted = Params::convert(params);
    let sql_owned = query.to_owned();
    run_blocking(Arc::clone(&**conn), move |guard| {
        let mut stmt = guard.prepare(&sql_owned)?;
        build_first_row(&mut stmt, &converted)
    })
    .await
}

/// Round-trip a trivial statement to prove the connection is usable.
pub(crate) async fn ping(conn: SharedSqliteConnection) -> Result<(), SqlSessionError> {
    run_blocking(conn, |guard| {
        guard.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    })
    .await
}
