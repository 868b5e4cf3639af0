use std::sync::Arc;

use rusqlite::Statement;
use rusqlite::types::Value;

use super::params::{Params, sqlite_value_to_row_value};
use crate::error::SqlSessionError;
use crate::results::{CustomDbRow, ResultSet};
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `SqlSessionError` if the column cannot be read.
pub fn sqlite_extract_value_sync(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<RowValues, SqlSessionError> {
    let value: Value = row.get(idx)?;
    Ok(sqlite_value_to_row_value(value))
}

fn column_names(stmt: &Statement) -> Arc<Vec<String>> {
    Arc::new(
        stmt.column_names()
            .iter()
            .map(std::string::ToString::to_string)
            .collect(),
    )
}

fn read_row(row: &rusqlite::Row, col_count: usize) -> Result<Vec<RowValues>, SqlSessionError> {
    (0..col_count)
        .map(|i| sqlite_extract_value_sync(row, i))
        .collect()
}

/// Run a prepared statement and materialize every row it yields.
///
/// # Errors
/// Returns `SqlSessionError::SqliteError` if binding, stepping, or reading fails.
pub fn build_result_set(
    stmt: &mut Statement,
    params: &Params,
) -> Result<ResultSet, SqlSessionError> {
    let names = column_names(stmt);
    let col_count = names.len();

    let mut rows_iter = stmt.query(params.as_bind())?;
    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(names);

    while let Some(row) = rows_iter.next()? {
        result_set.add_row_values(read_row(row, col_count)?);
    }

    Ok(result_set)
}

/// Run a prepared statement and keep only its first row, if any.
///
/// # Errors
/// Returns `SqlSessionError::SqliteError` if binding, stepping, or reading fails.
pub fn build_first_row(
    stmt: &mut Statement,
    params: &Params,
) -> Result<Option<CustomDbRow>, SqlSessionError> {
    let names = column_names(stmt);
    let col_count = names.len();

    let mut rows_iter = stmt.query(params.as_bind())?;
    match rows_iter.next()? {
        Some(row) => Ok(Some(CustomDbRow::new(names, read_row(row, col_count)?))),
        None => Ok(None),
    }
}
