use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlSessionError {
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    /// A single-row cursor was scanned but the query produced no rows.
    #[error("no rows in result set")]
    NoRows,
}

impl SqlSessionError {
    /// True when this is the "no rows" outcome of a single-row cursor.
    #[must_use]
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows)
    }
}

impl From<bb8::RunError<SqlSessionError>> for SqlSessionError {
    fn from(err: bb8::RunError<SqlSessionError>) -> Self {
        match err {
            bb8::RunError::User(inner) => inner,
            bb8::RunError::TimedOut => {
                SqlSessionError::ConnectionError("SQLite pool checkout timed out".into())
            }
        }
    }
}
