/// Outcome of a data-modifying statement (INSERT/UPDATE/DELETE/DDL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecResult {
    /// Rows changed by the statement; zero for DDL.
    pub rows_affected: usize,
    /// Rowid of the most recent successful INSERT on the connection that ran the statement.
    pub last_insert_id: i64,
}
