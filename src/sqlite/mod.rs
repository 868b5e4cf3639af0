// SQLite backend: pool configuration, parameter conversion, row extraction,
// and the blocking execution helpers the database handle calls into.

pub mod config;
pub(crate) mod connection;
pub mod params;
pub mod query;

pub use config::{
    SharedSqliteConnection, SqliteManager, SqliteOptions, SqliteOptionsBuilder,
    SqlitePooledConnection, build_pool,
};
pub use params::Params;
pub use query::{build_first_row, build_result_set};
