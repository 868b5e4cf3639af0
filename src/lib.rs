//! Reusable raw-SQL sessions over a pooled `SQLite` handle.
//!
//! The [`Engine`] owns a [`DatabaseHandle`] (a `bb8` pool of `rusqlite`
//! connections) and a [`Logger`]. Each [`Session`] it hands out accumulates SQL
//! text and bound parameters, runs them once, and resets itself.
//!
//! ```rust,no_run
//! use sql_session::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlSessionError> {
//! let engine = Engine::sqlite_builder("gee.db").max_connections(2).build().await?;
//! let mut s = engine.new_session();
//! s.raw("DROP TABLE IF EXISTS User;", &[]).exec().await?;
//! s.raw("CREATE TABLE User(Name text);", &[]).exec().await?;
//! let row = s
//!     .raw("SELECT count(*) AS n FROM User", &[])
//!     .query_row()
//!     .await
//!     .scan()?;
//! assert_eq!(row.get("n").and_then(RowValues::as_int), Some(&0));
//! engine.close();
//! # Ok(()) }
//! ```

pub mod engine;
pub mod error;
pub mod logging;
pub mod pool;
pub mod prelude;
pub mod results;
pub mod session;
pub mod sqlite;
pub mod types;

pub use engine::{Engine, EngineBuilder};
pub use error::SqlSessionError;
pub use logging::{LogLevel, Logger};
pub use pool::{DatabaseHandle, PoolState};
pub use results::{CustomDbRow, ExecResult, ResultSet};
pub use session::{Session, SingleRow};
pub use types::{DatabaseType, RowValues};
