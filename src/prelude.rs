//! Convenient imports for common functionality.

pub use crate::engine::{Engine, EngineBuilder};
pub use crate::error::SqlSessionError;
pub use crate::logging::{LogLevel, Logger};
pub use crate::pool::DatabaseHandle;
pub use crate::results::{CustomDbRow, ExecResult, ResultSet};
pub use crate::session::{Session, SingleRow};
pub use crate::sqlite::{SqliteOptions, SqliteOptionsBuilder};
pub use crate::types::{DatabaseType, RowValues};
