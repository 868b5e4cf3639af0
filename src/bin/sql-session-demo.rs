use std::sync::Arc;

use clap::Parser;
use sql_session::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Create a table and insert two rows through a raw SQL session")]
struct Args {
    /// SQLite database file (or `file:` URI).
    #[arg(long, default_value = "gee.db")]
    db: String,
    /// Console log level for the session logger.
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
    #[arg(long, default_value_t = 1)]
    pool_size: u32,
}

#[tokio::main]
async fn main() -> Result<(), SqlSessionError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let logger = Arc::new(Logger::stdout().with_level(args.log_level));
    let engine = Engine::sqlite_builder(args.db)
        .max_connections(args.pool_size)
        .logger(logger)
        .build()
        .await?;

    let mut s = engine.new_session();
    s.raw("DROP TABLE IF EXISTS User;", &[]).exec().await?;
    s.raw("CREATE TABLE User(Name text);", &[]).exec().await?;
    // Creating it again shows the error path; the session stays usable.
    let _ = s.raw("CREATE TABLE User(Name text);", &[]).exec().await;
    let result = s
        .raw(
            "INSERT INTO User(`Name`) values (?), (?)",
            &["Tom".into(), "Sam".into()],
        )
        .exec()
        .await?;
    println!("Exec success, {} affected", result.rows_affected);

    engine.close();
    Ok(())
}
