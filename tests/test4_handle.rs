mod common;

use std::sync::Arc;

use common::{Captured, engine_with_capture, unique_db_path};
use sql_session::prelude::*;

#[tokio::test]
async fn unknown_driver_is_a_config_error() {
    let err = Engine::new("mysql", &unique_db_path("driver"))
        .await
        .unwrap_err();
    assert!(matches!(err, SqlSessionError::ConfigError(_)), "{err:?}");
}

#[tokio::test]
async fn new_accepts_sqlite3_driver_name() -> Result<(), Box<dyn std::error::Error>> {
    let engine = Engine::new("sqlite3", &unique_db_path("sqlite3")).await?;
    engine.logger().set_level(LogLevel::Disabled);
    assert_eq!(engine.handle().db_type(), DatabaseType::Sqlite);
    engine.handle().ping().await?;
    engine.close();
    Ok(())
}

#[tokio::test]
async fn closed_handle_rejects_work() -> Result<(), Box<dyn std::error::Error>> {
    let out = Captured::default();
    let handle = DatabaseHandle::open(
        DatabaseType::Sqlite,
        &SqliteOptionsBuilder::new(unique_db_path("closed")).finish(),
    )
    .await?;
    handle.ping().await?;
    handle.close()?;
    assert!(handle.is_closed());
    assert!(matches!(
        handle.ping().await,
        Err(SqlSessionError::ConnectionError(_))
    ));
    assert!(handle.close().is_err());

    // Sessions surface the closed handle as an ordinary, logged execution error.
    let logger = Logger::with_console(out.clone());
    let mut s = Session::new(&handle, &logger);
    assert!(s.raw("SELECT 1", &[]).exec().await.is_err());
    assert!(s.is_empty());
    assert!(out.text().contains("database is closed"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sessions_share_one_handle_across_tasks() -> Result<(), Box<dyn std::error::Error>> {
    let (engine, _out) = engine_with_capture("shared").await?;
    engine.logger().set_level(LogLevel::Error);
    engine
        .new_session()
        .raw("CREATE TABLE hits (worker INTEGER, n INTEGER);", &[])
        .exec()
        .await?;

    let engine = Arc::new(engine);
    let mut handles = Vec::new();
    for worker in 0..4_i64 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            let mut s = engine.new_session();
            for n in 0..10_i64 {
                s.raw("INSERT INTO hits VALUES (?, ?)", &[worker.into(), n.into()])
                    .exec()
                    .await?;
            }
            Ok::<(), SqlSessionError>(())
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let row = engine
        .new_session()
        .raw("SELECT COUNT(*) AS cnt FROM hits", &[])
        .query_row()
        .await
        .scan()?;
    assert_eq!(row.get("cnt").and_then(RowValues::as_int), Some(&40));
    assert!(engine.handle().pool_state().connections <= 2);
    Ok(())
}
