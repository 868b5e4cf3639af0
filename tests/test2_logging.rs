mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{Captured, engine_with_capture, unique_db_path};
use sql_session::prelude::*;

#[test]
fn disabled_suppresses_both_channels() {
    let out = Captured::default();
    let logger = Logger::with_console(out.clone());
    logger.set_level(LogLevel::Disabled);
    logger.info("info line");
    logger.error("error line");
    assert_eq!(out.text(), "");
}

#[test]
fn error_only_keeps_error_channel() {
    let out = Captured::default();
    let logger = Logger::with_console(out.clone());
    logger.set_level(LogLevel::Error);
    logger.infof(format_args!("info {}", 1));
    logger.errorf(format_args!("error {}", 2));
    let lines = out.lines();
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains("[error]"));
    assert!(lines[0].ends_with("error 2"));
}

#[test]
fn info_level_restores_both_channels() {
    let out = Captured::default();
    let logger = Logger::with_console(out.clone()).with_level(LogLevel::Disabled);
    logger.set_level(LogLevel::Info);
    logger.info("info line");
    logger.error("error line");
    let lines = out.lines();
    assert_eq!(lines.len(), 2, "{lines:?}");
    assert!(lines[0].contains("\x1b[34m[info ]\x1b[0m"));
    assert!(lines[1].contains("\x1b[31m[error]\x1b[0m"));
}

#[test]
fn concurrent_emission_and_level_changes_keep_lines_whole() {
    let out = Captured::default();
    let logger = Arc::new(Logger::with_console(out.clone()));
    let mut handles = Vec::new();
    for i in 0..8 {
        let logger = Arc::clone(&logger);
        handles.push(std::thread::spawn(move || {
            for j in 0..50 {
                if j % 10 == 0 {
                    logger.set_level(if i % 2 == 0 {
                        LogLevel::Info
                    } else {
                        LogLevel::Error
                    });
                }
                logger.errorf(format_args!("worker {i} step {j}"));
            }
        }));
    }
    for handle in handles {
        handle.join().expect("logger thread panicked");
    }
    let lines = out.lines();
    assert_eq!(lines.len(), 8 * 50);
    assert!(lines.iter().all(|line| line.contains("[error]")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn session_logs_statement_and_params() -> Result<(), Box<dyn std::error::Error>> {
    let (engine, out) = engine_with_capture("log_stmt").await?;
    assert!(out.text().contains("Connect database success"));

    let mut s = engine.new_session();
    s.raw("CREATE TABLE User(Name text);", &[]).exec().await?;
    s.raw(
        "INSERT INTO User(`Name`) values (?), (?)",
        &["Tom".into(), "Sam".into()],
    )
    .exec()
    .await?;

    let text = out.text();
    assert!(text.contains("session.rs:"), "{text}");
    assert!(
        text.contains("INSERT INTO User(`Name`) values (?), (?)  [Tom Sam]"),
        "{text}"
    );

    engine.close();
    assert!(out.text().contains("Close database success"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn level_applies_to_session_output() -> Result<(), Box<dyn std::error::Error>> {
    let (engine, out) = engine_with_capture("log_level").await?;
    engine.logger().set_level(LogLevel::Error);
    out.reset();

    let mut s = engine.new_session();
    s.raw("CREATE TABLE t (id INTEGER);", &[]).exec().await?;
    let _ = s.raw("CREATE TABLE t (id INTEGER);", &[]).exec().await;

    let lines = out.lines();
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains("[error]") && lines[0].contains("already exists"));

    engine.logger().set_level(LogLevel::Disabled);
    out.reset();
    let _ = s.raw("CREATE TABLE t (id INTEGER);", &[]).exec().await;
    assert_eq!(out.text(), "");
    Ok(())
}

#[tokio::test]
async fn engine_construction_failures_are_logged() {
    let out = Captured::default();
    let logger = Arc::new(Logger::with_console(out.clone()));
    let missing_dir = unique_db_path("parent").replace("parent.db", "no/such/dir/x.db");
    let started = Instant::now();
    let err = Engine::sqlite_builder(missing_dir)
        .connection_timeout(Duration::from_secs(5))
        .logger(logger)
        .build()
        .await
        .unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(2), "{:?}", started.elapsed());
    assert!(matches!(err, SqlSessionError::ConnectionError(_)), "{err:?}");
    assert!(
        err.to_string().contains("failed to open SQLite database"),
        "{err}"
    );
    let text = out.text();
    assert!(text.contains("[error]"), "{text}");
    assert!(text.contains("failed to open SQLite database"), "{text}");
    assert!(!text.contains("timed out"), "{text}");
    assert!(!text.contains("Connect database success"), "{text}");
}
