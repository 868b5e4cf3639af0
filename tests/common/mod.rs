#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use sql_session::prelude::*;
use tempfile::tempdir;

pub fn unique_db_path(prefix: &str) -> String {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(format!("{prefix}.db"));
    // Leak the tempdir so the file persists for the duration of the test binary.
    std::mem::forget(dir);
    path.to_string_lossy().into_owned()
}

/// Console sink that keeps everything written to it.
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("capture lock")).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_owned).collect()
    }

    pub fn reset(&self) {
        self.0.lock().expect("capture lock").clear();
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("capture lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub async fn engine_with_capture(prefix: &str) -> Result<(Engine, Captured), SqlSessionError> {
    let out = Captured::default();
    let logger = Arc::new(Logger::with_console(out.clone()));
    let engine = Engine::sqlite_builder(unique_db_path(prefix))
        .max_connections(2)
        .logger(logger)
        .build()
        .await?;
    Ok((engine, out))
}
