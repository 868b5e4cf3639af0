//! Leveled, color-tagged console logger.
//!
//! Two channels share one console: `info` lines are tagged with a blue
//! `[info ]`, `error` lines with a red `[error]`. The [`LogLevel`] decides
//! which channels reach the console and which go to a discard target.
//!
//! There is no process-wide instance; the engine owns an `Arc<Logger>` and
//! lends it to the sessions it creates.
//!
//! ```rust
//! use sql_session::logging::{LogLevel, Logger};
//!
//! let logger = Logger::stdout();
//! logger.info("Connect database success");
//! logger.set_level(LogLevel::Error);
//! logger.info("dropped");
//! logger.errorf(format_args!("table {} already exists", "User"));
//! ```

use std::fmt;
use std::io::{self, Write};
use std::panic::Location;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use clap::ValueEnum;

const INFO_TAG: &str = "\x1b[34m[info ]\x1b[0m";
const ERROR_TAG: &str = "\x1b[31m[error]\x1b[0m";
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Ordered severity threshold. Each level suppresses everything below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, ValueEnum)]
pub enum LogLevel {
    /// Informational and error messages.
    #[default]
    Info,
    /// Error messages only.
    Error,
    /// Nothing.
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Console,
    Discard,
}

struct LoggerState {
    level: LogLevel,
    info: Target,
    error: Target,
    console: Box<dyn Write + Send>,
}

impl LoggerState {
    fn rewire(&mut self, level: LogLevel) {
        self.level = level;
        self.info = if level > LogLevel::Info {
            Target::Discard
        } else {
            Target::Console
        };
        self.error = if level > LogLevel::Error {
            Target::Discard
        } else {
            Target::Console
        };
    }
}

pub struct Logger {
    state: Mutex<LoggerState>,
}

impl Logger {
    /// Logger writing to standard output at [`LogLevel::Info`].
    #[must_use]
    pub fn stdout() -> Self {
        Self::with_console(io::stdout())
    }

    /// Logger writing to an arbitrary console sink at [`LogLevel::Info`].
    #[must_use]
    pub fn with_console<W: Write + Send + 'static>(console: W) -> Self {
        let mut state = LoggerState {
            level: LogLevel::Info,
            info: Target::Console,
            error: Target::Console,
            console: Box::new(console),
        };
        state.rewire(LogLevel::Info);
        Self {
            state: Mutex::new(state),
        }
    }

    #[must_use]
    pub fn with_level(self, level: LogLevel) -> Self {
        self.set_level(level);
        self
    }

    /// Rewire both channels for `level`.
    pub fn set_level(&self, level: LogLevel) {
        self.lock().rewire(level);
    }

    #[must_use]
    pub fn level(&self) -> LogLevel {
        self.lock().level
    }

    #[track_caller]
    pub fn info(&self, msg: impl fmt::Display) {
        self.emit(Channel::Info, Location::caller(), format_args!("{msg}"));
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.emit(Channel::Info, Location::caller(), args);
    }

    #[track_caller]
    pub fn error(&self, msg: impl fmt::Display) {
        self.emit(Channel::Error, Location::caller(), format_args!("{msg}"));
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.emit(Channel::Error, Location::caller(), args);
    }

    fn lock(&self) -> MutexGuard<'_, LoggerState> {
        // A panic mid-write leaves nothing half-updated worth refusing to log over.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn emit(&self, channel: Channel, location: &Location<'_>, args: fmt::Arguments<'_>) {
        let mut state = self.lock();
        let (target, tag) = match channel {
            Channel::Info => (state.info, INFO_TAG),
            Channel::Error => (state.error, ERROR_TAG),
        };
        if target == Target::Discard {
            return;
        }
        let file = Path::new(location.file())
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_else(|| location.file());
        let line = format!(
            "{tag} {} {file}:{}: {args}\n",
            chrono::Local::now().format(TIMESTAMP_FORMAT),
            location.line(),
        );
        // Console write failures are not reportable anywhere better.
        let _ = state.console.write_all(line.as_bytes());
        let _ = state.console.flush();
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy)]
enum Channel {
    Info,
    Error,
}
