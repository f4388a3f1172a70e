//! Logging infrastructure for cavasync.
//!
//! Provides a `log` backend that writes timestamped lines to stderr and,
//! optionally, appends them to a log file.

use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert log level to string
    pub fn to_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }

    fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }

    fn from_log(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

/// Format one log line as `YYYY-MM-DD HH:MM:SS - LEVEL - message`.
pub fn format_line(level: LogLevel, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("{} - {} - {}", timestamp, level.to_str(), message)
}

/// Global logger state
#[derive(Debug)]
struct Logger {
    /// Minimum log level to record
    min_level: LogLevel,
    /// Log file path, if file output is enabled
    file_path: Option<PathBuf>,
    /// Serializes writes from the notify thread and the main thread
    write_lock: Mutex<()>,
}

impl Logger {
    /// Create new logger instance
    fn new(file_path: Option<PathBuf>, min_level: LogLevel) -> Self {
        // Create parent directory if it doesn't exist
        if let Some(parent) = file_path.as_ref().and_then(|p| p.parent()) {
            let _ = fs::create_dir_all(parent);
        }

        Self {
            min_level,
            file_path,
            write_lock: Mutex::new(()),
        }
    }

    fn write_line(&self, line: &str) {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        eprintln!("{}", line);

        // Append to file (create if deleted)
        if let Some(path) = &self.file_path {
            if let Ok(mut file) = OpenOptions::new().append(true).create(true).open(path) {
                let _ = writeln!(file, "{}", line);
            }
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        LogLevel::from_log(metadata.level()) >= self.min_level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = LogLevel::from_log(record.level());
        self.write_line(&format_line(level, &record.args().to_string()));
    }

    fn flush(&self) {}
}

/// Global logger instance that persists for the application lifetime.
static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Initialize the global logger
///
/// Must be called once at application startup before any logging happens.
/// Subsequent calls will be ignored.
///
/// # Arguments
///
/// * `file_path` - Path to the log file, or `None` for console-only output
/// * `min_level` - Minimum log level to record (Debug, Info, Warn, Error)
pub fn init(file_path: Option<PathBuf>, min_level: LogLevel) {
    let logger = LOGGER.get_or_init(|| Logger::new(file_path, min_level));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.min_level.to_filter());
    }
}
