//! Logger module
//!
//! Provides logging utilities for the static file server:
//! - Server lifecycle logging
//! - Leveled error, warning, info and debug lines
//! - File-based logging support
//!
//! Each line carries a local timestamp and a level tag. Before `init()` runs,
//! lines go to stdout/stderr at the default `info` level.

pub mod writer;

use crate::config::Config;
use chrono::Local;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// Log verbosity, ordered from least to most verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    const fn tag(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag().to_ascii_lowercase())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" | "trace" => Ok(Self::Debug),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup. An unknown level falls back
/// to `info` with a warning.
pub fn init(config: &Config) -> std::io::Result<()> {
    let (level, bad_level) = match config.logging.level.parse::<LogLevel>() {
        Ok(level) => (level, None),
        Err(e) => (LogLevel::Info, Some(e)),
    };

    writer::init(
        config.logging.info_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        level,
    )?;

    if let Some(e) = bad_level {
        log_warning(&format!("{e}, using 'info'"));
    }
    Ok(())
}

fn current_level() -> LogLevel {
    writer::get().map_or(LogLevel::Info, writer::LogWriter::level)
}

fn format_line(level: LogLevel, message: &str) -> String {
    format!(
        "{} [{}] {message}",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        level.tag()
    )
}

fn write(level: LogLevel, message: &str) {
    if level > current_level() {
        return;
    }
    let line = format_line(level, message);
    match (writer::get(), level) {
        (Some(w), LogLevel::Error | LogLevel::Warn) => w.write_error(&line),
        (Some(w), _) => w.write_info(&line),
        (None, LogLevel::Error | LogLevel::Warn) => eprintln!("{line}"),
        (None, _) => println!("{line}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, root: &std::path::Path) {
    log_info(&format!(
        "Static server listening on http://{addr} (root: {})",
        root.display()
    ));
}

pub fn log_shutdown_started(active: usize) {
    log_info(&format!(
        "Shutdown requested, no longer accepting connections ({active} active)"
    ));
}

pub fn log_shutdown_complete(remaining: usize) {
    if remaining == 0 {
        log_info("All connections closed, server stopped");
    } else {
        log_warning(&format!(
            "Grace period elapsed with {remaining} connection(s) still open, server stopped"
        ));
    }
}

pub fn log_connection_error(err: &impl fmt::Display) {
    log_error(&format!("Failed to serve connection: {err}"));
}

pub fn log_error(message: &str) {
    write(LogLevel::Error, message);
}

pub fn log_warning(message: &str) {
    write(LogLevel::Warn, message);
}

pub fn log_info(message: &str) {
    write(LogLevel::Info, message);
}

pub fn log_debug(message: &str) {
    write(LogLevel::Debug, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!("error".parse::<LogLevel>(), Ok(LogLevel::Error));
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!(" info ".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert_eq!("trace".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Info < LogLevel::Debug);
    }

    #[test]
    fn test_format_line_has_tag() {
        let line = format_line(LogLevel::Warn, "disk almost full");
        assert!(line.ends_with("[WARN] disk almost full"), "got: {line}");
    }
}
