//! Log writer module
//!
//! Provides thread-safe log writing to files or stdout/stderr.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use super::LogLevel;

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(File),
}

/// Thread-safe log writer
pub struct LogWriter {
    /// Target for info and debug lines
    info: Mutex<LogTarget>,
    /// Target for warnings and errors
    error: Mutex<LogTarget>,
    level: LogLevel,
}

impl LogWriter {
    fn new(
        info_log_file: Option<&str>,
        error_log_file: Option<&str>,
        level: LogLevel,
    ) -> io::Result<Self> {
        let info = match info_log_file {
            Some(path) => LogTarget::File(open_log_file(path)?),
            None => LogTarget::Stdout,
        };

        let error = match error_log_file {
            Some(path) => LogTarget::File(open_log_file(path)?),
            None => LogTarget::Stderr,
        };

        Ok(Self {
            info: Mutex::new(info),
            error: Mutex::new(error),
            level,
        })
    }

    pub const fn level(&self) -> LogLevel {
        self.level
    }

    pub fn write_info(&self, line: &str) {
        if let Ok(mut target) = self.info.lock() {
            write_to_target(&mut target, line);
        }
    }

    pub fn write_error(&self, line: &str) {
        if let Ok(mut target) = self.error.lock() {
            write_to_target(&mut target, line);
        }
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn write_to_target(target: &mut LogTarget, line: &str) {
    match target {
        LogTarget::Stdout => println!("{line}"),
        LogTarget::Stderr => eprintln!("{line}"),
        LogTarget::File(file) => {
            let _ = writeln!(file, "{line}");
        }
    }
}

/// Initialize the global log writer
///
/// Returns an error if a log file cannot be opened or the writer was
/// already initialized.
pub fn init(
    info_log_file: Option<&str>,
    error_log_file: Option<&str>,
    level: LogLevel,
) -> io::Result<()> {
    let writer = LogWriter::new(info_log_file, error_log_file, level)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if `init()` has run
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}
