//! Logger construction and sink fan-out

use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{Error, Result};

use super::record::{LogLevel, LogRecord};
use super::sink::Sink;
use super::trace::CallScope;

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// stdout only
    #[default]
    Console,
    /// Log file only
    File,
    /// Both stdout and the log file
    Dual,
}

/// Construction-time logger settings.
///
/// `file_path` is required for the `File` and `Dual` modes and ignored for
/// `Console`.
#[derive(Debug, Clone, Default)]
pub struct LoggerConfig {
    pub mode: LogMode,
    pub file_path: Option<PathBuf>,
}

impl LoggerConfig {
    /// Console-only configuration.
    pub fn console() -> Self {
        Self::default()
    }

    /// File-only configuration.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            mode: LogMode::File,
            file_path: Some(path.into()),
        }
    }

    /// Console plus file configuration.
    pub fn dual(path: impl Into<PathBuf>) -> Self {
        Self {
            mode: LogMode::Dual,
            file_path: Some(path.into()),
        }
    }
}

/// Logger with call-hierarchy context.
///
/// Messages are dispatched to every configured sink unconditionally; the
/// level is part of the rendered line, never a filter.
#[derive(Debug)]
pub struct Logger {
    sinks: Vec<Sink>,
    call_stack: Mutex<Vec<String>>,
}

impl Logger {
    /// Build a logger from a validated configuration.
    ///
    /// Fails with [`Error::Configuration`] when the mode needs a file path
    /// and none was given.
    pub fn new(config: LoggerConfig) -> Result<Self> {
        let sinks = match config.mode {
            LogMode::Console => vec![Sink::Console],
            LogMode::File => vec![Sink::File {
                path: require_file_path(config.file_path)?,
            }],
            LogMode::Dual => vec![
                Sink::Console,
                Sink::File {
                    path: require_file_path(config.file_path)?,
                },
            ],
        };

        Ok(Self {
            sinks,
            call_stack: Mutex::new(Vec::new()),
        })
    }

    /// Console-only logger; cannot fail.
    pub fn console() -> Self {
        Self {
            sinks: vec![Sink::Console],
            call_stack: Mutex::new(Vec::new()),
        }
    }

    /// Push a frame onto the call hierarchy.
    ///
    /// The frame stays part of every rendered trace until the returned
    /// guard drops.
    pub fn enter(&self, frame: impl Into<String>) -> CallScope<'_> {
        if let Ok(mut stack) = self.call_stack.lock() {
            stack.push(frame.into());
        }
        CallScope::new(self)
    }

    pub(crate) fn pop_frame(&self) {
        if let Ok(mut stack) = self.call_stack.lock() {
            stack.pop();
        }
    }

    fn current_trace(&self) -> Vec<String> {
        self.call_stack
            .lock()
            .map(|stack| stack.clone())
            .unwrap_or_default()
    }

    /// Render a record for `message` and dispatch it to every sink.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let record = LogRecord::new(level, message, self.current_trace());
        let line = record.render();
        for sink in &self.sinks {
            sink.emit(&line);
        }
    }

    /// Log an info message.
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    /// Log a warning message.
    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    /// Log an error message.
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Log a debug message.
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }
}

fn require_file_path(path: Option<PathBuf>) -> Result<PathBuf> {
    path.ok_or_else(|| Error::Configuration {
        reason: "file path must be provided when mode is not console".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read_lines(path: &std::path::Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_console_config_needs_no_path() {
        assert!(Logger::new(LoggerConfig::console()).is_ok());
    }

    #[test]
    fn test_file_mode_without_path_is_rejected() {
        let config = LoggerConfig {
            mode: LogMode::File,
            file_path: None,
        };
        assert!(matches!(
            Logger::new(config),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_dual_mode_without_path_is_rejected() {
        let config = LoggerConfig {
            mode: LogMode::Dual,
            file_path: None,
        };
        assert!(matches!(
            Logger::new(config),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_all_levels_reach_the_file_sink() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("app.log");
        let logger = Logger::new(LoggerConfig::file(&log_path)).unwrap();

        logger.info("one");
        logger.warning("two");
        logger.error("three");
        logger.debug("four");

        let lines = read_lines(&log_path);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("INFO: one"));
        assert!(lines[1].contains("WARNING: two"));
        assert!(lines[2].contains("ERROR: three"));
        assert!(lines[3].contains("DEBUG: four"));
    }

    #[test]
    fn test_dual_mode_writes_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("app.log");
        let logger = Logger::new(LoggerConfig::dual(&log_path)).unwrap();

        logger.info("hello");

        let lines = read_lines(&log_path);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("INFO: hello"));
    }

    #[test]
    fn test_call_trace_appended_to_rendered_line() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("app.log");
        let logger = Logger::new(LoggerConfig::file(&log_path)).unwrap();

        {
            let _outer = logger.enter("Ingest::run");
            let _inner = logger.enter("Store::save");
            logger.info("saving");
        }
        logger.info("done");

        let lines = read_lines(&log_path);
        assert!(lines[0].ends_with("INFO: saving, Ingest::run -> Store::save"));
        // Both frames popped by now, so no trace suffix
        assert!(lines[1].ends_with("INFO: done"));
    }

    #[test]
    fn test_scope_guard_pops_in_order() {
        let logger = Logger::console();

        let outer = logger.enter("outer");
        {
            let _inner = logger.enter("inner");
            assert_eq!(logger.current_trace(), vec!["outer", "inner"]);
        }
        assert_eq!(logger.current_trace(), vec!["outer"]);
        drop(outer);
        assert!(logger.current_trace().is_empty());
    }
}
