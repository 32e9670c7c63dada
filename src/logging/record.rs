//! Log levels and the per-call record

use chrono::{DateTime, SecondsFormat, Utc};

/// Severity of a log message.
///
/// All four levels are dispatched unconditionally; there is no threshold
/// filtering anywhere in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Debug,
}

impl LogLevel {
    /// Display name used in rendered lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single log record, created per call and discarded after dispatch.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Timestamp when the record was created
    pub timestamp: DateTime<Utc>,
    /// Severity
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Logical caller chain, outermost frame first
    pub call_trace: Vec<String>,
}

impl LogRecord {
    /// Create a record stamped with the current time.
    pub fn new(level: LogLevel, message: impl Into<String>, call_trace: Vec<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            call_trace,
        }
    }

    /// Render the record as a single output line.
    ///
    /// The call trace is appended only when at least one frame is active.
    pub fn render(&self) -> String {
        let timestamp = self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true);
        if self.call_trace.is_empty() {
            format!("{} {}: {}", timestamp, self.level.as_str(), self.message)
        } else {
            format!(
                "{} {}: {}, {}",
                timestamp,
                self.level.as_str(),
                self.message,
                self.call_trace.join(" -> ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(LogLevel::Warning.as_str(), "WARNING");
        assert_eq!(LogLevel::Error.as_str(), "ERROR");
        assert_eq!(LogLevel::Debug.as_str(), "DEBUG");
    }

    #[test]
    fn test_render_without_trace() {
        let record = LogRecord::new(LogLevel::Info, "starting up", Vec::new());
        let line = record.render();
        assert!(line.ends_with(" INFO: starting up"));
        assert!(!line.contains(','));
    }

    #[test]
    fn test_render_with_trace() {
        let record = LogRecord::new(
            LogLevel::Error,
            "write failed",
            vec!["Ingest::run".to_string(), "Store::save".to_string()],
        );
        let line = record.render();
        assert!(line.ends_with(" ERROR: write failed, Ingest::run -> Store::save"));
    }
}
