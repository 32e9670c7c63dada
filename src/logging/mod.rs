//! Logging with call-hierarchy context
//!
//! Each call produces one rendered line (with the caller-maintained call
//! trace appended) which is fanned out to the sinks selected at
//! construction: console, a log file, or both.

mod logger;
mod record;
mod sink;
mod trace;

pub use logger::{LogMode, Logger, LoggerConfig};
pub use record::{LogLevel, LogRecord};
pub use trace::CallScope;
