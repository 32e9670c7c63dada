//! Subkeep - flat-file submission persistence with a call-trace logger
//!
//! Two independent utilities intended for reuse across a larger project:
//! a [`Logger`] that emits messages with call-hierarchy context to a
//! configurable set of sinks, and a [`SubmissionStore`] that persists named
//! payloads to disk with JSON-backed metadata and age-based cleanup.

pub mod error;
pub mod logging;
pub mod store;

pub use error::{Error, NotFoundKind, Result};
pub use logging::{LogLevel, LogMode, Logger, LoggerConfig};
pub use store::{SubmissionMeta, SubmissionStore, DEFAULT_RETENTION_DAYS};
