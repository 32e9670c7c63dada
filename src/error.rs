//! Error types for subkeep operations
//!
//! One crate-wide error enum so callers can pattern match on the failure
//! class. I/O variants carry the path and the operation that failed.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a submission lookup came back empty.
///
/// Both kinds surface as [`Error::NotFound`]; the kind tells a missing
/// metadata entry apart from a metadata entry whose payload file is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    /// No entry for the id in the metadata document.
    MissingMetadata,
    /// The metadata entry exists but the payload file does not.
    MissingPayload,
}

impl NotFoundKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotFoundKind::MissingMetadata => "no metadata entry",
            NotFoundKind::MissingPayload => "payload file missing",
        }
    }
}

/// Top-level error type for all subkeep operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Logger construction rejected an incomplete configuration.
    #[error("invalid logger configuration: {reason}")]
    Configuration { reason: String },

    /// A submission id that cannot name a payload file.
    #[error("invalid submission id {id:?}: {reason}")]
    InvalidId { id: String, reason: &'static str },

    /// Filesystem operation failed.
    #[error("storage failure during {operation} on '{}': {source}", .path.display())]
    Storage {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The metadata document could not be encoded.
    #[error("failed to encode metadata document '{}': {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Submission lookup failed.
    #[error("submission '{id}' not found ({})", .kind.as_str())]
    NotFound { id: String, kind: NotFoundKind },
}

impl Error {
    /// Helper for wrapping an I/O error with its path and operation.
    pub(crate) fn storage(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Storage {
            operation,
            path: path.into(),
            source,
        }
    }
}
