//! Submission persistence
//!
//! Flat payload files plus a single JSON metadata document, kept mutually
//! consistent by the cleanup sweep.

mod metadata;
mod submissions;

pub use metadata::{MetadataDocument, SubmissionMeta, METADATA_FILE};
pub use submissions::{SubmissionStore, DEFAULT_RETENTION_DAYS};
